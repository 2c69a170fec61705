use anyhow::{anyhow, Error};
use figment::providers::{Format, Toml};
use figment::Figment;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 16;
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 1000;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    // Device name to `<provider>,<provider arguments>`.
    #[serde(default)]
    pub input: BTreeMap<String, String>,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_idle_timeout_ms() -> u64 {
    DEFAULT_IDLE_TIMEOUT_MS
}

impl Config {
    /// Reads the config at `path`. A missing file yields the defaults.
    pub fn new(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Toml::file(path)).extract()
    }

    #[cfg(test)]
    pub fn from_toml(toml: &str) -> Result<Self, figment::Error> {
        Figment::from(Toml::string(toml)).extract()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms.max(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Mtdev,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEntry {
    pub name: String,
    pub kind: ProviderKind,
    pub args: String,
}

impl InputEntry {
    /// Parses a `<provider>,<provider arguments>` device entry.
    pub fn parse(name: &str, value: &str) -> Result<Self, Error> {
        let (kind, args) = match value.split_once(',') {
            Some((kind, args)) => (kind.trim(), args),
            None => (value.trim(), ""),
        };

        let kind = match kind {
            "mtdev" => ProviderKind::Mtdev,
            other => return Err(anyhow!("Unknown provider \"{}\" for device {}", other, name)),
        };

        Ok(InputEntry {
            name: name.to_owned(),
            kind,
            args: args.to_owned(),
        })
    }

    /// Parses a `name=<provider>,<provider arguments>` command line entry.
    pub fn parse_arg(arg: &str) -> Result<Self, Error> {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("Device \"{}\" is not in name=provider,args format", arg))?;
        Self::parse(name.trim(), value)
    }
}
