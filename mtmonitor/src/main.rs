mod config;

use anyhow::{anyhow, Error};
use clap::Parser;
use config::{Config, InputEntry, ProviderKind};
use log::LevelFilter;
use mtinput::{Action, MtdevProvider, ProviderSettings, Touch};
use std::collections::HashSet;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio::time;

#[derive(clap::Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, value_parser, default_value = "/etc/mtmonitor/config.toml")]
    config_path: PathBuf,

    /// Additional input device as name=provider,args, e.g.
    /// screen=mtdev,/dev/input/event2,max_pressure=100
    #[clap(short, long = "device", value_parser)]
    devices: Vec<String>,
}

fn log_touch(device: &str, action: Action, touch: &Touch) {
    let mut details = String::new();
    if let Some(pressure) = touch.pressure {
        details.push_str(&format!(" pressure={:.3}", pressure));
    }
    if let Some(shape) = touch.shape {
        details.push_str(&format!(" shape={:.3}x{:.3}", shape.width, shape.height));
    }

    log::info!("{}: {:<4} {}{}", device, action, touch, details);
}

fn create_providers(config: &Config, devices: &[String]) -> Vec<MtdevProvider> {
    let mut entries = Vec::new();
    for (name, value) in &config.input {
        match InputEntry::parse(name, value) {
            Ok(entry) => entries.push(entry),
            Err(err) => log::error!("{}", err),
        }
    }
    for device in devices {
        match InputEntry::parse_arg(device) {
            Ok(entry) => entries.push(entry),
            Err(err) => log::error!("{}", err),
        }
    }

    let settings = ProviderSettings {
        idle_timeout: config.idle_timeout(),
    };

    entries
        .into_iter()
        .filter_map(|entry| match entry.kind {
            ProviderKind::Mtdev => {
                let provider =
                    MtdevProvider::with_settings(&entry.name, &entry.args, settings.clone());
                // Without a device path the provider cannot start.
                if provider.path().is_some() {
                    Some(provider)
                } else {
                    None
                }
            }
        })
        .collect()
}

async fn run_monitor(
    providers: &mut [MtdevProvider],
    poll_interval: Duration,
) -> Result<(), Error> {
    let mut interval = time::interval(poll_interval);
    let mut failed = HashSet::new();

    loop {
        interval.tick().await;

        for provider in providers.iter_mut() {
            let name = provider.name().to_owned();
            provider.update(|action, touch| log_touch(&name, action, &touch));

            // A capture thread only ends on device failure while we are running.
            if !provider.is_running() && failed.insert(name.clone()) {
                log::error!("{}: capture stopped, the device needs to be restarted", name);
            }
        }

        if failed.len() == providers.len() {
            return Err(anyhow!("All input devices failed"));
        }
    }
}

fn stop_providers(providers: &mut [MtdevProvider]) {
    for provider in providers.iter_mut() {
        match tokio::task::block_in_place(|| provider.stop()) {
            Ok(()) => log::info!("{}: stopped", provider.name()),
            // Already reported when the capture thread ended.
            Err(err) => log::debug!("{}: {}", provider.name(), err),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .format_timestamp(None)
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let config = match Config::new(&args.config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error reading config: {}", err);
            process::exit(1);
        }
    };

    let mut providers = create_providers(&config, &args.devices);
    if providers.is_empty() {
        log::error!("No input devices specified, exiting.");
        process::exit(1);
    }

    for provider in providers.iter_mut() {
        provider.start();
    }

    let mut failed = false;
    tokio::select! {
        result = run_monitor(&mut providers, config.poll_interval()) => {
            if let Err(err) = result {
                log::error!("Error: {:#}", err);
                failed = true;
            }
        }

        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                log::error!("Error setting up signal handler: {}", err);
                failed = true;
            } else {
                log::info!("Exiting on signal");
            }
        }
    }

    stop_providers(&mut providers);

    if failed {
        process::exit(1);
    }
}
