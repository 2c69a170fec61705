use crate::calibration::{CalibrationOption, Calibrator};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no device path given (use /dev/input/event0 for example)")]
    MissingPath,
    #[error("invalid parameter {0}, not in key=value format")]
    NotKeyValue(String),
    #[error("unknown {0} option")]
    UnknownOption(String),
    #[error("invalid value {value} for option {key}")]
    InvalidValue { key: String, value: String },
}

/// Parsed provider argument line: `<path>[,key=value]*`.
#[derive(Clone, Debug)]
pub struct ProviderArgs {
    pub path: PathBuf,
    pub calibrator: Calibrator,
}

impl ProviderArgs {
    /// Parses the argument line. Only a missing path is fatal; bad calibration
    /// options are logged and skipped.
    pub fn parse(args: &str) -> Result<Self, ConfigError> {
        let mut tokens = args.split(',');
        let path = match tokens.next().map(str::trim) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => return Err(ConfigError::MissingPath),
        };

        let mut calibrator = Calibrator::default();
        for token in tokens {
            if token.is_empty() {
                continue;
            }

            match parse_option(token) {
                Ok((option, value)) => {
                    log::info!("MTD: Set custom {} to {}", option.name(), value);
                    calibrator.set_override(option, value);
                }
                Err(err) => log::error!("MTD: {}", err),
            }
        }

        Ok(ProviderArgs { path, calibrator })
    }
}

fn parse_option(token: &str) -> Result<(CalibrationOption, i32), ConfigError> {
    let parts: Vec<&str> = token.split('=').collect();
    let (key, value) = match parts.as_slice() {
        [key, value] => (key.trim(), value.trim()),
        _ => return Err(ConfigError::NotKeyValue(token.to_owned())),
    };

    let option = key.parse::<CalibrationOption>()?;
    let value = value.parse::<i32>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_owned(),
        value: value.to_owned(),
    })?;

    Ok((option, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Bound;
    use crate::event::Axis;
    use std::path::Path;

    #[test]
    fn path_only() {
        let args = ProviderArgs::parse("/dev/input/event2").unwrap();
        assert_eq!(args.path, Path::new("/dev/input/event2"));
        for axis in Axis::ALL.iter() {
            assert_eq!(args.calibrator.override_for(*axis, Bound::Min), None);
            assert_eq!(args.calibrator.override_for(*axis, Bound::Max), None);
        }
    }

    #[test]
    fn missing_path() {
        assert_eq!(ProviderArgs::parse("").unwrap_err(), ConfigError::MissingPath);
        assert_eq!(
            ProviderArgs::parse(",min_position_x=3").unwrap_err(),
            ConfigError::MissingPath
        );
    }

    #[test]
    fn overrides_are_collected() {
        let args = ProviderArgs::parse(concat!(
            "/dev/input/event5,min_position_x=12,",
            "max_pressure=1024,,max_touch_minor=40"
        ))
        .unwrap();
        let calibrator = &args.calibrator;
        assert_eq!(calibrator.override_for(Axis::PositionX, Bound::Min), Some(12));
        assert_eq!(calibrator.override_for(Axis::PositionX, Bound::Max), None);
        assert_eq!(calibrator.override_for(Axis::Pressure, Bound::Max), Some(1024));
        assert_eq!(calibrator.override_for(Axis::TouchMinor, Bound::Max), Some(40));
    }

    #[test]
    fn bad_options_are_skipped() {
        let args = ProviderArgs::parse(concat!(
            "/dev/input/event5,min_position_x,foo=3,max_position_y=abc,",
            "min_position_y=-7,max_position_x=1=2"
        ))
        .unwrap();
        let calibrator = &args.calibrator;
        assert_eq!(calibrator.override_for(Axis::PositionX, Bound::Min), None);
        assert_eq!(calibrator.override_for(Axis::PositionX, Bound::Max), None);
        assert_eq!(calibrator.override_for(Axis::PositionY, Bound::Max), None);
        assert_eq!(calibrator.override_for(Axis::PositionY, Bound::Min), Some(-7));
    }

    #[test]
    fn option_errors() {
        assert_eq!(
            parse_option("min_position_x"),
            Err(ConfigError::NotKeyValue("min_position_x".into()))
        );
        assert_eq!(
            parse_option("min_width=3"),
            Err(ConfigError::UnknownOption("min_width".into()))
        );
        assert_eq!(
            parse_option("max_pressure=1.5"),
            Err(ConfigError::InvalidValue {
                key: "max_pressure".into(),
                value: "1.5".into(),
            })
        );
    }
}
