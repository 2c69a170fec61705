use crate::config::ConfigError;
use crate::event::Axis;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PRESSURE_MIN: i32 = 0;
pub const DEFAULT_PRESSURE_MAX: i32 = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("range {axis} is {min} - {max}, maximum must be above minimum")]
    EmptyRange { axis: Axis, min: i32, max: i32 },
    #[error("no {bound} known for range {axis}")]
    MissingBound { axis: Axis, bound: Bound },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bound {
    Min,
    Max,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Min => f.write_str("minimum"),
            Bound::Max => f.write_str("maximum"),
        }
    }
}

/// One `min_*`/`max_*` calibration option of the provider argument line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CalibrationOption {
    pub axis: Axis,
    pub bound: Bound,
}

impl CalibrationOption {
    pub const NAMES: [(&'static str, Axis, Bound); 10] = [
        ("min_position_x", Axis::PositionX, Bound::Min),
        ("max_position_x", Axis::PositionX, Bound::Max),
        ("min_position_y", Axis::PositionY, Bound::Min),
        ("max_position_y", Axis::PositionY, Bound::Max),
        ("min_pressure", Axis::Pressure, Bound::Min),
        ("max_pressure", Axis::Pressure, Bound::Max),
        ("min_touch_major", Axis::TouchMajor, Bound::Min),
        ("max_touch_major", Axis::TouchMajor, Bound::Max),
        ("min_touch_minor", Axis::TouchMinor, Bound::Min),
        ("max_touch_minor", Axis::TouchMinor, Bound::Max),
    ];

    pub fn name(&self) -> &'static str {
        match (self.axis, self.bound) {
            (Axis::PositionX, Bound::Min) => "min_position_x",
            (Axis::PositionX, Bound::Max) => "max_position_x",
            (Axis::PositionY, Bound::Min) => "min_position_y",
            (Axis::PositionY, Bound::Max) => "max_position_y",
            (Axis::Pressure, Bound::Min) => "min_pressure",
            (Axis::Pressure, Bound::Max) => "max_pressure",
            (Axis::TouchMajor, Bound::Min) => "min_touch_major",
            (Axis::TouchMajor, Bound::Max) => "max_touch_major",
            (Axis::TouchMinor, Bound::Min) => "min_touch_minor",
            (Axis::TouchMinor, Bound::Max) => "max_touch_minor",
        }
    }
}

impl FromStr for CalibrationOption {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(option, _, _)| *option == name)
            .map(|&(_, axis, bound)| CalibrationOption { axis, bound })
            .ok_or_else(|| ConfigError::UnknownOption(name.to_owned()))
    }
}

/// Raw-value interval mapped onto `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalibrationRange {
    pub min: i32,
    pub max: i32,
}

impl CalibrationRange {
    pub fn new(axis: Axis, min: i32, max: i32) -> Result<Self, CalibrationError> {
        if max <= min {
            return Err(CalibrationError::EmptyRange { axis, min, max });
        }

        Ok(CalibrationRange { min, max })
    }

    /// Linear mapping of `value`, deliberately not clamped: raw values outside
    /// the range land outside `[0, 1]`.
    pub fn normalize(&self, value: i32) -> f64 {
        (value as f64 - self.min as f64) / (self.max as f64 - self.min as f64)
    }

    /// Like `normalize`, with the origin moved to the opposite end.
    pub fn normalize_inverted(&self, value: i32) -> f64 {
        1.0 - self.normalize(value)
    }
}

/// Resolves axis ranges, user overrides first.
#[derive(Clone, Debug, Default)]
pub struct Calibrator {
    overrides: HashMap<CalibrationOption, i32>,
}

impl Calibrator {
    pub fn set_override(&mut self, option: CalibrationOption, value: i32) {
        self.overrides.insert(option, value);
    }

    pub fn override_for(&self, axis: Axis, bound: Bound) -> Option<i32> {
        self.overrides
            .get(&CalibrationOption { axis, bound })
            .copied()
    }

    pub fn resolve(
        &self,
        axis: Axis,
        device_min: Option<i32>,
        device_max: Option<i32>,
    ) -> Result<CalibrationRange, CalibrationError> {
        let (device_min, device_max) = match axis {
            Axis::Pressure => {
                let min = device_min.unwrap_or(DEFAULT_PRESSURE_MIN);
                let max = device_max.unwrap_or(DEFAULT_PRESSURE_MAX);
                // Some drivers report an unusable pressure range.
                if max > min {
                    (Some(min), Some(max))
                } else {
                    (Some(DEFAULT_PRESSURE_MIN), Some(DEFAULT_PRESSURE_MAX))
                }
            }
            _ => (device_min, device_max),
        };

        let min = self
            .override_for(axis, Bound::Min)
            .or(device_min)
            .ok_or(CalibrationError::MissingBound { axis, bound: Bound::Min })?;
        let max = self
            .override_for(axis, Bound::Max)
            .or(device_max)
            .ok_or(CalibrationError::MissingBound { axis, bound: Bound::Max })?;

        CalibrationRange::new(axis, min, max)
    }
}

/// The resolved range of every usable axis. Axes that failed calibration are
/// absent and their updates are dropped.
#[derive(Clone, Debug, Default)]
pub struct AxisRanges {
    ranges: HashMap<Axis, CalibrationRange>,
}

impl AxisRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, axis: Axis, range: CalibrationRange) {
        self.ranges.insert(axis, range);
    }

    /// Normalized value of `raw` on `axis`. Vertical position is inverted
    /// since the device origin is at the top.
    pub fn normalize(&self, axis: Axis, raw: i32) -> Option<f64> {
        let range = self.ranges.get(&axis)?;
        match axis {
            Axis::PositionY => Some(range.normalize_inverted(raw)),
            _ => Some(range.normalize(raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str) -> CalibrationOption {
        name.parse().unwrap()
    }

    #[test]
    fn override_wins_per_bound() {
        let mut calibrator = Calibrator::default();
        calibrator.set_override(option("min_position_x"), 10);

        let range = calibrator.resolve(Axis::PositionX, Some(0), Some(4096)).unwrap();
        assert_eq!(range, CalibrationRange { min: 10, max: 4096 });

        let mut calibrator = Calibrator::default();
        calibrator.set_override(option("max_position_y"), 900);

        let range = calibrator.resolve(Axis::PositionY, Some(5), Some(4096)).unwrap();
        assert_eq!(range, CalibrationRange { min: 5, max: 900 });
    }

    #[test]
    fn override_without_device_bound() {
        let mut calibrator = Calibrator::default();
        calibrator.set_override(option("min_touch_minor"), 1);
        calibrator.set_override(option("max_touch_minor"), 31);

        let range = calibrator.resolve(Axis::TouchMinor, None, None).unwrap();
        assert_eq!(range, CalibrationRange { min: 1, max: 31 });
    }

    #[test]
    fn pressure_defaults() {
        let calibrator = Calibrator::default();
        let range = calibrator.resolve(Axis::Pressure, None, None).unwrap();
        assert_eq!(range, CalibrationRange { min: 0, max: 255 });

        let range = calibrator.resolve(Axis::Pressure, None, Some(1024)).unwrap();
        assert_eq!(range, CalibrationRange { min: 0, max: 1024 });
    }

    #[test]
    fn unusable_device_pressure_falls_back() {
        let calibrator = Calibrator::default();
        let range = calibrator.resolve(Axis::Pressure, Some(0), Some(0)).unwrap();
        assert_eq!(range, CalibrationRange { min: 0, max: 255 });

        let range = calibrator.resolve(Axis::Pressure, Some(300), None).unwrap();
        assert_eq!(range, CalibrationRange { min: 0, max: 255 });

        let mut calibrator = Calibrator::default();
        calibrator.set_override(option("max_pressure"), 100);
        let range = calibrator.resolve(Axis::Pressure, Some(0), Some(0)).unwrap();
        assert_eq!(range, CalibrationRange { min: 0, max: 100 });
    }

    #[test]
    fn missing_bound_is_an_error() {
        let calibrator = Calibrator::default();
        assert_eq!(
            calibrator.resolve(Axis::TouchMajor, Some(0), None),
            Err(CalibrationError::MissingBound {
                axis: Axis::TouchMajor,
                bound: Bound::Max,
            })
        );
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(CalibrationRange::new(Axis::PositionX, 10, 10).is_err());
        assert!(CalibrationRange::new(Axis::PositionX, 10, 3).is_err());

        let mut calibrator = Calibrator::default();
        calibrator.set_override(option("max_position_x"), 0);
        assert_eq!(
            calibrator.resolve(Axis::PositionX, Some(0), Some(4096)),
            Err(CalibrationError::EmptyRange {
                axis: Axis::PositionX,
                min: 0,
                max: 0,
            })
        );
    }

    #[test]
    fn normalize_endpoints() {
        let range = CalibrationRange::new(Axis::PositionX, 100, 300).unwrap();
        assert_eq!(range.normalize(100), 0.0);
        assert_eq!(range.normalize(300), 1.0);
        assert_eq!(range.normalize(200), 0.5);
        assert_eq!(range.normalize_inverted(100), 1.0);
        assert_eq!(range.normalize_inverted(300), 0.0);
    }

    #[test]
    fn normalize_is_not_clamped() {
        let range = CalibrationRange::new(Axis::PositionX, 0, 100).unwrap();
        assert_eq!(range.normalize(150), 1.5);
        assert_eq!(range.normalize(-50), -0.5);
    }

    #[test]
    fn axis_ranges_invert_vertical_only() {
        let mut ranges = AxisRanges::new();
        ranges.insert(Axis::PositionX, CalibrationRange { min: 0, max: 200 });
        ranges.insert(Axis::PositionY, CalibrationRange { min: 0, max: 100 });

        assert_eq!(ranges.normalize(Axis::PositionX, 50), Some(0.25));
        assert_eq!(ranges.normalize(Axis::PositionY, 25), Some(0.75));
        assert_eq!(ranges.normalize(Axis::Pressure, 25), None);
    }

    #[test]
    fn option_names() {
        for (name, axis, bound) in CalibrationOption::NAMES.iter() {
            let parsed: CalibrationOption = name.parse().unwrap();
            assert_eq!(parsed, CalibrationOption { axis: *axis, bound: *bound });
            assert_eq!(parsed.name(), *name);
        }
        assert_eq!(
            "min_touch_width".parse::<CalibrationOption>(),
            Err(ConfigError::UnknownOption("min_touch_width".to_owned()))
        );
    }
}
