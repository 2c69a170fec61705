use crate::event::{Axis, RawFieldUpdate};
use std::io::Error;
use std::time::Duration;

/// Absolute axis bounds as reported by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisLimits {
    pub minimum: i32,
    pub maximum: i32,
}

/// A multitouch device the capture thread reads from.
pub trait TouchDevice {
    fn name(&self) -> &str;

    /// Device-reported limits of `axis`, `None` if the axis is not supported.
    fn axis_limits(&self, axis: Axis) -> Option<AxisLimits>;

    /// Waits up to `timeout` for data. Returns true if nothing arrived.
    fn idle(&mut self, timeout: Duration) -> Result<bool, Error>;

    /// Next immediately available update, `None` once the device has nothing
    /// more right now.
    fn read_next(&mut self) -> Result<Option<RawFieldUpdate>, Error>;
}
