mod assembler;
mod calibration;
mod capture;
mod config;
mod device;
mod event;
mod provider;
mod queue;
mod tracker;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::EvdevDevice;

pub use assembler::{PendingPoint, SlotAssembler};
pub use calibration::{
    AxisRanges, Bound, CalibrationError, CalibrationOption, CalibrationRange, Calibrator,
};
pub use capture::{
    calibrate, spawn_capture, CaptureError, CaptureThread, StopSignal, DEFAULT_IDLE_TIMEOUT,
};
pub use config::{ConfigError, ProviderArgs};
pub use device::{AxisLimits, TouchDevice};
pub use event::{Action, Axis, FieldCode, Profile, RawFieldUpdate, Shape, Touch, TouchEvent};
pub use provider::{MtdevProvider, ProviderSettings};
pub use queue::{event_queue, EventReceiver, EventSender};
pub use tracker::TouchLifecycleTracker;
