use crate::assembler::SlotAssembler;
use crate::calibration::{AxisRanges, Calibrator};
use crate::device::TouchDevice;
use crate::event::Axis;
use crate::queue::EventSender;
use crate::tracker::TouchLifecycleTracker;
use std::io::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to open device: {0}")]
    Open(#[source] Error),
    #[error("device read failed: {0}")]
    Io(#[source] Error),
    #[error("failed to spawn capture thread: {0}")]
    Spawn(#[source] Error),
    #[error("capture thread panicked")]
    Panicked,
}

/// Shared flag asking a capture thread to finish. Checked on every idle wait.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Resolves the range of every axis. Axes that cannot be calibrated are
/// logged and left out.
pub fn calibrate<D: TouchDevice>(device: &D, calibrator: &Calibrator) -> AxisRanges {
    let mut ranges = AxisRanges::new();
    for axis in Axis::ALL.iter() {
        let limits = device.axis_limits(*axis);
        let result = calibrator.resolve(
            *axis,
            limits.map(|limits| limits.minimum),
            limits.map(|limits| limits.maximum),
        );

        match result {
            Ok(range) => {
                log::info!(
                    "MTD: <{}> range {} is {} - {}",
                    device.name(),
                    axis,
                    range.min,
                    range.max
                );
                ranges.insert(*axis, range);
            }
            Err(err) => log::error!("MTD: <{}> {}, ignoring axis", device.name(), err),
        }
    }

    ranges
}

/// State of one capture thread: the device and everything assembled from it.
pub struct CaptureThread<D> {
    device: D,
    assembler: SlotAssembler,
    tracker: TouchLifecycleTracker,
    sender: EventSender,
    stop: StopSignal,
    idle_timeout: Duration,
}

impl<D: TouchDevice> CaptureThread<D> {
    pub fn new(
        device: D,
        calibrator: &Calibrator,
        sender: EventSender,
        stop: StopSignal,
        idle_timeout: Duration,
    ) -> Self {
        let ranges = calibrate(&device, calibrator);
        let tracker = TouchLifecycleTracker::new(device.name());

        CaptureThread {
            device,
            assembler: SlotAssembler::new(ranges),
            tracker,
            sender,
            stop,
            idle_timeout,
        }
    }

    /// Runs until the device fails, a stop is requested or the consumer goes
    /// away.
    pub fn run(mut self) -> Result<(), CaptureError> {
        loop {
            // Idle as much as we can.
            loop {
                if self.stop.is_stopped() {
                    log::debug!("MTD: <{}> stop requested", self.device.name());
                    return Ok(());
                }

                if !self.device.idle(self.idle_timeout).map_err(CaptureError::Io)? {
                    break;
                }
            }

            // Got data, read everything without idling again.
            while let Some(update) = self.device.read_next().map_err(CaptureError::Io)? {
                self.assembler.feed(update);
            }

            if !self.publish() {
                log::debug!("MTD: <{}> consumer is gone", self.device.name());
                return Ok(());
            }
        }
    }

    fn publish(&mut self) -> bool {
        for mut point in self.assembler.take_changes() {
            if let Some(event) = self.tracker.classify(&mut point) {
                if !self.sender.push(event) {
                    return false;
                }
            }
        }

        true
    }
}

/// Spawns a named capture thread. `open` runs on the new thread, so the
/// device is opened and calibrated there.
pub fn spawn_capture<D, F>(
    name: &str,
    open: F,
    calibrator: Calibrator,
    sender: EventSender,
    stop: StopSignal,
    idle_timeout: Duration,
) -> Result<JoinHandle<Result<(), CaptureError>>, CaptureError>
where
    D: TouchDevice,
    F: FnOnce() -> Result<D, Error> + Send + 'static,
{
    let label = name.to_owned();
    thread::Builder::new()
        .name(format!("mtd-{}", name))
        .spawn(move || {
            let result = open().map_err(CaptureError::Open).and_then(|device| {
                CaptureThread::new(device, &calibrator, sender, stop, idle_timeout).run()
            });
            match result {
                Ok(()) => log::info!("MTD: {} capture finished", label),
                Err(ref err) => log::error!("MTD: {} capture failed: {}", label, err),
            }
            result
        })
        .map_err(CaptureError::Spawn)
}
