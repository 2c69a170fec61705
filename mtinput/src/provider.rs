use crate::capture::{self, CaptureError, StopSignal, DEFAULT_IDLE_TIMEOUT};
use crate::config::ProviderArgs;
use crate::device::TouchDevice;
use crate::event::{Action, Touch};
use crate::queue::{self, EventReceiver};
use std::io::Error;
use std::path::Path;
use std::thread::JoinHandle;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ProviderSettings {
    /// How long the capture thread waits for data before checking for a stop.
    pub idle_timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

struct Capture {
    receiver: EventReceiver,
    stop: StopSignal,
    handle: Option<JoinHandle<Result<(), CaptureError>>>,
}

/// Touch provider for one multitouch device. `start` spawns the capture
/// thread, `update` hands queued events to the caller.
pub struct MtdevProvider {
    name: String,
    args: Option<ProviderArgs>,
    settings: ProviderSettings,
    capture: Option<Capture>,
}

impl MtdevProvider {
    /// Creates a provider from its argument line. Without a device path the
    /// provider is still created, but starting it does nothing.
    pub fn new(name: &str, args: &str) -> Self {
        Self::with_settings(name, args, ProviderSettings::default())
    }

    pub fn with_settings(name: &str, args: &str, settings: ProviderSettings) -> Self {
        let args = match ProviderArgs::parse(args) {
            Ok(args) => {
                log::info!("MTD: Read event from <{}>", args.path.display());
                Some(args)
            }
            Err(err) => {
                log::error!("MTD: {}: {}", name, err);
                None
            }
        };

        MtdevProvider {
            name: name.to_owned(),
            args,
            settings,
            capture: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.args.as_ref().map(|args| args.path.as_path())
    }

    /// Starts capturing from the configured evdev device.
    #[cfg(target_os = "linux")]
    pub fn start(&mut self) {
        let path = match self.path() {
            Some(path) => path.to_owned(),
            None => return,
        };

        self.start_with(move || crate::linux::EvdevDevice::open(&path));
    }

    #[cfg(not(target_os = "linux"))]
    pub fn start(&mut self) {
        if self.path().is_some() {
            log::error!("MTD: {}: evdev devices are only available on Linux", self.name);
        }
    }

    /// Starts capturing from the device `open` returns. A no-op without a
    /// device path or while the capture thread is running. A capture that
    /// has ended, after a failure or `stop`, is replaced.
    pub fn start_with<D, F>(&mut self, open: F)
    where
        D: TouchDevice,
        F: FnOnce() -> Result<D, Error> + Send + 'static,
    {
        let args = match &self.args {
            Some(args) => args,
            None => return,
        };

        if self.is_running() {
            log::warn!("MTD: {} already started", self.name);
            return;
        }

        if let Some(mut capture) = self.capture.take() {
            if let Some(handle) = capture.handle.take() {
                // The outcome was logged when the thread ended.
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => log::debug!("MTD: {}: previous capture: {}", self.name, err),
                    Err(_) => log::debug!("MTD: {}: previous capture panicked", self.name),
                }
            }
        }

        let (sender, receiver) = queue::event_queue();
        let stop = StopSignal::new();
        let handle = match capture::spawn_capture(
            &self.name,
            open,
            args.calibrator.clone(),
            sender,
            stop.clone(),
            self.settings.idle_timeout,
        ) {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("MTD: {}: {}", self.name, err);
                return;
            }
        };

        self.capture = Some(Capture {
            receiver,
            stop,
            handle: Some(handle),
        });
    }

    /// Dispatches every touch event queued since the last call. Never blocks.
    pub fn update<F>(&mut self, dispatch: F) -> usize
    where
        F: FnMut(Action, Touch),
    {
        match &mut self.capture {
            Some(capture) => capture.receiver.drain(dispatch),
            None => 0,
        }
    }

    /// True while the capture thread is alive. Turns false after a device
    /// failure, which needs an external restart.
    pub fn is_running(&self) -> bool {
        match &self.capture {
            Some(Capture {
                handle: Some(handle),
                ..
            }) => !handle.is_finished(),
            _ => false,
        }
    }

    /// Asks the capture thread to finish and waits for it. Events queued
    /// before the stop can still be collected with `update`.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        let capture = match &mut self.capture {
            Some(capture) => capture,
            None => return Ok(()),
        };

        capture.stop.stop();
        match capture.handle.take() {
            Some(handle) => handle.join().map_err(|_| CaptureError::Panicked)?,
            None => Ok(()),
        }
    }
}

impl Drop for MtdevProvider {
    fn drop(&mut self) {
        if let Some(capture) = &self.capture {
            capture.stop.stop();
        }
    }
}
