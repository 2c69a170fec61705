use crate::device::{AxisLimits, TouchDevice};
use crate::event::{Axis, RawFieldUpdate};
use evdev::{AbsoluteAxisCode, Device};
use std::collections::{HashMap, VecDeque};
use std::io::{Error, ErrorKind};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use std::time::Duration;

/// Multitouch device read through the evdev character device.
pub struct EvdevDevice {
    name: String,
    device: Device,
    limits: HashMap<Axis, AxisLimits>,
    pending: VecDeque<RawFieldUpdate>,
}

impl EvdevDevice {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let device = Device::open(path)?;
        set_nonblocking(device.as_raw_fd())?;

        let name = device
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| path.display().to_string());

        let mut limits = HashMap::new();
        for (code, info) in device.get_absinfo()? {
            if let Some(axis) = Axis::from_raw(code) {
                limits.insert(
                    axis,
                    AxisLimits {
                        minimum: info.minimum(),
                        maximum: info.maximum(),
                    },
                );
            }
        }

        let has_slots = device
            .supported_absolute_axes()
            .map_or(false, |axes| axes.contains(AbsoluteAxisCode::ABS_MT_SLOT));
        if !has_slots {
            log::warn!(
                "MTD: <{}> does not report multitouch slots, touches may never arrive",
                path.display()
            );
        }

        Ok(Self {
            name,
            device,
            limits,
            pending: VecDeque::new(),
        })
    }

    /// Moves everything the kernel has buffered into `pending`. Returns false
    /// when nothing was available.
    fn fetch(&mut self) -> Result<bool, Error> {
        loop {
            let events = match self.device.fetch_events() {
                Ok(events) => events,
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(false),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            self.pending
                .extend(events.filter_map(|event| RawFieldUpdate::from_event(&event)));
            return Ok(true);
        }
    }
}

impl TouchDevice for EvdevDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_limits(&self, axis: Axis) -> Option<AxisLimits> {
        self.limits.get(&axis).copied()
    }

    fn idle(&mut self, timeout: Duration) -> Result<bool, Error> {
        if !self.pending.is_empty() {
            return Ok(false);
        }

        let mut fd = libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

        let ret = unsafe { libc::poll(&mut fd, 1, timeout) };
        if ret < 0 {
            let err = Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return Ok(true);
            }
            return Err(err);
        }

        if ret == 0 {
            return Ok(true);
        }

        if fd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(Error::from_raw_os_error(libc::ENODEV));
        }

        Ok(false)
    }

    fn read_next(&mut self) -> Result<Option<RawFieldUpdate>, Error> {
        // A fetch may yield only non-multitouch events, keep going until the
        // kernel buffer is empty.
        while self.pending.is_empty() {
            if !self.fetch()? {
                return Ok(None);
            }
        }

        Ok(self.pending.pop_front())
    }
}

fn set_nonblocking(fd: RawFd) -> Result<(), Error> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(Error::last_os_error());
    }

    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(Error::last_os_error());
    }

    Ok(())
}
