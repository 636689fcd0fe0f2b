//! Generic POSIX backend: a plain file descriptor opened read/write.
//!
//! There is no portable fd-level answer to "what bus is this device on", so
//! this backend classifies everything as `Unknown`.

use rustix::fd::OwnedFd;
use rustix::fs::{Mode, OFlags, SeekFrom};

use crate::device::classify::DeviceType;
use crate::error::DeviceError;

#[derive(Debug)]
pub(crate) struct Backend {
    fd: OwnedFd,
}

impl Backend {
    pub(crate) fn open(path: &str) -> Result<Self, DeviceError> {
        let fd = rustix::fs::open(path, OFlags::RDWR, Mode::empty())
            .map_err(|e| DeviceError::Os(e.raw_os_error()))?;

        Ok(Self { fd })
    }

    pub(crate) fn device_type(&self) -> DeviceType {
        DeviceType::Unknown
    }

    pub(crate) fn read_at(&mut self, buffer: &mut [u8], offset: u64) -> Result<(), DeviceError> {
        rustix::fs::seek(&self.fd, SeekFrom::Start(offset))
            .map_err(|e| DeviceError::Os(e.raw_os_error()))?;
        rustix::io::read(&self.fd, buffer).map_err(|e| DeviceError::Os(e.raw_os_error()))?;

        Ok(())
    }
}
