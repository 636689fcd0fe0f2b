//! Cross-platform raw device access.
//!
//! One backend per platform capability set sits behind [`Device`]: the CAM
//! transport layer on FreeBSD, a plain file descriptor on other POSIX
//! systems, and Win32 handles on Windows. Selection happens at compile time;
//! all three expose the same surface of blocking, synchronous operations.

pub mod classify;

#[cfg(target_os = "freebsd")]
mod cam;
#[cfg(all(unix, not(target_os = "freebsd")))]
mod posix;
#[cfg(windows)]
mod win32;

#[cfg(target_os = "freebsd")]
use cam::Backend;
#[cfg(all(unix, not(target_os = "freebsd")))]
use posix::Backend;
#[cfg(windows)]
use win32::Backend;

pub use classify::DeviceType;

use crate::error::DeviceError;

/// Longest accepted device path, in bytes. Longer paths are rejected rather
/// than truncated.
pub const MAX_DEVICE_PATH: usize = 4096;

/// Outcome of [`Device::reopen`].
#[derive(Debug)]
pub struct Reopened {
    pub result: Result<(), DeviceError>,
    /// Whether releasing the previous handle failed. None of the platform
    /// close paths used here report failure, so this currently always reads
    /// `false`.
    pub close_failed: bool,
}

/// Instrumentation returned by [`Device::read_at`].
///
/// Duration measurement is not wired up in any backend yet and always reads
/// zero.
#[derive(Debug, Clone, Copy)]
pub struct ReadMetrics {
    pub duration_micros: u32,
}

/// An open raw storage device: the originating path plus the platform
/// handle.
///
/// The handle is exclusively owned and released exactly once when the device
/// is dropped. A `Device` carries no internal locking; confine it to one
/// connection for its lifetime or serialize access externally.
#[derive(Debug)]
pub struct Device {
    path: String,
    backend: Option<Backend>,
}

impl Device {
    /// Opens `path` for read/write access.
    pub fn open(path: &str) -> Result<Self, DeviceError> {
        if path.len() > MAX_DEVICE_PATH {
            return Err(DeviceError::PathTooLong {
                len: path.len(),
                max: MAX_DEVICE_PATH,
            });
        }

        let backend = Backend::open(path)?;

        Ok(Self {
            path: path.to_owned(),
            backend: Some(backend),
        })
    }

    /// The path this device was opened from. Unchanged across reopen.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Releases the current handle and re-acquires one for the stored path
    /// with the same access mode.
    ///
    /// This is the recovery path after transient I/O failures (media change,
    /// bus reset). Close errors are swallowed. On open failure the device
    /// holds no handle and every operation returns [`DeviceError::NoDevice`]
    /// until a later `reopen` succeeds. The close-then-open pair is not
    /// atomic with respect to other observers of the same path.
    pub fn reopen(&mut self) -> Reopened {
        self.backend = None;

        let result = match Backend::open(&self.path) {
            Ok(backend) => {
                self.backend = Some(backend);
                Ok(())
            }
            Err(err) => Err(err),
        };

        Reopened {
            result,
            close_failed: false,
        }
    }

    /// Classifies the device's command protocol family.
    ///
    /// Classification is advisory: any inability to determine the type
    /// degrades to [`DeviceType::Unknown`] rather than an error. The only
    /// error is operating on a device whose handle is gone. Repeated calls
    /// query the live device again; nothing is cached.
    pub fn device_type(&self) -> Result<DeviceType, DeviceError> {
        let backend = self.backend.as_ref().ok_or(DeviceError::NoDevice)?;

        Ok(backend.device_type())
    }

    /// Reads up to `buffer.len()` bytes at the absolute byte `offset`.
    ///
    /// One seek, one read. A short read near the end of the device is not an
    /// error, and nothing is retried here; callers wanting recovery go
    /// through [`Device::reopen`].
    pub fn read_at(&mut self, buffer: &mut [u8], offset: u64) -> Result<ReadMetrics, DeviceError> {
        let backend = self.backend.as_mut().ok_or(DeviceError::NoDevice)?;

        backend.read_at(buffer, offset)?;

        Ok(ReadMetrics { duration_micros: 0 })
    }
}
