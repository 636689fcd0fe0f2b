use thiserror::Error;

/// Status code reserved for caller misuse, outside the range of every native
/// error code (errno and `GetLastError` values are non-negative).
pub const USAGE_ERROR_CODE: i32 = -1;

/// Errors surfaced by the device access layer.
///
/// Native codes are forwarded verbatim so the protocol layer can relay them
/// to the remote client unchanged; usage errors collapse to a reserved
/// negative sentinel the client can tell apart by sign.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Operation against a device that holds no live native handle, or a
    /// command issued before any device was opened for the session.
    #[error("device has no open handle")]
    NoDevice,

    #[error("device path is {len} bytes, above the {max} byte maximum")]
    PathTooLong { len: usize, max: usize },

    /// Native platform error (errno / `GetLastError`), unreinterpreted.
    #[error("os error {0}")]
    Os(i32),
}

impl DeviceError {
    /// The status value written to the wire for this error.
    pub fn wire_code(&self) -> i32 {
        match self {
            DeviceError::NoDevice | DeviceError::PathTooLong { .. } => USAGE_ERROR_CODE,
            DeviceError::Os(code) => *code,
        }
    }
}

/// Failure to assemble the handshake record.
#[derive(Debug, Error)]
pub enum HelloError {
    #[error("could not query host identity: os error {0}")]
    HostIdentity(i32),
}

/// Per-connection failures in the listener. Fatal for the connection, never
/// for the process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Hello(#[from] HelloError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_share_the_reserved_code() {
        assert_eq!(DeviceError::NoDevice.wire_code(), USAGE_ERROR_CODE);
        assert_eq!(
            DeviceError::PathTooLong { len: 5000, max: 4096 }.wire_code(),
            USAGE_ERROR_CODE
        );
    }

    #[test]
    fn native_codes_pass_through_unchanged() {
        assert_eq!(DeviceError::Os(2).wire_code(), 2);
        assert_eq!(DeviceError::Os(13).wire_code(), 13);
    }
}
