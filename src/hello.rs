//! The fixed-format handshake record announcing server identity.
//!
//! The record is written raw to every client immediately after connect, with
//! no framing beyond its embedded length field. Multi-byte integers are
//! little-endian regardless of host order; string fields are fixed-width,
//! zero-padded, and always keep at least one trailing zero byte.

use crate::error::HelloError;

/// Protocol magic identifying this server family (LE `"RSCP"`).
pub const REMOTE_ID: u32 = u32::from_le_bytes(*b"RSCP");
/// Packet magic (LE `"PCKT"`).
pub const PACKET_ID: u32 = u32::from_le_bytes(*b"PCKT");
/// Packet-format revision.
pub const PACKET_VERSION: u8 = 1;
/// Packet-type tag for the hello record.
pub const PACKET_TYPE_HELLO: u8 = 1;
/// Highest protocol revision this server speaks.
pub const PROTOCOL_MAX: u8 = 2;

/// Product name advertised in the handshake.
pub const APPLICATION_NAME: &str = "Remscope Remote Server";

const HEADER_LEN: usize = 16;
const APPLICATION_LEN: usize = 128;
const VERSION_LEN: usize = 64;
const UTS_FIELD_LEN: usize = 256;

/// Byte offsets of the wire layout, public so decoders and tests agree on a
/// single definition.
pub const APPLICATION_OFFSET: usize = HEADER_LEN;
pub const VERSION_OFFSET: usize = APPLICATION_OFFSET + APPLICATION_LEN;
pub const MAX_PROTOCOL_OFFSET: usize = VERSION_OFFSET + VERSION_LEN;
pub const SYSNAME_OFFSET: usize = MAX_PROTOCOL_OFFSET + 4;
pub const RELEASE_OFFSET: usize = SYSNAME_OFFSET + UTS_FIELD_LEN;
pub const MACHINE_OFFSET: usize = RELEASE_OFFSET + UTS_FIELD_LEN;

/// Host identification as reported by the operating system.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    pub sysname: String,
    pub release: String,
    pub machine: String,
}

/// Queries the running host's identification.
#[cfg(unix)]
pub fn host_identity() -> Result<HostIdentity, HelloError> {
    let uts = rustix::system::uname();

    Ok(HostIdentity {
        sysname: uts.sysname().to_string_lossy().into_owned(),
        release: uts.release().to_string_lossy().into_owned(),
        machine: uts.machine().to_string_lossy().into_owned(),
    })
}

/// Queries the running host's identification.
#[cfg(windows)]
pub fn host_identity() -> Result<HostIdentity, HelloError> {
    use std::mem;

    use windows_sys::Win32::Foundation::GetLastError;
    use windows_sys::Win32::System::SystemInformation::{
        GetNativeSystemInfo, GetVersionExW, OSVERSIONINFOW, PROCESSOR_ARCHITECTURE_AMD64,
        PROCESSOR_ARCHITECTURE_ARM64, PROCESSOR_ARCHITECTURE_INTEL, SYSTEM_INFO,
    };

    let mut version: OSVERSIONINFOW = unsafe { mem::zeroed() };
    version.dwOSVersionInfoSize = mem::size_of::<OSVERSIONINFOW>() as u32;
    if unsafe { GetVersionExW(&mut version) } == 0 {
        return Err(HelloError::HostIdentity(unsafe { GetLastError() } as i32));
    }

    let mut system: SYSTEM_INFO = unsafe { mem::zeroed() };
    unsafe { GetNativeSystemInfo(&mut system) };
    let machine = match unsafe { system.Anonymous.Anonymous.wProcessorArchitecture } {
        PROCESSOR_ARCHITECTURE_AMD64 => "x86_64",
        PROCESSOR_ARCHITECTURE_ARM64 => "aarch64",
        PROCESSOR_ARCHITECTURE_INTEL => "i686",
        _ => "unknown",
    };

    Ok(HostIdentity {
        sysname: "Windows".to_owned(),
        release: format!(
            "{}.{}.{}",
            version.dwMajorVersion, version.dwMinorVersion, version.dwBuildNumber
        ),
        machine: machine.to_owned(),
    })
}

/// The handshake record. Built fresh per connection; has no identity beyond
/// the bytes [`HelloPacket::to_bytes`] produces.
#[derive(Debug, Clone)]
pub struct HelloPacket {
    pub application: String,
    pub version: String,
    pub max_protocol: u8,
    pub sysname: String,
    pub release: String,
    pub machine: String,
}

impl HelloPacket {
    /// Total serialized size; also the value of the embedded `len` field.
    pub const WIRE_LEN: usize = MACHINE_OFFSET + UTS_FIELD_LEN;

    /// Builds a packet from the live host identity.
    pub fn gather() -> Result<Self, HelloError> {
        Ok(Self::from_identity(host_identity()?))
    }

    pub fn from_identity(identity: HostIdentity) -> Self {
        Self {
            application: APPLICATION_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            max_protocol: PROTOCOL_MAX,
            sysname: identity.sysname,
            release: identity.release,
            machine: identity.machine,
        }
    }

    /// Serializes to the exact wire image.
    pub fn to_bytes(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [0u8; Self::WIRE_LEN];

        out[0..4].copy_from_slice(&REMOTE_ID.to_le_bytes());
        out[4..8].copy_from_slice(&PACKET_ID.to_le_bytes());
        out[8..12].copy_from_slice(&(Self::WIRE_LEN as u32).to_le_bytes());
        out[12] = PACKET_VERSION;
        out[13] = PACKET_TYPE_HELLO;
        // bytes 14..16 reserved

        copy_bounded(&mut out[APPLICATION_OFFSET..VERSION_OFFSET], self.application.as_bytes());
        copy_bounded(&mut out[VERSION_OFFSET..MAX_PROTOCOL_OFFSET], self.version.as_bytes());
        out[MAX_PROTOCOL_OFFSET] = self.max_protocol;
        // three reserved bytes after max_protocol
        copy_bounded(&mut out[SYSNAME_OFFSET..RELEASE_OFFSET], self.sysname.as_bytes());
        copy_bounded(&mut out[RELEASE_OFFSET..MACHINE_OFFSET], self.release.as_bytes());
        copy_bounded(&mut out[MACHINE_OFFSET..], self.machine.as_bytes());

        out
    }
}

/// Copies `src` into the fixed-width field `dst`, truncating to one byte
/// less than the field width so the field always ends in a zero.
fn copy_bounded(dst: &mut [u8], src: &[u8]) {
    let n = src.len().min(dst.len() - 1);
    dst[..n].copy_from_slice(&src[..n]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_bounded_keeps_a_trailing_zero() {
        let mut field = [0u8; 8];
        copy_bounded(&mut field, b"exactly!");
        assert_eq!(&field, b"exactly\0");
    }

    #[test]
    fn copy_bounded_truncates_oversized_sources() {
        let mut field = [0u8; 8];
        copy_bounded(&mut field, b"far too long for the field");
        assert_eq!(&field, b"far too\0");
    }

    #[test]
    fn layout_offsets_are_consistent() {
        assert_eq!(APPLICATION_OFFSET, 16);
        assert_eq!(VERSION_OFFSET, 144);
        assert_eq!(MAX_PROTOCOL_OFFSET, 208);
        assert_eq!(SYSNAME_OFFSET, 212);
        assert_eq!(RELEASE_OFFSET, 468);
        assert_eq!(MACHINE_OFFSET, 724);
        assert_eq!(HelloPacket::WIRE_LEN, 980);
    }
}
