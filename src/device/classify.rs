//! Protocol-family classification of storage devices.
//!
//! Each platform reports a numeric bus or protocol identifier; the tables
//! here fold those onto one enum. They are plain data so tests can enumerate
//! every input code.

use std::fmt;

/// Command-protocol family of a storage device, independent of how or whether
/// it is mounted. Discriminants are the values carried on the wire.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Unknown = 0,
    Ata = 1,
    Atapi = 2,
    Scsi = 3,
    SecureDigital = 4,
    Mmc = 5,
    Nvme = 6,
}

impl DeviceType {
    pub fn wire_code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceType::Unknown => "Unknown",
            DeviceType::Ata => "ATA",
            DeviceType::Atapi => "ATAPI",
            DeviceType::Scsi => "SCSI",
            DeviceType::SecureDigital => "SecureDigital",
            DeviceType::Mmc => "MMC",
            DeviceType::Nvme => "NVMe",
        };
        write!(f, "{name}")
    }
}

/// Windows `STORAGE_BUS_TYPE` values mapped to protocol families. Codes
/// absent from the table (RAID and the virtual bus types among them)
/// classify as `Unknown`.
pub const STORAGE_BUS_TYPE_MAP: &[(u32, DeviceType)] = &[
    (0x01, DeviceType::Scsi),
    (0x02, DeviceType::Atapi),
    (0x03, DeviceType::Ata),
    (0x04, DeviceType::Scsi), // IEEE 1394
    (0x05, DeviceType::Scsi), // SSA
    (0x06, DeviceType::Scsi), // Fibre Channel
    (0x07, DeviceType::Scsi), // USB
    (0x09, DeviceType::Scsi), // iSCSI
    (0x0a, DeviceType::Scsi), // SAS
    (0x0b, DeviceType::Ata),  // SATA
    (0x0c, DeviceType::SecureDigital),
    (0x0d, DeviceType::Mmc),
    (0x11, DeviceType::Nvme),
];

pub fn classify_storage_bus(code: u32) -> DeviceType {
    lookup(STORAGE_BUS_TYPE_MAP, code)
}

/// CAM `cam_proto` values mapped to protocol families. SATA port multipliers
/// report as ATA. MMC and SD cannot be told apart at this level; both report
/// as MMC.
pub const CAM_PROTOCOL_MAP: &[(u32, DeviceType)] = &[
    (2, DeviceType::Scsi),  // PROTO_SCSI
    (3, DeviceType::Ata),   // PROTO_ATA
    (4, DeviceType::Atapi), // PROTO_ATAPI
    (5, DeviceType::Ata),   // PROTO_SATAPM
    (7, DeviceType::Nvme),  // PROTO_NVME
    (8, DeviceType::Mmc),   // PROTO_MMCSD
];

pub fn classify_cam_protocol(protocol: u32) -> DeviceType {
    lookup(CAM_PROTOCOL_MAP, protocol)
}

fn lookup(table: &[(u32, DeviceType)], code: u32) -> DeviceType {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, device_type)| *device_type)
        .unwrap_or(DeviceType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_bus_codes_map_exhaustively() {
        let expected = [
            (0x00, DeviceType::Unknown),
            (0x01, DeviceType::Scsi),
            (0x02, DeviceType::Atapi),
            (0x03, DeviceType::Ata),
            (0x04, DeviceType::Scsi),
            (0x05, DeviceType::Scsi),
            (0x06, DeviceType::Scsi),
            (0x07, DeviceType::Scsi),
            (0x08, DeviceType::Unknown), // RAID
            (0x09, DeviceType::Scsi),
            (0x0a, DeviceType::Scsi),
            (0x0b, DeviceType::Ata),
            (0x0c, DeviceType::SecureDigital),
            (0x0d, DeviceType::Mmc),
            (0x0e, DeviceType::Unknown), // virtual
            (0x0f, DeviceType::Unknown), // file-backed virtual
            (0x10, DeviceType::Unknown), // storage spaces
            (0x11, DeviceType::Nvme),
            (0x12, DeviceType::Unknown), // SCM
            (0x13, DeviceType::Unknown), // UFS
        ];

        for (code, device_type) in expected {
            assert_eq!(classify_storage_bus(code), device_type, "bus code {code:#x}");
        }
    }

    #[test]
    fn cam_protocols_map_exhaustively() {
        let expected = [
            (0, DeviceType::Unknown), // PROTO_UNKNOWN
            (1, DeviceType::Unknown), // PROTO_UNSPECIFIED
            (2, DeviceType::Scsi),
            (3, DeviceType::Ata),
            (4, DeviceType::Atapi),
            (5, DeviceType::Ata),
            (6, DeviceType::Unknown), // PROTO_SEMB
            (7, DeviceType::Nvme),
            (8, DeviceType::Mmc),
            (9, DeviceType::Unknown),
        ];

        for (protocol, device_type) in expected {
            assert_eq!(classify_cam_protocol(protocol), device_type, "protocol {protocol}");
        }
    }

    #[test]
    fn wire_codes_match_protocol_values() {
        assert_eq!(DeviceType::Unknown.wire_code(), 0);
        assert_eq!(DeviceType::Ata.wire_code(), 1);
        assert_eq!(DeviceType::Atapi.wire_code(), 2);
        assert_eq!(DeviceType::Scsi.wire_code(), 3);
        assert_eq!(DeviceType::SecureDigital.wire_code(), 4);
        assert_eq!(DeviceType::Mmc.wire_code(), 5);
        assert_eq!(DeviceType::Nvme.wire_code(), 6);
    }

    #[test]
    fn display_names_match_family_spelling() {
        assert_eq!(DeviceType::Nvme.to_string(), "NVMe");
        assert_eq!(DeviceType::Atapi.to_string(), "ATAPI");
        assert_eq!(DeviceType::SecureDigital.to_string(), "SecureDigital");
    }
}
