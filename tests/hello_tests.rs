use remscope::hello::{
    APPLICATION_NAME, APPLICATION_OFFSET, HelloPacket, HostIdentity, MACHINE_OFFSET,
    MAX_PROTOCOL_OFFSET, PACKET_ID, PACKET_TYPE_HELLO, PACKET_VERSION, PROTOCOL_MAX, REMOTE_ID,
    SYSNAME_OFFSET,
};

fn identity() -> HostIdentity {
    HostIdentity {
        sysname: "Linux".to_owned(),
        release: "6.8.0-generic".to_owned(),
        machine: "x86_64".to_owned(),
    }
}

fn u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes[..4].try_into().unwrap())
}

#[test]
fn wire_image_has_the_fixed_length_and_header() {
    let bytes = HelloPacket::from_identity(identity()).to_bytes();

    assert_eq!(bytes.len(), HelloPacket::WIRE_LEN);
    assert_eq!(u32_le(&bytes[0..]), REMOTE_ID);
    assert_eq!(u32_le(&bytes[4..]), PACKET_ID);
    assert_eq!(u32_le(&bytes[8..]) as usize, HelloPacket::WIRE_LEN);
    assert_eq!(bytes[12], PACKET_VERSION);
    assert_eq!(bytes[13], PACKET_TYPE_HELLO);
    assert_eq!(bytes[MAX_PROTOCOL_OFFSET], PROTOCOL_MAX);
}

#[test]
fn string_fields_land_at_their_fixed_offsets() {
    let bytes = HelloPacket::from_identity(identity()).to_bytes();

    assert_eq!(
        &bytes[APPLICATION_OFFSET..APPLICATION_OFFSET + APPLICATION_NAME.len()],
        APPLICATION_NAME.as_bytes()
    );
    assert_eq!(&bytes[SYSNAME_OFFSET..SYSNAME_OFFSET + 5], b"Linux");
    assert_eq!(&bytes[MACHINE_OFFSET..MACHINE_OFFSET + 6], b"x86_64");

    // fields shorter than capacity are zero-filled to their full width
    assert!(bytes[MACHINE_OFFSET + 6..].iter().all(|byte| *byte == 0));
}

#[test]
fn oversized_fields_truncate_to_255_bytes() {
    let mut oversized = identity();
    oversized.machine = "m".repeat(300);

    let bytes = HelloPacket::from_identity(oversized).to_bytes();
    let machine = &bytes[MACHINE_OFFSET..];

    assert_eq!(machine.len(), 256);
    assert!(machine[..255].iter().all(|byte| *byte == b'm'));
    assert_eq!(machine[255], 0, "the field always ends in a zero byte");
}

#[test]
fn building_is_repeatable() {
    let first = HelloPacket::from_identity(identity()).to_bytes();
    let second = HelloPacket::from_identity(identity()).to_bytes();

    assert_eq!(first, second);
}

#[test]
fn gather_reflects_the_live_host() {
    let packet = HelloPacket::gather().unwrap();

    assert!(!packet.sysname.is_empty());
    assert_eq!(packet.application, APPLICATION_NAME);
    assert_eq!(packet.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(packet.max_protocol, PROTOCOL_MAX);
}
