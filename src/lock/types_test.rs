use std::str::FromStr;

use super::*;
use crate::ProtocolError;

#[test]
fn test_state_bytes_match_wire_values() {
    let cases = [
        (LockState::Unclaimed, 0),
        (LockState::Claimed, 1),
        (LockState::RequestedClaim, 2),
        (LockState::RequestedRelease, 3),
        (LockState::Support, 4),
        (LockState::Unknown, 255),
    ];
    for (state, byte) in cases {
        assert_eq!(state.as_u8(), byte);
        assert_eq!(LockState::from_u8(byte), Some(state));
        assert!(state.description().starts_with(&format!("[uint {}]", byte)));
    }
    assert_eq!(LockState::from_u8(5), None);
}

#[test]
fn test_only_requested_states_are_transient() {
    assert!(LockState::RequestedClaim.is_transient());
    assert!(LockState::RequestedRelease.is_transient());
    assert!(!LockState::Claimed.is_transient());
    assert!(!LockState::Support.is_transient());
}

#[test]
fn test_owner_zero_is_null() {
    assert!(OwnerId::ZERO.is_zero());
    assert!(OwnerId::default().is_zero());
    assert!(!OwnerId::from_bytes([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]).is_zero());
}

#[test]
fn test_owner_text_uses_canonical_byte_order() {
    let owner = OwnerId::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
    assert_eq!(
        owner.as_bytes(),
        &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]
    );
    assert_eq!(owner.to_string(), "00112233-4455-6677-8899-aabbccddeeff");
    assert_eq!(OwnerId::from_str(&owner.to_string()).unwrap(), owner);
}

#[test]
fn test_owner_parse_errors() {
    assert!(matches!(
        OwnerId::parse_str("not-a-uuid"),
        Err(ProtocolError::InvalidOwnerText(_))
    ));
    assert_eq!(
        OwnerId::from_slice(&[1; 15]),
        Err(ProtocolError::InvalidOwnerLength(15))
    );
    assert_eq!(OwnerId::from_slice(&[1; 16]).unwrap(), OwnerId::from_bytes([1; 16]));
}

#[test]
fn test_position_from_level() {
    assert_eq!(PhysicalPosition::from_level(1, 1), PhysicalPosition::Open);
    assert_eq!(PhysicalPosition::from_level(0, 1), PhysicalPosition::Closed);
    // inverted wiring
    assert_eq!(PhysicalPosition::from_level(0, 0), PhysicalPosition::Open);
}
