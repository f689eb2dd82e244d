//! Lock data model: ownership state, owner identifiers and positions.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::ProtocolError;

/// Length in bytes of an [`OwnerId`].
pub const OWNER_ID_LEN: usize = 16;

/// Ownership state of the lock. The discriminants are the values exposed on
/// the protocol `state` attribute and persisted as the diagnostic state byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    /// No owner, accepts claims
    Unclaimed = 0,
    /// Owned and monitored for tamper
    Claimed = 1,
    /// Claim accepted, waiting for the lock to be physically closed
    RequestedClaim = 2,
    /// Release accepted, waiting for the lock to be physically opened
    RequestedRelease = 3,
    /// Fault or maintenance; rejects every request
    Support = 4,
    /// Not yet initialized
    Unknown = 255,
}

impl LockState {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LockState::Unclaimed),
            1 => Some(LockState::Claimed),
            2 => Some(LockState::RequestedClaim),
            3 => Some(LockState::RequestedRelease),
            4 => Some(LockState::Support),
            255 => Some(LockState::Unknown),
            _ => None,
        }
    }

    /// Static human readable explanation served on the `state-description`
    /// attribute.
    pub const fn description(self) -> &'static str {
        match self {
            LockState::Unknown => "[uint 255] Unknown: The device has not yet initialized the lock state. This should never happen.",
            LockState::Unclaimed => "[uint 0] Unclaimed: The device can accept claims requests as it has no owner yet.",
            LockState::Claimed => "[uint 1] Claimed: The device is claimed and in use by a user and cannot be claimed by another user.",
            LockState::RequestedClaim => "[uint 2] Requested Claim: The device has received a claim request and is waiting for the user to confirm the claim.",
            LockState::RequestedRelease => "[uint 3] Requested Release: The device has received a release request and is waiting for the user to confirm the release.",
            LockState::Support => "[uint 4] Support: The device is in support mode and need maintenance. Unavailable.",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LockState::Unclaimed => "unclaimed",
            LockState::Claimed => "claimed",
            LockState::RequestedClaim => "requested_claim",
            LockState::RequestedRelease => "requested_release",
            LockState::Support => "support",
            LockState::Unknown => "unknown",
        }
    }

    /// States that only exist until a physical event confirms them.
    pub const fn is_transient(self) -> bool {
        matches!(self, LockState::RequestedClaim | LockState::RequestedRelease)
    }
}

impl fmt::Display for LockState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 16-byte owner identifier. The all-zero value means "no owner".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OwnerId([u8; OWNER_ID_LEN]);

impl OwnerId {
    pub const ZERO: OwnerId = OwnerId([0; OWNER_ID_LEN]);

    pub const fn from_bytes(bytes: [u8; OWNER_ID_LEN]) -> Self {
        OwnerId(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let bytes: [u8; OWNER_ID_LEN] = bytes
            .try_into()
            .map_err(|_| ProtocolError::InvalidOwnerLength(bytes.len()))?;
        Ok(OwnerId(bytes))
    }

    /// Parses a textual uuid (`8-4-4-4-12` hex) into its canonical byte order.
    pub fn parse_str(text: &str) -> Result<Self, ProtocolError> {
        Uuid::parse_str(text.trim())
            .map(|uuid| OwnerId(uuid.into_bytes()))
            .map_err(|e| ProtocolError::InvalidOwnerText(e.to_string()))
    }

    pub const fn as_bytes(&self) -> &[u8; OWNER_ID_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; OWNER_ID_LEN]
    }
}

impl From<Uuid> for OwnerId {
    fn from(uuid: Uuid) -> Self {
        OwnerId(uuid.into_bytes())
    }
}

impl FromStr for OwnerId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OwnerId::parse_str(s)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fmt::Display::fmt(&Uuid::from_bytes(self.0).hyphenated(), f)
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "OwnerId({})", self)
    }
}

/// Debounced reading of the lock mechanism. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalPosition {
    Unknown,
    Open,
    Closed,
}

impl PhysicalPosition {
    /// Maps a digital input level to a position given the level that means
    /// open.
    pub fn from_level(
        level: u8,
        open_level: u8,
    ) -> Self {
        if level == open_level {
            PhysicalPosition::Open
        } else {
            PhysicalPosition::Closed
        }
    }
}

impl fmt::Display for PhysicalPosition {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            PhysicalPosition::Unknown => f.write_str("unknown"),
            PhysicalPosition::Open => f.write_str("open"),
            PhysicalPosition::Closed => f.write_str("closed"),
        }
    }
}

/// Commanded bolt position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoltPosition {
    /// Bolt retracted: the lock can be opened
    Open,
    /// Bolt engaged: the lock cannot be opened
    Closed,
}
