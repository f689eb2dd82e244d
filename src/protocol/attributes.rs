use uuid::uuid;
use uuid::Uuid;

use crate::LockError;
use crate::ProtocolError;

pub const LOCK_SERVICE_UUID: Uuid = uuid!("91bad492-b950-4226-aa2b-4ede9fa42f59");
pub const STATE_UUID: Uuid = uuid!("d57e24d2-1fb7-4b9c-a685-6e6f2c2e9cf7");
pub const STATE_DESCRIPTION_UUID: Uuid = uuid!("b3124a83-10af-47d2-80e3-5e5b0c6b7f94");
pub const REQUEST_CLAIM_UUID: Uuid = uuid!("8f3aebd7-3d0a-4b5f-9a5d-7e5d9ecce4d8");
pub const REQUEST_RELEASE_UUID: Uuid = uuid!("68e84b3d-3b31-4c64-b613-2c378d5a906a");

/// Minimum negotiated key size for the encrypted request attributes.
pub const MIN_ENCRYPTION_KEY_SIZE: u8 = 16;

/// Characteristics exposed by the lock service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    State,
    StateDescription,
    RequestClaim,
    RequestRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub notify: bool,
    /// Writes require an encrypted, authenticated link
    pub write_encrypted: bool,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::State,
        Attribute::StateDescription,
        Attribute::RequestClaim,
        Attribute::RequestRelease,
    ];

    pub const fn uuid(self) -> Uuid {
        match self {
            Attribute::State => STATE_UUID,
            Attribute::StateDescription => STATE_DESCRIPTION_UUID,
            Attribute::RequestClaim => REQUEST_CLAIM_UUID,
            Attribute::RequestRelease => REQUEST_RELEASE_UUID,
        }
    }

    pub fn from_uuid(uuid: &Uuid) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.uuid() == *uuid)
    }

    pub const fn permissions(self) -> Permissions {
        match self {
            Attribute::State => Permissions {
                read: true,
                write: false,
                notify: true,
                write_encrypted: false,
            },
            Attribute::StateDescription => Permissions {
                read: true,
                write: false,
                notify: false,
                write_encrypted: false,
            },
            Attribute::RequestClaim | Attribute::RequestRelease => Permissions {
                read: false,
                write: true,
                notify: false,
                write_encrypted: true,
            },
        }
    }
}

/// Security of the link a request arrived on, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkSecurity {
    pub encrypted: bool,
    pub authenticated: bool,
    pub key_size: u8,
}

impl LinkSecurity {
    pub const fn secure() -> Self {
        Self {
            encrypted: true,
            authenticated: true,
            key_size: MIN_ENCRYPTION_KEY_SIZE,
        }
    }

    pub fn is_sufficient(&self) -> bool {
        self.encrypted && self.authenticated && self.key_size >= MIN_ENCRYPTION_KEY_SIZE
    }
}

/// Attribute protocol error codes returned to the remote client.
/// `0x80..` are application codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AttError {
    #[error("read not permitted")]
    ReadNotPermitted = 0x02,

    #[error("write not permitted")]
    WriteNotPermitted = 0x03,

    #[error("attribute not found")]
    AttributeNotFound = 0x0A,

    #[error("invalid attribute value length")]
    InvalidAttributeValueLength = 0x0D,

    #[error("unlikely error")]
    UnlikelyError = 0x0E,

    #[error("insufficient encryption")]
    InsufficientEncryption = 0x0F,

    #[error("request not valid in current lock state")]
    InvalidState = 0x80,

    #[error("requester is not the lock owner")]
    OwnerMismatch = 0x81,

    #[error("null owner identifier")]
    NullOwner = 0x82,
}

impl AttError {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<LockError> for AttError {
    fn from(e: LockError) -> Self {
        match e {
            LockError::InvalidState { .. } => AttError::InvalidState,
            LockError::OwnerMismatch => AttError::OwnerMismatch,
            LockError::NullOwner => AttError::NullOwner,
        }
    }
}

impl From<ProtocolError> for AttError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::InvalidOwnerLength(_) => AttError::InvalidAttributeValueLength,
            ProtocolError::InvalidOwnerText(_) => AttError::UnlikelyError,
        }
    }
}
