use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use super::AttError;
use super::Attribute;
use super::LinkSecurity;
use crate::LockController;
use crate::LockState;
use crate::OwnerId;
use crate::ProtocolError;
use crate::OWNER_ID_LEN;

/// Length of a hyphenated textual uuid.
const OWNER_TEXT_LEN: usize = 36;

/// Thin adapter from attribute reads/writes to [`LockController`] calls.
#[derive(Clone)]
pub struct ProtocolBridge {
    controller: Arc<LockController>,
}

impl ProtocolBridge {
    pub fn new(controller: Arc<LockController>) -> Self {
        Self { controller }
    }

    pub fn read(
        &self,
        attr: Attribute,
    ) -> Result<Vec<u8>, AttError> {
        if !attr.permissions().read {
            debug!("read of write-only attribute {:?} refused", attr);
            return Err(AttError::ReadNotPermitted);
        }

        let state = self.controller.get_state();
        match attr {
            Attribute::State => Ok(vec![state.as_u8()]),
            Attribute::StateDescription => Ok(state.description().as_bytes().to_vec()),
            Attribute::RequestClaim | Attribute::RequestRelease => Err(AttError::ReadNotPermitted),
        }
    }

    /// Handles a write and returns the state entered by the request.
    pub fn write(
        &self,
        attr: Attribute,
        payload: &[u8],
        link: LinkSecurity,
    ) -> Result<LockState, AttError> {
        let permissions = attr.permissions();
        if !permissions.write {
            debug!("write to read-only attribute {:?} refused", attr);
            return Err(AttError::WriteNotPermitted);
        }
        if permissions.write_encrypted && !link.is_sufficient() {
            warn!("write to {:?} over an insufficiently secured link refused", attr);
            return Err(AttError::InsufficientEncryption);
        }

        let owner = decode_owner(payload).map_err(|e| {
            warn!("rejecting {:?} write: {}", attr, e);
            AttError::from(e)
        })?;

        let result = match attr {
            Attribute::RequestClaim => self.controller.request_claim(owner),
            Attribute::RequestRelease => self.controller.request_release(owner),
            Attribute::State | Attribute::StateDescription => return Err(AttError::WriteNotPermitted),
        };

        match result {
            Ok(accepted) => {
                info!("{:?} from {} accepted, state {}", attr, owner, accepted.state);
                Ok(accepted.state)
            }
            Err(e) => {
                info!("{:?} from {} rejected: {}", attr, owner, e);
                Err(e.into())
            }
        }
    }

    pub fn read_by_uuid(
        &self,
        uuid: &Uuid,
    ) -> Result<Vec<u8>, AttError> {
        let attr = Attribute::from_uuid(uuid).ok_or(AttError::AttributeNotFound)?;
        self.read(attr)
    }

    pub fn write_by_uuid(
        &self,
        uuid: &Uuid,
        payload: &[u8],
        link: LinkSecurity,
    ) -> Result<LockState, AttError> {
        let attr = Attribute::from_uuid(uuid).ok_or(AttError::AttributeNotFound)?;
        self.write(attr, payload, link)
    }

    /// State notifications: the receiver observes every transition.
    pub fn subscribe_state(&self) -> watch::Receiver<LockState> {
        self.controller.subscribe()
    }
}

/// Decodes a request payload: 16 raw bytes, or a textual uuid with an
/// optional trailing NUL.
pub fn decode_owner(payload: &[u8]) -> Result<OwnerId, ProtocolError> {
    match payload.len() {
        OWNER_ID_LEN => OwnerId::from_slice(payload),
        OWNER_TEXT_LEN => decode_owner_text(payload),
        len if len == OWNER_TEXT_LEN + 1 && payload[OWNER_TEXT_LEN] == 0 => {
            decode_owner_text(&payload[..OWNER_TEXT_LEN])
        }
        len => Err(ProtocolError::InvalidOwnerLength(len)),
    }
}

fn decode_owner_text(payload: &[u8]) -> Result<OwnerId, ProtocolError> {
    let text = std::str::from_utf8(payload).map_err(|e| ProtocolError::InvalidOwnerText(e.to_string()))?;
    OwnerId::parse_str(text)
}
