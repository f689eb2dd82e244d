use uuid::Uuid;

use crate::OwnerId;

pub const OWNER_U: &str = "e2c56db5-dffb-48d2-b060-d0f5a71096e0";
pub const OWNER_V: &str = "74278bda-b644-4520-8f0c-720eaf059935";

/// Deterministic non-zero owner whose bytes are all `n`.
pub fn owner(n: u8) -> OwnerId {
    assert_ne!(n, 0, "zero is the null owner");
    OwnerId::from_bytes([n; 16])
}

pub fn owner_u() -> OwnerId {
    OwnerId::from(Uuid::parse_str(OWNER_U).unwrap())
}

pub fn owner_v() -> OwnerId {
    OwnerId::from(Uuid::parse_str(OWNER_V).unwrap())
}
