use claimlock::AttError;
use claimlock::Attribute;
use claimlock::LinkSecurity;
use claimlock::LockState;
use claimlock::PhysicalPosition;
use claimlock::REQUEST_CLAIM_UUID;
use claimlock::REQUEST_RELEASE_UUID;
use claimlock::STATE_UUID;

use crate::common::owner;
use crate::common::TestLock;

const ALICE: &str = "2f1d5c1e-0b7a-4f43-9c59-1c8f0f3c6a11";
const BOB: &str = "9a4e2b77-51d3-4c8e-8f0e-3b6d7e1a2c44";

/// # Case: full claim / release cycle over the attribute interface
///
/// ## Criterias:
/// 1. the claim is pending until the lock is physically closed
/// 2. another user cannot claim or release meanwhile
/// 3. opening the claimed lock raises the alarm, closing clears it
/// 4. the owner's release completes once the lock opens
#[tokio::test]
async fn test_claim_release_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let lock = TestLock::start(dir.path(), PhysicalPosition::Closed);
    let bridge = lock.node.bridge().clone();
    let link = LinkSecurity::secure();

    assert_eq!(bridge.read_by_uuid(&STATE_UUID).unwrap(), vec![0]);

    let mut claim = ALICE.as_bytes().to_vec();
    claim.push(0);
    assert_eq!(
        bridge.write_by_uuid(&REQUEST_CLAIM_UUID, &claim, link),
        Ok(LockState::RequestedClaim)
    );
    assert_eq!(
        bridge.write(Attribute::RequestClaim, owner(BOB).as_bytes(), link),
        Err(AttError::InvalidState)
    );

    lock.physical(PhysicalPosition::Open).await;
    lock.physical(PhysicalPosition::Closed).await;
    lock.wait_for_state(LockState::Claimed).await;
    assert_eq!(lock.node.controller().owner(), owner(ALICE));

    assert_eq!(
        bridge.write_by_uuid(&REQUEST_RELEASE_UUID, owner(BOB).as_bytes(), link),
        Err(AttError::OwnerMismatch)
    );

    lock.physical(PhysicalPosition::Open).await;
    lock.wait_for_alarm(true).await;
    lock.physical(PhysicalPosition::Closed).await;
    lock.wait_for_alarm(false).await;
    assert_eq!(lock.board.alarm_commands(true), 1);

    assert_eq!(
        bridge.write(Attribute::RequestRelease, owner(ALICE).as_bytes(), link),
        Ok(LockState::RequestedRelease)
    );
    lock.physical(PhysicalPosition::Open).await;
    lock.wait_for_state(LockState::Unclaimed).await;
    assert!(lock.node.controller().owner().is_zero());

    lock.stop().await;
}

#[tokio::test]
async fn test_requests_need_secure_link() {
    let dir = tempfile::tempdir().unwrap();
    let lock = TestLock::start(dir.path(), PhysicalPosition::Closed);

    let result = lock.node.bridge().write(
        Attribute::RequestClaim,
        owner(ALICE).as_bytes(),
        LinkSecurity {
            encrypted: true,
            authenticated: true,
            key_size: 8,
        },
    );

    assert_eq!(result, Err(AttError::InsufficientEncryption));
    assert_eq!(lock.node.state(), LockState::Unclaimed);
    lock.stop().await;
}
