use claimlock::Attribute;
use claimlock::LinkSecurity;
use claimlock::LockState;
use claimlock::PhysicalPosition;

use crate::common::owner;
use crate::common::TestLock;

const CAROL: &str = "c0ffee00-1234-4cde-8abc-0123456789ab";

async fn claim_and_stop(dir: &std::path::Path) {
    let lock = TestLock::start(dir, PhysicalPosition::Closed);
    lock.node
        .bridge()
        .write(Attribute::RequestClaim, owner(CAROL).as_bytes(), LinkSecurity::secure())
        .expect("claim accepted");
    lock.physical(PhysicalPosition::Open).await;
    lock.physical(PhysicalPosition::Closed).await;
    lock.wait_for_state(LockState::Claimed).await;
    lock.stop().await;
}

#[tokio::test]
async fn test_ownership_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    claim_and_stop(dir.path()).await;

    let lock = TestLock::start(dir.path(), PhysicalPosition::Closed);

    assert_eq!(lock.node.state(), LockState::Claimed);
    assert_eq!(lock.node.controller().owner(), owner(CAROL));
    assert!(!lock.board.alarm());
    lock.stop().await;
}

/// # Case: lock opened while powered off
///
/// ## Criterias:
/// 1. the restarted node is in Support with the alarm on
/// 2. it refuses claims and releases
#[tokio::test]
async fn test_open_at_boot_is_tamper() {
    let dir = tempfile::tempdir().unwrap();
    claim_and_stop(dir.path()).await;

    let lock = TestLock::start(dir.path(), PhysicalPosition::Open);

    assert_eq!(lock.node.state(), LockState::Support);
    assert!(lock.board.alarm());
    assert!(lock
        .node
        .bridge()
        .write(Attribute::RequestRelease, owner(CAROL).as_bytes(), LinkSecurity::secure())
        .is_err());
    lock.stop().await;
}

#[tokio::test]
async fn test_release_clears_persisted_owner() {
    let dir = tempfile::tempdir().unwrap();
    claim_and_stop(dir.path()).await;

    let lock = TestLock::start(dir.path(), PhysicalPosition::Closed);
    lock.node
        .bridge()
        .write(Attribute::RequestRelease, owner(CAROL).as_bytes(), LinkSecurity::secure())
        .expect("release accepted");
    lock.physical(PhysicalPosition::Open).await;
    lock.wait_for_state(LockState::Unclaimed).await;
    lock.stop().await;

    let lock = TestLock::start(dir.path(), PhysicalPosition::Open);
    assert_eq!(lock.node.state(), LockState::Unclaimed);
    assert!(!lock.board.alarm());
    lock.stop().await;
}
