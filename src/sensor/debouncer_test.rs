use std::time::Duration;

use tokio::time::Instant;

use super::*;

const QUIET: Duration = Duration::from_millis(200);

#[test]
fn test_first_edge_is_accepted() {
    let mut debouncer = Debouncer::new(QUIET);
    let now = Instant::now();

    assert!(debouncer.accept(now));
    assert_eq!(debouncer.last_accepted(), Some(now));
}

/// # Case: debounce boundary
///
/// ## Criterias:
/// 1. an edge 199ms after the accepted one is discarded
/// 2. an edge exactly one quiet period after it is forwarded
#[test]
fn test_quiet_period_boundary() {
    let mut debouncer = Debouncer::new(QUIET);
    let t0 = Instant::now();

    assert!(debouncer.accept(t0));
    assert!(!debouncer.accept(t0 + Duration::from_millis(199)));
    assert!(debouncer.accept(t0 + QUIET));
}

#[test]
fn test_rejected_edges_do_not_extend_window() {
    let mut debouncer = Debouncer::new(QUIET);
    let t0 = Instant::now();

    assert!(debouncer.accept(t0));
    for ms in [50, 100, 150, 199] {
        assert!(!debouncer.accept(t0 + Duration::from_millis(ms)));
    }
    assert_eq!(debouncer.last_accepted(), Some(t0));
    assert!(debouncer.accept(t0 + Duration::from_millis(201)));
}

#[test]
fn test_edges_spaced_beyond_quiet_period_all_forward() {
    let mut debouncer = Debouncer::new(QUIET);
    let t0 = Instant::now();

    let forwarded = (0..5)
        .filter(|i| debouncer.accept(t0 + Duration::from_millis(250 * i)))
        .count();
    assert_eq!(forwarded, 5);
}

#[test]
fn test_out_of_order_timestamp_is_discarded() {
    let mut debouncer = Debouncer::new(QUIET);
    let t0 = Instant::now() + Duration::from_secs(1);

    assert!(debouncer.accept(t0));
    assert!(!debouncer.accept(t0 - Duration::from_millis(500)));
}
