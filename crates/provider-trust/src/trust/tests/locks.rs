use crate::trust::domain::ProfileId;
use crate::trust::locks::ProfileLocks;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn same_profile_work_never_overlaps() {
    let locks = Arc::new(ProfileLocks::default());
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let locks = Arc::clone(&locks);
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            thread::spawn(move || {
                locks.with_profile(&ProfileId("shared".to_string()), || {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(2));
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                })
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread joins");
    }

    assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    assert_eq!(locks.active(), 0, "idle slots are released");
}

#[test]
fn distinct_profiles_hold_separate_slots() {
    let locks = ProfileLocks::default();

    let nested = locks.with_profile(&ProfileId("a".to_string()), || {
        locks.with_profile(&ProfileId("b".to_string()), || locks.active())
    });

    assert_eq!(nested, 2);
    assert_eq!(locks.active(), 0);
}

#[test]
fn panicking_work_still_releases_its_slot() {
    let locks = ProfileLocks::default();
    let id = ProfileId("panics".to_string());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        locks.with_profile(&id, || panic!("repository blew up"))
    }));

    assert!(outcome.is_err());
    assert_eq!(locks.active(), 0);
    assert_eq!(locks.with_profile(&id, || 7), 7);
    assert_eq!(locks.active(), 0);
}
