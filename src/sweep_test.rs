use super::*;
use std::sync::atomic::AtomicUsize;

#[test]
fn test_sweep_runs_at_least_once_then_stops_promptly() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    let mut handle = SweepHandle::spawn(Duration::from_millis(20), move || {
        c.fetch_add(1, Ordering::Relaxed);
    });

    thread::sleep(Duration::from_millis(70));
    handle.stop();

    assert!(counter.load(Ordering::Relaxed) >= 2);
}

#[test]
fn test_drop_stops_thread() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    {
        let _handle = SweepHandle::spawn(Duration::from_millis(500), move || {
            c.fetch_add(1, Ordering::Relaxed);
        });
        // dropped immediately; should not block the test for 500ms.
    }
    assert_eq!(counter.load(Ordering::Relaxed), 0);
}
