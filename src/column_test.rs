use super::*;
use std::collections::BTreeMap;

fn sample(ts: i64) -> Sample {
    Sample::new(ts, "m", 1.0, BTreeMap::new())
}

#[test]
fn test_push_preserves_insertion_order() {
    let mut col = Column::new();
    col.push(sample(1000));
    col.push(sample(2000));
    assert_eq!(col.len(), 2);
    assert_eq!(col.get(0).unwrap().timestamp, 1000);
    assert_eq!(col.get(1).unwrap().timestamp, 2000);
}

#[test]
fn test_lower_bound_half_open() {
    let mut col = Column::new();
    for ts in [1000, 1000, 2000, 3000] {
        col.push(sample(ts));
    }
    assert_eq!(col.lower_bound(1000), 0);
    assert_eq!(col.lower_bound(1500), 2);
    assert_eq!(col.lower_bound(2000), 2);
    assert_eq!(col.lower_bound(3001), 4);
    assert_eq!(col.lower_bound(i64::MIN), 0);
}

#[test]
fn test_evict_before_shifts_positions() {
    let mut col = Column::new();
    for ts in [100, 200, 300, 400] {
        col.push(sample(ts));
    }
    let dropped = col.evict_before(2);
    assert_eq!(dropped, 2);
    assert_eq!(col.len(), 2);
    assert_eq!(col.get(0).unwrap().timestamp, 300);
    assert_eq!(col.get(1).unwrap().timestamp, 400);
}

#[test]
fn test_evict_before_clamps_to_len() {
    let mut col = Column::new();
    col.push(sample(1));
    let dropped = col.evict_before(50);
    assert_eq!(dropped, 1);
    assert!(col.is_empty());
}
