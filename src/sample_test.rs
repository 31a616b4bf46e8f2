use super::*;
use std::collections::BTreeMap;

fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_has_tag_matches_exact_value() {
    let s = Sample::new(1000, "cpu", 45.2, tags(&[("host", "s1")]));
    assert!(s.has_tag("host", "s1"));
    assert!(!s.has_tag("host", "s2"));
    assert!(!s.has_tag("rack", "s1"));
}

#[test]
fn test_empty_tags_have_no_tag() {
    let s = Sample::new(1000, "cpu", 1.0, BTreeMap::new());
    assert!(!s.has_tag("host", "s1"));
}

#[test]
fn test_serde_roundtrip_is_exact() {
    let s = Sample::new(1000, "cpu", 45.2, tags(&[("host", "s1"), ("dc", "us")]));
    let line = serde_json::to_string(&s).unwrap();
    let back: Sample = serde_json::from_str(&line).unwrap();
    assert_eq!(s, back);
}
