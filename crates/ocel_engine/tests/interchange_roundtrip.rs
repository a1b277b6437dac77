use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use ocel_engine::{export_file, import_file, Event, EventLog};
use pretty_assertions::assert_eq;

fn sample_log() -> EventLog {
    let objects = BTreeMap::from([
        ("o1".to_string(), "order".to_string()),
        ("i1".to_string(), "item".to_string()),
    ]);
    let events = vec![
        Event {
            id: "e1".to_string(),
            activity: "Place Order".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap(),
            objects: vec!["o1".to_string(), "i1".to_string()],
        },
        Event {
            id: "e2".to_string(),
            activity: "Pack Items".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 15, 30, 0).unwrap(),
            objects: vec!["i1".to_string()],
        },
    ];
    EventLog::new(events, objects)
}

#[test]
fn export_then_import_preserves_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.jsonocel");

    let original = sample_log();
    export_file(&original, &path).unwrap();
    let imported = import_file(&path).unwrap();

    assert_eq!(imported, original);
}

#[test]
fn import_tolerates_naive_timestamps_and_unknown_objects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lenient.jsonocel");
    let raw = r#"{
        "ocel:global-log": {"ocel:version": "1.0"},
        "ocel:events": {
            "e1": {
                "ocel:activity": "Place Order",
                "ocel:timestamp": "2024-03-05 14:00:00",
                "ocel:omap": ["o1", "ghost"]
            }
        },
        "ocel:objects": {
            "o1": {"ocel:type": "order"}
        }
    }"#;
    std::fs::write(&path, raw).unwrap();

    let log = import_file(&path).unwrap();
    assert_eq!(log.events().len(), 1);
    // The reference to the undeclared object is dropped, the event stays.
    assert_eq!(log.events()[0].objects, vec!["o1".to_string()]);
    assert_eq!(
        log.events()[0].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap()
    );
}

#[test]
fn import_rejects_unparsable_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.jsonocel");
    let raw = r#"{
        "ocel:events": {
            "e1": {"ocel:activity": "A", "ocel:timestamp": "yesterday", "ocel:omap": []}
        },
        "ocel:objects": {}
    }"#;
    std::fs::write(&path, raw).unwrap();

    assert!(import_file(&path).is_err());
}
