//! Process-execution (case) extraction from the event-object graph.

use std::collections::BTreeSet;

use crate::backend::ExecutionExtraction;
use crate::eventlog::EventLog;
use crate::ops::Case;

/// Extracts process executions according to the configured strategy.
pub fn process_executions(log: &EventLog, extraction: &ExecutionExtraction) -> Vec<Case> {
    match extraction {
        ExecutionExtraction::ConnectedComponents => connected_components(log),
        ExecutionExtraction::LeadingType(object_type) => leading_type(log, object_type),
    }
}

/// One case per connected component: events are connected when they share
/// an object.
fn connected_components(log: &EventLog) -> Vec<Case> {
    let events = log.events();
    let per_object = log.events_per_object();

    let mut component = vec![usize::MAX; events.len()];
    let mut next_component = 0usize;

    for start in 0..events.len() {
        if component[start] != usize::MAX {
            continue;
        }
        let mut queue = vec![start];
        component[start] = next_component;
        while let Some(index) = queue.pop() {
            for object_id in &events[index].objects {
                if let Some(neighbours) = per_object.get(object_id.as_str()) {
                    for &neighbour in neighbours {
                        if component[neighbour] == usize::MAX {
                            component[neighbour] = next_component;
                            queue.push(neighbour);
                        }
                    }
                }
            }
        }
        next_component += 1;
    }

    let mut cases = Vec::with_capacity(next_component);
    for id in 0..next_component {
        let indices: Vec<usize> = (0..events.len()).filter(|&i| component[i] == id).collect();
        cases.push(build_case(log, format!("exec_{}", id + 1), &indices));
    }
    cases
}

/// One case per object of the leading type, spanning all of its events.
fn leading_type(log: &EventLog, object_type: &str) -> Vec<Case> {
    let per_object = log.events_per_object();
    let mut cases = Vec::new();
    for (object_id, ot) in log.objects() {
        if ot != object_type {
            continue;
        }
        let indices = per_object
            .get(object_id.as_str())
            .cloned()
            .unwrap_or_default();
        cases.push(build_case(log, object_id.clone(), &indices));
    }
    cases
}

fn build_case(log: &EventLog, id: String, indices: &[usize]) -> Case {
    let events = log.events();
    let mut objects: BTreeSet<String> = BTreeSet::new();
    for &index in indices {
        objects.extend(events[index].objects.iter().cloned());
    }
    Case {
        id,
        // Indices ascend, and the log is timestamp-sorted.
        events: indices.iter().map(|&i| events[i].id.clone()).collect(),
        objects: objects.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventlog::Event;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn log_with_two_components() -> EventLog {
        let objects = BTreeMap::from([
            ("o1".to_string(), "order".to_string()),
            ("o2".to_string(), "order".to_string()),
            ("i1".to_string(), "item".to_string()),
        ]);
        let mut events = Vec::new();
        for (id, minute, activity, objs) in [
            ("e1", 0, "Place Order", vec!["o1", "i1"]),
            ("e2", 1, "Pack Items", vec!["i1"]),
            ("e3", 2, "Place Order", vec!["o2"]),
        ] {
            events.push(Event {
                id: id.to_string(),
                activity: activity.to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap(),
                objects: objs.into_iter().map(ToOwned::to_owned).collect(),
            });
        }
        EventLog::new(events, objects)
    }

    #[test]
    fn connected_components_split_unrelated_events() {
        let log = log_with_two_components();
        let cases = process_executions(&log, &ExecutionExtraction::ConnectedComponents);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].events, vec!["e1", "e2"]);
        assert_eq!(cases[0].objects, vec!["i1", "o1"]);
        assert_eq!(cases[1].events, vec!["e3"]);
    }

    #[test]
    fn leading_type_yields_one_case_per_object() {
        let log = log_with_two_components();
        let cases =
            process_executions(&log, &ExecutionExtraction::LeadingType("order".to_string()));
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].id, "o1");
        assert_eq!(cases[0].events, vec!["e1"]);
        assert_eq!(cases[1].id, "o2");
    }
}
