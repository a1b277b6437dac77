//! Directly-follows based discovery of an object-centric Petri net.
//!
//! Per object type: a source place feeds the start activities, one place per
//! observed directly-follows pair connects intermediate activities, and the
//! end activities feed a sink place. Transitions are shared across object
//! types (one per activity label).

use std::collections::{BTreeMap, BTreeSet};

use crate::eventlog::EventLog;
use crate::ops::{PetriArc, PetriNet, Place, Transition};

pub fn discover(log: &EventLog) -> PetriNet {
    let per_object = log.events_per_object();
    let events = log.events();

    let mut transitions: BTreeSet<String> = BTreeSet::new();
    let mut places = Vec::new();
    let mut arcs = Vec::new();

    for object_type in log.object_types() {
        let mut starts: BTreeSet<&str> = BTreeSet::new();
        let mut ends: BTreeSet<&str> = BTreeSet::new();
        let mut follows: BTreeSet<(&str, &str)> = BTreeSet::new();

        for (object_id, ot) in log.objects() {
            if ot != object_type {
                continue;
            }
            let Some(indices) = per_object.get(object_id.as_str()) else {
                continue;
            };
            if indices.is_empty() {
                continue;
            }
            let trace: Vec<&str> = indices.iter().map(|&i| events[i].activity.as_str()).collect();
            starts.insert(trace[0]);
            ends.insert(trace[trace.len() - 1]);
            for pair in trace.windows(2) {
                follows.insert((pair[0], pair[1]));
            }
            transitions.extend(trace.iter().map(|a| a.to_string()));
        }

        if starts.is_empty() {
            continue;
        }

        let source_id = format!("{object_type}:source");
        let sink_id = format!("{object_type}:sink");
        places.push(Place {
            id: source_id.clone(),
            object_type: object_type.clone(),
            initial: true,
            is_final: false,
        });
        places.push(Place {
            id: sink_id.clone(),
            object_type: object_type.clone(),
            initial: false,
            is_final: true,
        });

        for activity in &starts {
            arcs.push(PetriArc {
                source: source_id.clone(),
                target: (*activity).to_string(),
                object_type: object_type.clone(),
            });
        }
        for activity in &ends {
            arcs.push(PetriArc {
                source: (*activity).to_string(),
                target: sink_id.clone(),
                object_type: object_type.clone(),
            });
        }
        for (from, to) in &follows {
            let place_id = format!("{object_type}:{from}->{to}");
            places.push(Place {
                id: place_id.clone(),
                object_type: object_type.clone(),
                initial: false,
                is_final: false,
            });
            arcs.push(PetriArc {
                source: (*from).to_string(),
                target: place_id.clone(),
                object_type: object_type.clone(),
            });
            arcs.push(PetriArc {
                source: place_id,
                target: (*to).to_string(),
                object_type: object_type.clone(),
            });
        }
    }

    let transitions: Vec<Transition> = transitions
        .into_iter()
        .map(|label| Transition {
            id: label.clone(),
            label,
        })
        .collect();

    PetriNet {
        places,
        transitions,
        arcs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventlog::Event;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn linear_order_log() -> EventLog {
        let objects = BTreeMap::from([("o1".to_string(), "order".to_string())]);
        let activities = ["Place Order", "Send Invoice", "Receive Payment"];
        let events = activities
            .iter()
            .enumerate()
            .map(|(step, activity)| Event {
                id: format!("e{step}"),
                activity: activity.to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, step as u32, 0).unwrap(),
                objects: vec!["o1".to_string()],
            })
            .collect();
        EventLog::new(events, objects)
    }

    #[test]
    fn linear_trace_yields_chain_of_places() {
        let net = discover(&linear_order_log());
        assert_eq!(net.transitions.len(), 3);
        // source, sink, and one place per directly-follows pair.
        assert_eq!(net.places.len(), 4);
        let initial: Vec<&Place> = net.places.iter().filter(|p| p.initial).collect();
        let finals: Vec<&Place> = net.places.iter().filter(|p| p.is_final).collect();
        assert_eq!(initial.len(), 1);
        assert_eq!(finals.len(), 1);
        assert!(net
            .arcs
            .iter()
            .any(|arc| arc.source == "order:source" && arc.target == "Place Order"));
        assert!(net
            .arcs
            .iter()
            .any(|arc| arc.source == "Receive Payment" && arc.target == "order:sink"));
    }
}
