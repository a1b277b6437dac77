//! OPERA-style object-centric performance KPIs.
//!
//! Events are treated as instantaneous, so an event's sojourn time equals
//! its waiting time (service time is zero). All durations are in seconds.
//!
//! Per event, with "arrival" of an object meaning the timestamp of its
//! previous event (or the current timestamp if this is its first event):
//! - waiting: current timestamp minus the earliest arrival among all
//!   related objects, i.e. how long the longest-waiting object waited.
//! - pooling (per object type): latest minus earliest arrival among the
//!   type's objects, i.e. how long the type needed to assemble.
//! - lagging (per object type): the type's earliest arrival minus the
//!   overall earliest arrival, i.e. how far the type trailed the first
//!   ready object.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::eventlog::EventLog;
use crate::ops::{ActivityKpis, Aggregation, OperaReport};

#[derive(Default)]
struct Samples {
    waiting: Vec<f64>,
    sojourn: Vec<f64>,
    pooling: BTreeMap<String, Vec<f64>>,
    lagging: BTreeMap<String, Vec<f64>>,
}

pub fn report(log: &EventLog, aggregation: Aggregation) -> OperaReport {
    let mut last_seen: HashMap<&str, DateTime<Utc>> = HashMap::new();
    let mut per_activity: BTreeMap<String, Samples> = BTreeMap::new();

    for event in log.events() {
        if event.objects.is_empty() {
            continue;
        }

        let arrivals: Vec<(&str, DateTime<Utc>)> = event
            .objects
            .iter()
            .map(|object_id| {
                let arrival = last_seen
                    .get(object_id.as_str())
                    .copied()
                    .unwrap_or(event.timestamp);
                (object_id.as_str(), arrival)
            })
            .collect();

        let earliest = arrivals
            .iter()
            .map(|(_, arrival)| *arrival)
            .min()
            .unwrap_or(event.timestamp);
        let waiting = seconds_between(earliest, event.timestamp);

        let samples = per_activity.entry(event.activity.clone()).or_default();
        samples.waiting.push(waiting);
        samples.sojourn.push(waiting);

        let mut per_type: BTreeMap<&str, Vec<DateTime<Utc>>> = BTreeMap::new();
        for (object_id, arrival) in &arrivals {
            if let Some(object_type) = log.object_type_of(object_id) {
                per_type.entry(object_type).or_default().push(*arrival);
            }
        }
        for (object_type, type_arrivals) in per_type {
            let min = type_arrivals.iter().min().copied().unwrap_or(event.timestamp);
            let max = type_arrivals.iter().max().copied().unwrap_or(event.timestamp);
            samples
                .pooling
                .entry(object_type.to_string())
                .or_default()
                .push(seconds_between(min, max));
            samples
                .lagging
                .entry(object_type.to_string())
                .or_default()
                .push(seconds_between(earliest, min));
        }

        for object_id in &event.objects {
            last_seen.insert(object_id.as_str(), event.timestamp);
        }
    }

    let activities = per_activity
        .into_iter()
        .map(|(activity, samples)| ActivityKpis {
            activity,
            waiting: aggregation.apply(&samples.waiting),
            sojourn: aggregation.apply(&samples.sojourn),
            pooling: aggregate_map(samples.pooling, aggregation),
            lagging: aggregate_map(samples.lagging, aggregation),
        })
        .collect();

    OperaReport {
        aggregation,
        activities,
    }
}

fn aggregate_map(
    samples: BTreeMap<String, Vec<f64>>,
    aggregation: Aggregation,
) -> BTreeMap<String, f64> {
    samples
        .into_iter()
        .filter_map(|(key, values)| aggregation.apply(&values).map(|v| (key, v)))
        .collect()
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
