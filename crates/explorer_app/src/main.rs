//! Headless driver: loads an event log, runs the standard analysis tasks
//! through the job runner, and prints a summary per task.

mod logging;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use explorer_logging::explorer_info;
use explorer_tasks::{
    JobRunner, TaskArgs, POLL_INTERVAL, TASK_COMPUTE_CASES, TASK_COMPUTE_VARIANT_FREQUENCIES,
    TASK_DISCOVER_PETRI_NET, TASK_HEATMAP_OT, TASK_HEATMAP_POOLING, TASK_OPERA,
};
use ocel_engine::{DatasetDescriptor, Event, EventLog, ExtractionSettings, OpValue};
use ocel_model::{Model, ModelError};

fn main() -> Result<()> {
    logging::initialize(logging::LogDestination::Terminal);

    let model = match std::env::args().nth(1) {
        Some(path) => {
            let descriptor = DatasetDescriptor::new(path);
            let model = Model::load(&descriptor)
                .with_context(|| format!("failed to load dataset {}", descriptor.path.display()))?;
            Arc::new(model)
        }
        None => {
            explorer_info!("no dataset given; exploring a built-in sample log");
            Arc::new(Model::from_log(
                Arc::new(sample_log()),
                ExtractionSettings::default(),
            ))
        }
    };

    let mut runner = JobRunner::new(model);
    for key in [
        TASK_COMPUTE_CASES,
        TASK_COMPUTE_VARIANT_FREQUENCIES,
        TASK_OPERA,
        TASK_DISCOVER_PETRI_NET,
        TASK_HEATMAP_OT,
        TASK_HEATMAP_POOLING,
    ] {
        runner.run_task(
            key,
            true,
            &TaskArgs::default(),
            Some(Box::new(move |result| report(key, result))),
        );
    }

    // The interactive thread's polling loop.
    while runner.has_pending_work() {
        runner.poll();
        thread::sleep(POLL_INTERVAL);
    }
    Ok(())
}

fn report(key: &str, result: std::result::Result<OpValue, ModelError>) {
    match result {
        Ok(value) => println!("{key}: {}", summarize(&value)),
        Err(err) => println!("{key}: failed: {err}"),
    }
}

fn summarize(value: &OpValue) -> String {
    match value {
        OpValue::ObjectTypes(types) => format!("{} object types", types.len()),
        OpValue::ObjectTypeCounts(counts) => format!("counts for {} object types", counts.len()),
        OpValue::Activities(activities) => format!("{} activities", activities.len()),
        OpValue::ObjectTypeActivities(map) => format!("activity map over {} object types", map.len()),
        OpValue::Opera(report) => format!(
            "{:?}-aggregated KPIs for {} activities",
            report.aggregation,
            report.activities.len()
        ),
        OpValue::Cases(cases) => format!("{} cases", cases.len()),
        OpValue::Variants(variants) => format!("{} variants", variants.len()),
        OpValue::VariantFrequencies(frequencies) => {
            format!("frequencies for {} variants", frequencies.len())
        }
        OpValue::VariantGraph(graph) => format!(
            "variant graph with {} nodes and {} edges",
            graph.nodes.len(),
            graph.edges.len()
        ),
        OpValue::PetriNet(net) => format!(
            "petri net with {} places, {} transitions, {} arcs",
            net.places.len(),
            net.transitions.len(),
            net.arcs.len()
        ),
        OpValue::Heatmap(heatmap) => format!(
            "{:?} heatmap, {}x{}",
            heatmap.kind,
            heatmap.row_labels.len(),
            heatmap.col_labels.len()
        ),
        OpValue::ExtendedTable(table) => {
            format!("table with {} rows, {} columns", table.rows.len(), table.columns.len())
        }
    }
}

/// Two small order-to-delivery executions, enough to exercise every task.
fn sample_log() -> EventLog {
    let mut objects = BTreeMap::new();
    let mut events = Vec::new();
    let mut minute = 0u32;
    for n in ["a", "b"] {
        let order = format!("order_{n}");
        let item1 = format!("item_{n}1");
        let item2 = format!("item_{n}2");
        let delivery = format!("delivery_{n}");
        objects.insert(order.clone(), "order".to_string());
        objects.insert(item1.clone(), "item".to_string());
        objects.insert(item2.clone(), "item".to_string());
        objects.insert(delivery.clone(), "delivery".to_string());

        let steps: Vec<(&str, Vec<String>)> = vec![
            ("Place Order", vec![order.clone(), item1.clone(), item2.clone()]),
            ("Pack Items", vec![item1.clone(), item2.clone()]),
            ("Send Invoice", vec![order.clone()]),
            ("Start Delivery", vec![order.clone(), delivery.clone()]),
        ];
        for (activity, related) in steps {
            events.push(Event {
                id: format!("e{}", events.len() + 1),
                activity: activity.to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap(),
                objects: related,
            });
            minute += 7;
        }
    }
    EventLog::new(events, objects)
}
