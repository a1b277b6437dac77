//! KPI heatmap matrices.

use std::collections::BTreeSet;
use std::collections::HashSet;

use crate::eventlog::EventLog;
use crate::ops::{Heatmap, HeatmapKind, OperaReport};

/// Object-type interaction matrix: entry (i, j) counts the events relating
/// objects of both types; the diagonal counts the events touching the type
/// at all. Symmetric by construction, labels sorted.
pub fn object_interaction(log: &EventLog) -> Heatmap {
    let labels = log.object_types().to_vec();
    let index_of = |ot: &str| labels.iter().position(|l| l == ot);

    let mut values = vec![vec![0.0; labels.len()]; labels.len()];
    for event in log.events() {
        let types: HashSet<usize> = event
            .objects
            .iter()
            .filter_map(|id| log.object_type_of(id))
            .filter_map(index_of)
            .collect();
        let mut sorted: Vec<usize> = types.into_iter().collect();
        sorted.sort_unstable();
        for (position, &row) in sorted.iter().enumerate() {
            values[row][row] += 1.0;
            for &col in &sorted[position + 1..] {
                values[row][col] += 1.0;
                values[col][row] += 1.0;
            }
        }
    }

    Heatmap {
        kind: HeatmapKind::ObjectInteraction,
        row_labels: labels.clone(),
        col_labels: labels,
        values,
    }
}

/// Activity x object-type matrix of aggregated pooling or lagging times.
/// Cells without samples are zero.
pub fn kpi_heatmap(kind: HeatmapKind, report: &OperaReport) -> Heatmap {
    let col_set: BTreeSet<String> = report
        .activities
        .iter()
        .flat_map(|kpis| {
            let map = match kind {
                HeatmapKind::Pooling => &kpis.pooling,
                HeatmapKind::Lagging => &kpis.lagging,
                HeatmapKind::ObjectInteraction => {
                    unreachable!("interaction heatmaps are computed from the log")
                }
            };
            map.keys().cloned()
        })
        .collect();
    let col_labels: Vec<String> = col_set.into_iter().collect();

    let mut row_labels = Vec::with_capacity(report.activities.len());
    let mut values = Vec::with_capacity(report.activities.len());
    for kpis in &report.activities {
        let map = match kind {
            HeatmapKind::Pooling => &kpis.pooling,
            HeatmapKind::Lagging => &kpis.lagging,
            HeatmapKind::ObjectInteraction => unreachable!(),
        };
        row_labels.push(kpis.activity.clone());
        values.push(
            col_labels
                .iter()
                .map(|ot| map.get(ot).copied().unwrap_or(0.0))
                .collect(),
        );
    }

    Heatmap {
        kind,
        row_labels,
        col_labels,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::opera;
    use crate::eventlog::Event;
    use crate::ops::Aggregation;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn interaction_log() -> EventLog {
        let objects = BTreeMap::from([
            ("o1".to_string(), "order".to_string()),
            ("i1".to_string(), "item".to_string()),
        ]);
        let events = vec![
            Event {
                id: "e1".to_string(),
                activity: "Place Order".to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
                objects: vec!["o1".to_string(), "i1".to_string()],
            },
            Event {
                id: "e2".to_string(),
                activity: "Pack Items".to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 1, 0).unwrap(),
                objects: vec!["i1".to_string()],
            },
        ];
        EventLog::new(events, objects)
    }

    #[test]
    fn interaction_matrix_is_symmetric_with_event_counts() {
        let heatmap = object_interaction(&interaction_log());
        assert_eq!(heatmap.row_labels, vec!["item", "order"]);
        // item appears in two events, order in one, one shared event.
        assert_eq!(heatmap.values[0][0], 2.0);
        assert_eq!(heatmap.values[1][1], 1.0);
        assert_eq!(heatmap.values[0][1], 1.0);
        assert_eq!(heatmap.values[1][0], 1.0);
    }

    #[test]
    fn pooling_heatmap_has_activity_rows() {
        let log = interaction_log();
        let report = opera::report(&log, Aggregation::Mean);
        let heatmap = kpi_heatmap(HeatmapKind::Pooling, &report);
        assert_eq!(heatmap.kind, HeatmapKind::Pooling);
        assert_eq!(heatmap.row_labels.len(), 2);
        assert_eq!(heatmap.values[0].len(), heatmap.col_labels.len());
    }
}
