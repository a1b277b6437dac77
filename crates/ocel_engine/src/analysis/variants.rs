//! Variant computation over extracted process executions.
//!
//! Two cases belong to the same variant when their activity sequences are
//! equal. This approximates the exact (graph-isomorphism based) variant
//! equivalence of the underlying literature, which is deliberately out of
//! scope here.

use std::collections::{BTreeSet, HashMap};

use sha2::{Digest, Sha256};

use crate::eventlog::EventLog;
use crate::ops::{Case, Variant, VariantFrequency, VariantGraph, VariantNode};

/// Groups cases into variants, most frequent first.
pub fn compute_variants(log: &EventLog, cases: &[Case]) -> Vec<Variant> {
    let mut by_sequence: HashMap<Vec<String>, Vec<String>> = HashMap::new();
    for case in cases {
        let sequence = activity_sequence(log, case);
        by_sequence.entry(sequence).or_default().push(case.id.clone());
    }

    let mut variants: Vec<Variant> = by_sequence
        .into_iter()
        .map(|(activities, case_ids)| Variant {
            id: variant_id(&activities),
            activities,
            case_ids,
        })
        .collect();
    // Deterministic order: frequency descending, id as tie-breaker.
    variants.sort_by(|a, b| {
        b.case_ids
            .len()
            .cmp(&a.case_ids.len())
            .then_with(|| a.id.cmp(&b.id))
    });
    variants
}

/// Relative frequency of each variant over the total case count.
pub fn variant_frequencies(variants: &[Variant], total_cases: usize) -> Vec<VariantFrequency> {
    variants
        .iter()
        .map(|variant| VariantFrequency {
            variant_id: variant.id.clone(),
            count: variant.case_ids.len() as u64,
            frequency: if total_cases == 0 {
                0.0
            } else {
                variant.case_ids.len() as f64 / total_cases as f64
            },
        })
        .collect()
}

/// Event-object graph for one variant, built from its first case.
///
/// An unknown variant id yields an empty graph: the operation is supported,
/// the answer just has nothing in it.
pub fn variant_graph(
    log: &EventLog,
    cases: &[Case],
    variants: &[Variant],
    variant_id: &str,
) -> VariantGraph {
    let Some(variant) = variants.iter().find(|v| v.id == variant_id) else {
        return VariantGraph {
            variant_id: variant_id.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
        };
    };
    let Some(case) = variant
        .case_ids
        .first()
        .and_then(|id| cases.iter().find(|c| &c.id == id))
    else {
        return VariantGraph {
            variant_id: variant_id.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
        };
    };

    let indices: Vec<usize> = case
        .events
        .iter()
        .filter_map(|event_id| log.event_index(event_id))
        .collect();

    let nodes: Vec<VariantNode> = indices
        .iter()
        .map(|&index| {
            let event = &log.events()[index];
            let object_types: BTreeSet<String> = event
                .objects
                .iter()
                .filter_map(|id| log.object_type_of(id))
                .map(ToOwned::to_owned)
                .collect();
            VariantNode {
                activity: event.activity.clone(),
                object_types: object_types.into_iter().collect(),
            }
        })
        .collect();

    // One edge per object between its consecutive events within the case.
    let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
    for object_id in &case.objects {
        let mut previous: Option<usize> = None;
        for (position, &index) in indices.iter().enumerate() {
            let touches = log.events()[index].objects.iter().any(|o| o == object_id);
            if touches {
                if let Some(from) = previous {
                    edges.insert((from, position));
                }
                previous = Some(position);
            }
        }
    }

    VariantGraph {
        variant_id: variant_id.to_string(),
        nodes,
        edges: edges.into_iter().collect(),
    }
}

fn activity_sequence(log: &EventLog, case: &Case) -> Vec<String> {
    case.events
        .iter()
        .filter_map(|event_id| log.event_index(event_id))
        .map(|index| log.events()[index].activity.clone())
        .collect()
}

/// Deterministic short id for a variant, derived from its activity sequence.
fn variant_id(activities: &[String]) -> String {
    let mut hasher = Sha256::new();
    for activity in activities {
        hasher.update(activity.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
