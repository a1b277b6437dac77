//! Static catalog of the tasks the UI layer is allowed to request.

use ocel_engine::{Aggregation, HeatmapKind, OpRequest};

pub const TASK_DISCOVER_PETRI_NET: &str = "discover_petri_net";
pub const TASK_HEATMAP_OT: &str = "heatmap_ot";
pub const TASK_HEATMAP_POOLING: &str = "heatmap_pooling";
pub const TASK_HEATMAP_LAGGING: &str = "heatmap_lagging";
pub const TASK_COMPUTE_CASES: &str = "cases";
pub const TASK_COMPUTE_VARIANTS: &str = "variants";
pub const TASK_COMPUTE_VARIANT_FREQUENCIES: &str = "variant_frequencies";
pub const TASK_VARIANT_GRAPH: &str = "variant_graph";
pub const TASK_OPERA: &str = "opera";

/// Arguments a task may need beyond its key.
#[derive(Debug, Clone, Default)]
pub struct TaskArgs {
    pub aggregation: Aggregation,
    pub variant_id: Option<String>,
}

/// One catalog entry: how to build the request, plus the progress text
/// shown while the task runs.
pub struct TaskSpec {
    pub key: &'static str,
    pub text: Option<&'static str>,
    build: fn(&TaskArgs) -> Option<OpRequest>,
}

impl TaskSpec {
    /// `None` when a required argument is missing.
    pub fn request(&self, args: &TaskArgs) -> Option<OpRequest> {
        (self.build)(args)
    }
}

static CATALOG: &[TaskSpec] = &[
    TaskSpec {
        key: TASK_DISCOVER_PETRI_NET,
        text: Some("Discovering petri net"),
        build: |_| Some(OpRequest::PetriNet),
    },
    TaskSpec {
        key: TASK_HEATMAP_OT,
        text: Some("Computing heatmap"),
        build: |_| {
            Some(OpRequest::Heatmap {
                kind: HeatmapKind::ObjectInteraction,
            })
        },
    },
    TaskSpec {
        key: TASK_HEATMAP_POOLING,
        text: Some("Computing performance metrics"),
        build: |_| {
            Some(OpRequest::Heatmap {
                kind: HeatmapKind::Pooling,
            })
        },
    },
    TaskSpec {
        key: TASK_HEATMAP_LAGGING,
        text: Some("Computing performance metrics"),
        build: |_| {
            Some(OpRequest::Heatmap {
                kind: HeatmapKind::Lagging,
            })
        },
    },
    TaskSpec {
        key: TASK_COMPUTE_CASES,
        text: Some("Computing cases and variants"),
        build: |_| Some(OpRequest::Cases),
    },
    TaskSpec {
        key: TASK_COMPUTE_VARIANTS,
        text: Some("Computing cases and variants"),
        build: |_| Some(OpRequest::Variants),
    },
    TaskSpec {
        key: TASK_COMPUTE_VARIANT_FREQUENCIES,
        text: Some("Computing variant frequencies"),
        build: |_| Some(OpRequest::VariantFrequencies),
    },
    TaskSpec {
        key: TASK_VARIANT_GRAPH,
        text: Some("Computing variant graph"),
        build: |args| {
            args.variant_id.as_ref().map(|variant_id| OpRequest::VariantGraph {
                variant_id: variant_id.clone(),
            })
        },
    },
    TaskSpec {
        key: TASK_OPERA,
        text: Some("Computing performance metrics"),
        build: |args| {
            Some(OpRequest::Opera {
                aggregation: args.aggregation,
            })
        },
    },
];

pub fn lookup(key: &str) -> Option<&'static TaskSpec> {
    CATALOG.iter().find(|spec| spec.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_resolves_to_its_spec() {
        for key in [
            TASK_DISCOVER_PETRI_NET,
            TASK_HEATMAP_OT,
            TASK_HEATMAP_POOLING,
            TASK_HEATMAP_LAGGING,
            TASK_COMPUTE_CASES,
            TASK_COMPUTE_VARIANTS,
            TASK_COMPUTE_VARIANT_FREQUENCIES,
            TASK_VARIANT_GRAPH,
            TASK_OPERA,
        ] {
            let spec = lookup(key).expect("catalog entry");
            assert_eq!(spec.key, key);
        }
        assert!(lookup("no_such_task").is_none());
    }

    #[test]
    fn variant_graph_requires_an_id() {
        let spec = lookup(TASK_VARIANT_GRAPH).unwrap();
        assert!(spec.request(&TaskArgs::default()).is_none());
        let args = TaskArgs {
            variant_id: Some("abc".to_string()),
            ..TaskArgs::default()
        };
        assert_eq!(
            spec.request(&args),
            Some(OpRequest::VariantGraph {
                variant_id: "abc".to_string()
            })
        );
    }

    #[test]
    fn opera_carries_the_selected_aggregation() {
        let spec = lookup(TASK_OPERA).unwrap();
        let args = TaskArgs {
            aggregation: Aggregation::Median,
            ..TaskArgs::default()
        };
        assert_eq!(
            spec.request(&args),
            Some(OpRequest::Opera {
                aggregation: Aggregation::Median
            })
        );
    }
}
