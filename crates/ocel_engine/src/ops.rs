//! Typed analytical operation contract shared by all backend adapters.

use std::collections::BTreeMap;

/// Aggregation selector for OPERA KPI computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
    Min,
    Max,
    Sum,
}

impl Aggregation {
    /// Applies the aggregation to a sample set. `None` for an empty set.
    pub fn apply(&self, samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let value = match self {
            Aggregation::Mean => samples.iter().sum::<f64>() / samples.len() as f64,
            Aggregation::Median => {
                let mut sorted = samples.to_vec();
                sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite duration samples"));
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            Aggregation::Min => samples.iter().cloned().fold(f64::INFINITY, f64::min),
            Aggregation::Max => samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Sum => samples.iter().sum(),
        };
        Some(value)
    }
}

/// Which KPI matrix a heatmap request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeatmapKind {
    /// Object-type x object-type shared-event counts.
    ObjectInteraction,
    /// Activity x object-type pooling times.
    Pooling,
    /// Activity x object-type lagging times.
    Lagging,
}

/// An analytical request. This is also the cache key of the model
/// dispatcher: two requests are identical iff they compare equal here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpRequest {
    ObjectTypes,
    ObjectTypeCounts,
    Activities,
    ObjectTypeActivities,
    Opera { aggregation: Aggregation },
    Cases,
    Variants,
    VariantFrequencies,
    VariantGraph { variant_id: String },
    PetriNet,
    Heatmap { kind: HeatmapKind },
    ExtendedTable,
}

impl OpRequest {
    /// Stable operation name for logging and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            OpRequest::ObjectTypes => "object_types",
            OpRequest::ObjectTypeCounts => "object_type_counts",
            OpRequest::Activities => "activities",
            OpRequest::ObjectTypeActivities => "object_type_activities",
            OpRequest::Opera { .. } => "opera",
            OpRequest::Cases => "cases",
            OpRequest::Variants => "variants",
            OpRequest::VariantFrequencies => "variant_frequencies",
            OpRequest::VariantGraph { .. } => "variant_graph",
            OpRequest::PetriNet => "petri_net",
            OpRequest::Heatmap { .. } => "heatmap",
            OpRequest::ExtendedTable => "extended_table",
        }
    }
}

/// A process execution: the object-centric generalization of a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    /// Event ids in temporal order.
    pub events: Vec<String>,
    /// Involved object ids, sorted.
    pub objects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Content-derived id, stable across runs.
    pub id: String,
    pub activities: Vec<String>,
    pub case_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantFrequency {
    pub variant_id: String,
    pub count: u64,
    /// Share of all cases, in `[0, 1]`.
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantNode {
    pub activity: String,
    pub object_types: Vec<String>,
}

/// Event-object graph of a single variant, built from a representative case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantGraph {
    pub variant_id: String,
    pub nodes: Vec<VariantNode>,
    /// Directed edges between node indices.
    pub edges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub id: String,
    pub object_type: String,
    pub initial: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetriArc {
    pub source: String,
    pub target: String,
    pub object_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetriNet {
    pub places: Vec<Place>,
    pub transitions: Vec<Transition>,
    pub arcs: Vec<PetriArc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub kind: HeatmapKind,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `values[row][col]`, rows/cols aligned with the label vectors.
    pub values: Vec<Vec<f64>>,
}

/// Extended tabular view: one row per event, one column per object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Per-activity OPERA KPIs. Durations are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityKpis {
    pub activity: String,
    pub waiting: Option<f64>,
    pub sojourn: Option<f64>,
    /// Object type -> aggregated pooling time.
    pub pooling: BTreeMap<String, f64>,
    /// Object type -> aggregated lagging time.
    pub lagging: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperaReport {
    pub aggregation: Aggregation,
    pub activities: Vec<ActivityKpis>,
}

/// Result of a supported operation. Each request variant has exactly one
/// matching value variant.
#[derive(Debug, Clone, PartialEq)]
pub enum OpValue {
    ObjectTypes(Vec<String>),
    ObjectTypeCounts(BTreeMap<String, u64>),
    Activities(Vec<String>),
    ObjectTypeActivities(BTreeMap<String, Vec<String>>),
    Opera(OperaReport),
    Cases(Vec<Case>),
    Variants(Vec<Variant>),
    VariantFrequencies(Vec<VariantFrequency>),
    VariantGraph(VariantGraph),
    PetriNet(PetriNet),
    Heatmap(Heatmap),
    ExtendedTable(Table),
}
