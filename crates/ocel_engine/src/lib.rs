//! OCEL engine: event-log model, interchange files, and backend adapters.
mod analysis;
mod backend;
mod backends;
mod eventlog;
mod interchange;
mod ops;

pub use analysis::{cases, heatmap, opera, petri, variants};
pub use backend::{
    Backend, BackendError, BackendKind, DatasetDescriptor, ExecutionExtraction, ExtractionSettings,
};
pub use backends::{DummyBackend, ExecutionBackend, RelationBackend};
pub use eventlog::{Event, EventLog};
pub use interchange::{export_file, import_file, InterchangeError};
pub use ops::{
    ActivityKpis, Aggregation, Case, Heatmap, HeatmapKind, OpRequest, OpValue, OperaReport,
    PetriArc, PetriNet, Place, Table, Transition, Variant, VariantFrequency, VariantGraph,
    VariantNode,
};
