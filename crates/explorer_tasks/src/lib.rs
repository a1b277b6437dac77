//! Background task framework: job catalog, background jobs, and the runner
//! that delivers results back to the interactive thread.
mod catalog;
mod job;
mod runner;

pub use catalog::{
    lookup, TaskArgs, TaskSpec, TASK_COMPUTE_CASES, TASK_COMPUTE_VARIANTS,
    TASK_COMPUTE_VARIANT_FREQUENCIES, TASK_DISCOVER_PETRI_NET, TASK_HEATMAP_LAGGING,
    TASK_HEATMAP_OT, TASK_HEATMAP_POOLING, TASK_OPERA, TASK_VARIANT_GRAPH,
};
pub use job::{Job, JobId, JobStatus};
pub use runner::{Callback, JobRunner, POLL_INTERVAL};
