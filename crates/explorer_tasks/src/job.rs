use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use explorer_logging::explorer_info;
use ocel_engine::OpValue;
use ocel_model::ModelError;

pub type JobId = u64;

/// Callback invoked on the interactive thread when a job's result is
/// delivered. Fired at most once.
pub type Callback = Box<dyn FnOnce(Result<OpValue, ModelError>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Finished,
    Killed,
}

/// A background job registered with the runner.
///
/// The computation itself runs on a worker thread; this handle carries the
/// shared flags the runner and the worker use to coordinate. `finished` and
/// `killed` are terminal; killing does not interrupt the worker, it only
/// suppresses delivery of the result.
pub struct Job {
    id: JobId,
    key: String,
    text: Option<&'static str>,
    running: Arc<AtomicBool>,
    killed: Arc<AtomicBool>,
    callback: Option<Callback>,
}

impl Job {
    pub(crate) fn new(
        id: JobId,
        key: &str,
        text: Option<&'static str>,
        callback: Option<Callback>,
    ) -> Self {
        Self {
            id,
            key: key.to_string(),
            text,
            running: Arc::new(AtomicBool::new(true)),
            killed: Arc::new(AtomicBool::new(false)),
            callback,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn text(&self) -> Option<&'static str> {
        self.text
    }

    pub fn status(&self) -> JobStatus {
        if self.killed.load(Ordering::SeqCst) {
            JobStatus::Killed
        } else if self.running.load(Ordering::SeqCst) {
            JobStatus::Running
        } else {
            JobStatus::Finished
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    /// Marks the job killed. The worker keeps running to completion; its
    /// result is simply never delivered.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
        explorer_info!("Task '{}_{}' killed", self.id, self.key);
    }

    pub(crate) fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub(crate) fn take_callback(&mut self) -> Option<Callback> {
        self.callback.take()
    }

    pub(crate) fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}
