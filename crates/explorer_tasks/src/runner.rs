use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use explorer_logging::{explorer_debug, explorer_error, explorer_info};
use ocel_engine::OpValue;
use ocel_model::{Model, ModelError};

use crate::catalog::{self, TaskArgs};
use crate::job::{Job, JobId};

pub use crate::job::Callback;

/// How often the interactive thread should call [`JobRunner::poll`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct Completion {
    job_id: JobId,
    key: String,
    result: Result<OpValue, ModelError>,
}

/// Accepts task requests from the UI layer, runs them on worker threads,
/// and delivers results back on the interactive thread.
///
/// The runner is not `Send`: it lives on the interactive thread, and
/// callbacks only ever run inside [`JobRunner::poll`]. Workers communicate
/// completions over an mpsc channel, which `poll` drains.
///
/// At most one job per key is "current". Requesting a key again replaces
/// the previous job; if the previous job was killed, its completion is
/// dropped, otherwise it is kept aside and its callback still fires.
pub struct JobRunner {
    model: Arc<Model>,
    jobs: HashMap<String, Job>,
    /// Replaced but not killed: completions are still delivered.
    detached: Vec<Job>,
    completion_tx: mpsc::Sender<Completion>,
    completion_rx: mpsc::Receiver<Completion>,
    instance_counter: JobId,
}

impl JobRunner {
    pub fn new(model: Arc<Model>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel();
        Self {
            model,
            jobs: HashMap::new(),
            detached: Vec::new(),
            completion_tx,
            completion_rx,
            instance_counter: 0,
        }
    }

    /// Starts the task registered under `key` in the catalog.
    ///
    /// Unknown keys and missing arguments are logged and dropped; no error
    /// propagates to the caller.
    pub fn run_task(
        &mut self,
        key: &str,
        kill_if_running: bool,
        args: &TaskArgs,
        callback: Option<Callback>,
    ) {
        let Some(spec) = catalog::lookup(key) else {
            explorer_error!("Unknown task key '{key}'");
            return;
        };
        let Some(request) = spec.request(args) else {
            explorer_error!("Task '{key}' is missing a required argument");
            return;
        };

        if let Some(previous) = self.jobs.get(key) {
            if previous.is_running() && kill_if_running {
                previous.kill();
            }
        }

        self.instance_counter += 1;
        let job = Job::new(self.instance_counter, key, spec.text, callback);
        explorer_info!("Run task '{}_{}'", job.id(), key);
        if let Some(text) = job.text() {
            explorer_info!("{text} ...");
        }

        let model = Arc::clone(&self.model);
        let completion_tx = self.completion_tx.clone();
        let running = job.running_flag();
        let job_id = job.id();
        let key_owned = key.to_string();
        thread::spawn(move || {
            let result = model.get_or_compute(&request);
            running.store(false, Ordering::SeqCst);
            // The runner may be gone on shutdown; nothing to deliver then.
            let _ = completion_tx.send(Completion {
                job_id,
                key: key_owned,
                result,
            });
        });

        if let Some(old) = self.jobs.insert(key.to_string(), job) {
            // A killed predecessor is forgotten entirely. An unkilled one
            // may still owe its caller a callback.
            if !old.is_killed() && old.has_callback() {
                self.detached.push(old);
            }
        }
    }

    /// Kills the current job under `key`, if any. Advisory: suppresses
    /// delivery, does not stop the computation.
    pub fn kill(&mut self, key: &str) {
        if let Some(job) = self.jobs.get(key) {
            job.kill();
        }
    }

    pub fn is_running(&self, key: &str) -> bool {
        self.jobs.get(key).is_some_and(Job::is_running)
    }

    pub fn status(&self, key: &str) -> Option<crate::job::JobStatus> {
        self.jobs.get(key).map(Job::status)
    }

    /// True while any job is still running or owes a callback.
    pub fn has_pending_work(&self) -> bool {
        self.jobs
            .values()
            .any(|job| !job.is_killed() && (job.is_running() || job.has_callback()))
            || !self.detached.is_empty()
    }

    /// Drains completed jobs and fires their callbacks. Must be called from
    /// the interactive thread, at a short fixed interval ([`POLL_INTERVAL`]).
    /// Returns the number of callbacks fired.
    pub fn poll(&mut self) -> usize {
        let mut fired = 0;
        while let Ok(done) = self.completion_rx.try_recv() {
            // The completion belongs to the current registrant of its key,
            // to a detached predecessor, or to a forgotten (killed and
            // replaced) job.
            let claimed = match self.jobs.get_mut(&done.key) {
                Some(current) if current.id() == done.job_id => {
                    Some((current.is_killed(), current.take_callback()))
                }
                _ => self
                    .detached
                    .iter()
                    .position(|job| job.id() == done.job_id)
                    .map(|index| {
                        let mut job = self.detached.swap_remove(index);
                        (job.is_killed(), job.take_callback())
                    }),
            };
            let Some((killed, callback)) = claimed else {
                explorer_debug!(
                    "dropping completion of forgotten task '{}_{}'",
                    done.job_id,
                    done.key
                );
                continue;
            };
            if killed {
                explorer_info!(
                    "Task '{}_{}' was killed; callback suppressed",
                    done.job_id,
                    done.key
                );
                continue;
            }
            if let Some(callback) = callback {
                explorer_info!("Task '{}_{}': invoke callback", done.job_id, done.key);
                callback(done.result);
                fired += 1;
            }
        }
        fired
    }
}
