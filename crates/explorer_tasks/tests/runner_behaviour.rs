use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use explorer_tasks::{
    JobRunner, TaskArgs, TASK_COMPUTE_CASES, TASK_COMPUTE_VARIANTS, TASK_VARIANT_GRAPH,
};
use ocel_engine::{Backend, BackendError, BackendKind, Case, OpRequest, OpValue};
use ocel_model::{Model, ModelError};
use pretty_assertions::assert_eq;

/// Adapter answering every request with a fixed list of cases, optionally
/// slowly. Counts invocations.
struct CasesBackend {
    calls: Arc<AtomicUsize>,
    delay: Duration,
}

impl CasesBackend {
    fn new(delay: Duration) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            delay,
        }
    }

    fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Backend for CasesBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Dummy
    }

    fn query(&self, _request: &OpRequest) -> Result<Option<OpValue>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(Some(three_cases()))
    }
}

/// Adapter supporting nothing at all.
struct DecliningBackend;

impl Backend for DecliningBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Dummy
    }

    fn query(&self, _request: &OpRequest) -> Result<Option<OpValue>, BackendError> {
        Ok(None)
    }
}

fn three_cases() -> OpValue {
    OpValue::Cases(
        ["p1", "p2", "p3"]
            .iter()
            .map(|id| Case {
                id: id.to_string(),
                events: Vec::new(),
                objects: Vec::new(),
            })
            .collect(),
    )
}

type Recorded = Rc<RefCell<Vec<Result<OpValue, ModelError>>>>;

fn recorder() -> (Recorded, impl FnOnce(Result<OpValue, ModelError>)) {
    let slot: Recorded = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&slot);
    (slot, move |result| sink.borrow_mut().push(result))
}

/// Polls at a short interval until nothing is pending or the deadline
/// passes. Returns the total number of callbacks fired.
fn pump(runner: &mut JobRunner, deadline: Duration) -> usize {
    let start = Instant::now();
    let mut fired = 0;
    loop {
        fired += runner.poll();
        if !runner.has_pending_work() || start.elapsed() > deadline {
            return fired;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn cases_task_delivers_result_once_and_reuses_cache() {
    let backend = CasesBackend::new(Duration::ZERO);
    let calls = backend.counter();
    let model = Arc::new(Model::with_backend(Box::new(backend)));
    let mut runner = JobRunner::new(model);

    let (first, callback) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, true, &TaskArgs::default(), Some(Box::new(callback)));
    let fired = pump(&mut runner, Duration::from_secs(2));

    assert_eq!(fired, 1);
    assert_eq!(first.borrow().len(), 1);
    assert_eq!(*first.borrow()[0].as_ref().unwrap(), three_cases());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Second request: same value, adapter not re-invoked.
    let (second, callback) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, true, &TaskArgs::default(), Some(Box::new(callback)));
    pump(&mut runner, Duration::from_secs(2));

    assert_eq!(*second.borrow()[0].as_ref().unwrap(), three_cases());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unknown_task_key_is_logged_and_dropped() {
    let model = Arc::new(Model::with_backend(Box::new(CasesBackend::new(
        Duration::ZERO,
    ))));
    let mut runner = JobRunner::new(model);

    let (recorded, callback) = recorder();
    runner.run_task("no_such_task", true, &TaskArgs::default(), Some(Box::new(callback)));

    assert!(!runner.has_pending_work());
    assert_eq!(runner.poll(), 0);
    assert!(recorded.borrow().is_empty());
}

#[test]
fn missing_required_argument_is_logged_and_dropped() {
    let model = Arc::new(Model::with_backend(Box::new(CasesBackend::new(
        Duration::ZERO,
    ))));
    let mut runner = JobRunner::new(model);

    // variant_graph needs a variant id.
    runner.run_task(TASK_VARIANT_GRAPH, true, &TaskArgs::default(), None);
    assert!(!runner.has_pending_work());
}

#[test]
fn rerequesting_a_key_kills_the_previous_job() {
    let backend = CasesBackend::new(Duration::from_millis(100));
    let model = Arc::new(Model::with_backend(Box::new(backend)));
    let mut runner = JobRunner::new(model);

    let (first, cb1) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, true, &TaskArgs::default(), Some(Box::new(cb1)));
    let (second, cb2) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, true, &TaskArgs::default(), Some(Box::new(cb2)));

    pump(&mut runner, Duration::from_secs(2));

    // The replaced job's callback never fires; the replacement's fires once.
    assert!(first.borrow().is_empty());
    assert_eq!(second.borrow().len(), 1);
}

#[test]
fn kill_suppresses_delivery_of_an_unpolled_completion() {
    let model = Arc::new(Model::with_backend(Box::new(CasesBackend::new(
        Duration::ZERO,
    ))));
    let mut runner = JobRunner::new(model);

    let (recorded, callback) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, true, &TaskArgs::default(), Some(Box::new(callback)));

    // Let the worker finish so the completion is queued but not polled yet.
    thread::sleep(Duration::from_millis(100));
    assert!(!runner.is_running(TASK_COMPUTE_CASES));

    // Kill wins the race against the not-yet-polled completion.
    runner.kill(TASK_COMPUTE_CASES);
    let fired = pump(&mut runner, Duration::from_millis(300));

    assert_eq!(fired, 0);
    assert!(recorded.borrow().is_empty());
}

#[test]
fn completion_polled_before_kill_fires_exactly_once() {
    let model = Arc::new(Model::with_backend(Box::new(CasesBackend::new(
        Duration::ZERO,
    ))));
    let mut runner = JobRunner::new(model);

    let (recorded, callback) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, true, &TaskArgs::default(), Some(Box::new(callback)));
    let fired = pump(&mut runner, Duration::from_secs(2));
    assert_eq!(fired, 1);

    // A late kill changes nothing; the callback cannot fire again.
    runner.kill(TASK_COMPUTE_CASES);
    assert_eq!(pump(&mut runner, Duration::from_millis(200)), 0);
    assert_eq!(recorded.borrow().len(), 1);
}

#[test]
fn unsupported_operation_is_delivered_as_an_error() {
    let model = Arc::new(Model::with_backend(Box::new(DecliningBackend)));
    let mut runner = JobRunner::new(model);

    let (recorded, callback) = recorder();
    runner.run_task(TASK_COMPUTE_VARIANTS, true, &TaskArgs::default(), Some(Box::new(callback)));
    let fired = pump(&mut runner, Duration::from_secs(2));

    assert_eq!(fired, 1);
    let recorded = recorded.borrow();
    assert!(matches!(
        recorded[0],
        Err(ModelError::Unsupported { operation: "variants" })
    ));
}

#[test]
fn replacing_without_kill_still_delivers_the_old_callback() {
    let backend = CasesBackend::new(Duration::from_millis(50));
    let model = Arc::new(Model::with_backend(Box::new(backend)));
    let mut runner = JobRunner::new(model);

    let (first, cb1) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, true, &TaskArgs::default(), Some(Box::new(cb1)));
    let (second, cb2) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, false, &TaskArgs::default(), Some(Box::new(cb2)));

    pump(&mut runner, Duration::from_secs(2));

    assert_eq!(first.borrow().len(), 1);
    assert_eq!(second.borrow().len(), 1);
}

#[test]
fn jobs_under_different_keys_run_independently() {
    let backend = CasesBackend::new(Duration::from_millis(20));
    let model = Arc::new(Model::with_backend(Box::new(backend)));
    let mut runner = JobRunner::new(model);

    let (cases, cb1) = recorder();
    runner.run_task(TASK_COMPUTE_CASES, true, &TaskArgs::default(), Some(Box::new(cb1)));
    let (variants, cb2) = recorder();
    runner.run_task(TASK_COMPUTE_VARIANTS, true, &TaskArgs::default(), Some(Box::new(cb2)));

    let fired = pump(&mut runner, Duration::from_secs(2));
    assert_eq!(fired, 2);
    assert_eq!(cases.borrow().len(), 1);
    assert_eq!(variants.borrow().len(), 1);
}
