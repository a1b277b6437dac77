use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use explorer_logging::{explorer_debug, explorer_info, explorer_warn};
use ocel_engine::{
    Backend, BackendError, DatasetDescriptor, EventLog, ExecutionBackend, ExtractionSettings,
    OpRequest, OpValue, RelationBackend,
};

use crate::error::ModelError;

/// One-shot procedure that builds a new adapter from the current last one.
/// Consumed on its first attempt, successful or not.
pub type ExtensionProc =
    Box<dyn FnOnce(&dyn Backend) -> Result<Box<dyn Backend>, BackendError> + Send>;

/// Ordered adapter chain plus the per-slot extension procedures.
///
/// The chain only ever grows by appending; it is replaced wholesale when
/// the event log is refiltered.
struct Chain {
    backends: Vec<Box<dyn Backend>>,
    extensions: Vec<Option<ExtensionProc>>,
}

impl Chain {
    fn new(primary: Box<dyn Backend>, extension: Option<ExtensionProc>) -> Self {
        Self {
            backends: vec![primary],
            extensions: vec![extension],
        }
    }

    /// Fallback dispatch: try adapters in order; at the end of the chain,
    /// consume the last slot's extension procedure (if any) and keep going
    /// with the appended adapter.
    fn dispatch(&mut self, request: &OpRequest) -> Result<OpValue, ModelError> {
        let mut index = 0;
        while index < self.backends.len() {
            let backend = &self.backends[index];
            if let Some(value) = backend.query(request)? {
                explorer_debug!(
                    "backend '{}' answered '{}'",
                    backend.kind(),
                    request.name()
                );
                return Ok(value);
            }
            if index + 1 == self.backends.len() {
                if let Some(extend) = self.extensions[index].take() {
                    explorer_info!(
                        "no backend answered '{}'; extending the adapter chain",
                        request.name()
                    );
                    match extend(self.backends[index].as_ref()) {
                        Ok(backend) => {
                            explorer_info!("appended backend '{}'", backend.kind());
                            self.backends.push(backend);
                            self.extensions.push(None);
                        }
                        Err(err) => {
                            // Nothing half-constructed is appended; later
                            // requests fail fast instead of retrying.
                            explorer_warn!("adapter chain extension failed: {err}");
                            break;
                        }
                    }
                }
            }
            index += 1;
        }
        Err(ModelError::Unsupported {
            operation: request.name(),
        })
    }
}

/// Process-wide analytical state: the adapter chain and the result cache.
///
/// Safe to share across worker threads behind an `Arc`. The chain mutex
/// serializes backend computation; a request that loses the race for an
/// uncached value re-checks the cache after acquiring the chain, so
/// concurrent identical requests share one computation and one cache write.
pub struct Model {
    cache: Mutex<HashMap<OpRequest, OpValue>>,
    chain: Mutex<Chain>,
    /// Unfiltered log plus settings, kept for refiltering. Absent when the
    /// model was built around a bare backend (tests, dummy mode).
    source: Option<Source>,
}

struct Source {
    log: Arc<EventLog>,
    settings: ExtractionSettings,
}

impl Model {
    /// Loads a dataset and sets up the default chain: an execution backend
    /// first, lazily extended with a relation backend when needed.
    pub fn load(descriptor: &DatasetDescriptor) -> Result<Self, BackendError> {
        let primary = ExecutionBackend::open(descriptor)?;
        let log = primary
            .shared_log()
            .expect("execution backend always has a log");
        explorer_info!("event log loaded successfully");
        Ok(Self::assemble(log, descriptor.settings.clone()))
    }

    /// Builds the default chain around an already-loaded log.
    pub fn from_log(log: Arc<EventLog>, settings: ExtractionSettings) -> Self {
        Self::assemble(log, settings)
    }

    /// Wraps a single backend with no extension and no refilter support.
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            chain: Mutex::new(Chain::new(backend, None)),
            source: None,
        }
    }

    fn assemble(log: Arc<EventLog>, settings: ExtractionSettings) -> Self {
        let primary = ExecutionBackend::from_log(Arc::clone(&log), settings.clone());
        Self {
            cache: Mutex::new(HashMap::new()),
            chain: Mutex::new(Chain::new(Box::new(primary), Some(default_extension()))),
            source: Some(Source { log, settings }),
        }
    }

    /// Registers an extension procedure for the given chain slot, replacing
    /// any procedure already registered there.
    pub fn register_extension(&self, slot: usize, extension: ExtensionProc) {
        let mut chain = self.chain.lock().expect("lock backend chain");
        if slot < chain.extensions.len() {
            chain.extensions[slot] = Some(extension);
        }
    }

    /// Returns the cached result for the request, or computes it through
    /// the adapter chain and caches it. Failed computations are not cached.
    pub fn get_or_compute(&self, request: &OpRequest) -> Result<OpValue, ModelError> {
        if let Some(hit) = self.cache.lock().expect("lock cache").get(request) {
            explorer_debug!("cache hit for '{}'", request.name());
            return Ok(hit.clone());
        }

        let mut chain = self.chain.lock().expect("lock backend chain");
        // A concurrent identical request may have filled the cache while we
        // waited for the chain.
        if let Some(hit) = self.cache.lock().expect("lock cache").get(request) {
            explorer_debug!("cache hit for '{}' after coalescing", request.name());
            return Ok(hit.clone());
        }

        let value = chain.dispatch(request)?;
        self.cache
            .lock()
            .expect("lock cache")
            .insert(request.clone(), value.clone());
        Ok(value)
    }

    /// Restricts the log to the given object types and activities, resets
    /// the chain to a single fresh adapter, and wipes the cache. Cached
    /// results and secondary representations are invalid under a filter.
    pub fn apply_filter(
        &self,
        object_types: &[String],
        activities: &[String],
    ) -> Result<(), ModelError> {
        let source = self.source.as_ref().ok_or(ModelError::FilterUnavailable)?;
        // Always filter from the unfiltered source, not the current chain.
        let filtered = Arc::new(source.log.filtered(object_types, activities));
        explorer_info!(
            "filter applied: {} events remain; resetting adapter chain and cache",
            filtered.events().len()
        );

        let primary = ExecutionBackend::from_log(filtered, source.settings.clone());
        let mut chain = self.chain.lock().expect("lock backend chain");
        *chain = Chain::new(Box::new(primary), Some(default_extension()));
        self.cache.lock().expect("lock cache").clear();
        Ok(())
    }

    /// Wipes all cached results without touching the chain.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("lock cache").clear();
    }

    /// Current length of the adapter chain.
    pub fn backend_count(&self) -> usize {
        self.chain.lock().expect("lock backend chain").backends.len()
    }
}

/// Default extension: export the last adapter's log to a temporary
/// interchange file and reimport it as a relation backend.
fn default_extension() -> ExtensionProc {
    Box::new(|last: &dyn Backend| {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("extension.jsonocel");
        last.export_interchange(&path)?;
        let backend = RelationBackend::import(&path)?;
        Ok(Box::new(backend) as Box<dyn Backend>)
    })
}
