use ocel_engine::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// No adapter answered and no further extension is possible. Fatal for
    /// the single request; never cached, never retried automatically.
    #[error("operation '{operation}' is not supported by any available backend")]
    Unsupported { operation: &'static str },
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    /// The model was built from a bare backend without an event log, so
    /// there is nothing to refilter.
    #[error("no event log loaded; cannot apply a filter")]
    FilterUnavailable,
}
