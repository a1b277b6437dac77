use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::eventlog::EventLog;
use crate::interchange::InterchangeError;
use crate::ops::{OpRequest, OpValue};

/// Identifies the concrete adapter family, mostly for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Execution,
    Relation,
    Dummy,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Execution => write!(f, "execution"),
            BackendKind::Relation => write!(f, "relation"),
            BackendKind::Dummy => write!(f, "dummy"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("interchange error: {0}")]
    Interchange(#[from] InterchangeError),
    #[error("backend '{0}' does not support interchange export")]
    ExportUnsupported(BackendKind),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// How process executions (cases) are extracted from the object graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExecutionExtraction {
    /// Connected components of the event-object graph.
    #[default]
    ConnectedComponents,
    /// One case per object of the named leading type.
    LeadingType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionSettings {
    pub extraction: ExecutionExtraction,
    /// Exact variant equivalence is not implemented; sequences of activity
    /// names are compared instead. Kept for interchange of settings.
    pub exact_variants: bool,
}

/// Where and how to load a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    pub path: PathBuf,
    pub settings: ExtractionSettings,
}

impl DatasetDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: ExtractionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ExtractionSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Uniform capability contract over one underlying event-log representation.
///
/// `Ok(None)` means "this backend does not support the operation" and is the
/// signal the dispatcher uses to fall through to the next adapter. It is
/// distinct from a supported operation with an empty answer, which is an
/// `Ok(Some(..))` carrying an empty value. Backends never error on an
/// unsupported operation.
pub trait Backend: Send {
    fn kind(&self) -> BackendKind;

    fn query(&self, request: &OpRequest) -> Result<Option<OpValue>, BackendError>;

    /// Serializes this backend's event log to an interchange file. Used by
    /// the dispatcher's lazy-extension mechanism; optional.
    fn export_interchange(&self, _path: &Path) -> Result<(), BackendError> {
        Err(BackendError::ExportUnsupported(self.kind()))
    }

    /// The already-loaded in-memory log, if this backend has one. Enables
    /// chained construction without a round-trip through the filesystem.
    fn shared_log(&self) -> Option<Arc<EventLog>> {
        None
    }
}
