use std::path::Path;
use std::sync::Arc;

use explorer_logging::explorer_info;

use crate::analysis::{cases, heatmap, opera, variants};
use crate::backend::{Backend, BackendError, BackendKind, DatasetDescriptor, ExtractionSettings};
use crate::eventlog::EventLog;
use crate::interchange;
use crate::ops::{HeatmapKind, OpRequest, OpValue};

/// Adapter specialized in process executions: cases, variants, and OPERA
/// KPIs (plus the KPI-derived pooling/lagging heatmaps). Declines Petri-net
/// discovery, the interaction heatmap, the object-type→activity map, and
/// the extended table; those belong to the relation backend.
pub struct ExecutionBackend {
    log: Arc<EventLog>,
    settings: ExtractionSettings,
}

impl ExecutionBackend {
    pub fn open(descriptor: &DatasetDescriptor) -> Result<Self, BackendError> {
        explorer_info!("Importing dataset {}", descriptor.path.display());
        let log = interchange::import_file(&descriptor.path)?;
        Ok(Self::from_log(Arc::new(log), descriptor.settings.clone()))
    }

    /// Chained construction from an already-loaded log.
    pub fn from_log(log: Arc<EventLog>, settings: ExtractionSettings) -> Self {
        Self { log, settings }
    }

    fn cases(&self) -> Vec<crate::ops::Case> {
        cases::process_executions(&self.log, &self.settings.extraction)
    }
}

impl Backend for ExecutionBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Execution
    }

    fn query(&self, request: &OpRequest) -> Result<Option<OpValue>, BackendError> {
        let value = match request {
            OpRequest::ObjectTypes => {
                Some(OpValue::ObjectTypes(self.log.object_types().to_vec()))
            }
            OpRequest::ObjectTypeCounts => {
                Some(OpValue::ObjectTypeCounts(self.log.object_type_counts()))
            }
            OpRequest::Activities => Some(OpValue::Activities(self.log.activities())),
            OpRequest::Cases => Some(OpValue::Cases(self.cases())),
            OpRequest::Variants => {
                let cases = self.cases();
                Some(OpValue::Variants(variants::compute_variants(
                    &self.log, &cases,
                )))
            }
            OpRequest::VariantFrequencies => {
                let cases = self.cases();
                let variants = variants::compute_variants(&self.log, &cases);
                Some(OpValue::VariantFrequencies(variants::variant_frequencies(
                    &variants,
                    cases.len(),
                )))
            }
            OpRequest::VariantGraph { variant_id } => {
                let cases = self.cases();
                let variants = variants::compute_variants(&self.log, &cases);
                Some(OpValue::VariantGraph(variants::variant_graph(
                    &self.log, &cases, &variants, variant_id,
                )))
            }
            OpRequest::Opera { aggregation } => {
                Some(OpValue::Opera(opera::report(&self.log, *aggregation)))
            }
            OpRequest::Heatmap {
                kind: kind @ (HeatmapKind::Pooling | HeatmapKind::Lagging),
            } => {
                let report = opera::report(&self.log, Default::default());
                Some(OpValue::Heatmap(heatmap::kpi_heatmap(*kind, &report)))
            }
            OpRequest::ObjectTypeActivities
            | OpRequest::PetriNet
            | OpRequest::Heatmap {
                kind: HeatmapKind::ObjectInteraction,
            }
            | OpRequest::ExtendedTable => None,
        };
        Ok(value)
    }

    fn export_interchange(&self, path: &Path) -> Result<(), BackendError> {
        interchange::export_file(&self.log, path)?;
        Ok(())
    }

    fn shared_log(&self) -> Option<Arc<EventLog>> {
        Some(Arc::clone(&self.log))
    }
}
