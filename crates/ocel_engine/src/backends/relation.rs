use std::path::Path;
use std::sync::Arc;

use explorer_logging::explorer_info;

use crate::analysis::{heatmap, petri};
use crate::backend::{Backend, BackendError, BackendKind, DatasetDescriptor};
use crate::eventlog::EventLog;
use crate::interchange;
use crate::ops::{HeatmapKind, OpRequest, OpValue, Table};

/// Adapter specialized in the event-object relation view: Petri-net
/// discovery, the interaction heatmap, the object-type→activity map, and
/// the extended table. Declines cases, variants, and OPERA; those belong
/// to the execution backend.
pub struct RelationBackend {
    log: Arc<EventLog>,
}

impl RelationBackend {
    pub fn open(descriptor: &DatasetDescriptor) -> Result<Self, BackendError> {
        Self::import(&descriptor.path)
    }

    pub fn import(path: &Path) -> Result<Self, BackendError> {
        explorer_info!("Importing dataset {}", path.display());
        let log = interchange::import_file(path)?;
        Ok(Self::from_log(Arc::new(log)))
    }

    /// Chained construction from an already-loaded log.
    pub fn from_log(log: Arc<EventLog>) -> Self {
        Self { log }
    }

    fn extended_table(&self) -> Table {
        let object_types = self.log.object_types();
        let mut columns = vec![
            "event".to_string(),
            "activity".to_string(),
            "timestamp".to_string(),
        ];
        columns.extend(object_types.iter().cloned());

        let rows = self
            .log
            .events()
            .iter()
            .map(|event| {
                let mut row = vec![
                    event.id.clone(),
                    event.activity.clone(),
                    event.timestamp.to_rfc3339(),
                ];
                for object_type in object_types {
                    let ids: Vec<&str> = event
                        .objects
                        .iter()
                        .filter(|id| self.log.object_type_of(id) == Some(object_type.as_str()))
                        .map(String::as_str)
                        .collect();
                    row.push(ids.join(", "));
                }
                row
            })
            .collect();

        Table { columns, rows }
    }
}

impl Backend for RelationBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Relation
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
            OpRequest::ObjectTypeActivities => Some(OpValue::ObjectTypeActivities(
                self.log.object_type_activities(),
            )),
            OpRequest::PetriNet => Some(OpValue::PetriNet(petri::discover(&self.log))),
            OpRequest::Heatmap {
                kind: HeatmapKind::ObjectInteraction,
            } => Some(OpValue::Heatmap(heatmap::object_interaction(&self.log))),
            OpRequest::ExtendedTable => Some(OpValue::ExtendedTable(self.extended_table())),
            OpRequest::Opera { .. }
            | OpRequest::Cases
            | OpRequest::Variants
            | OpRequest::VariantFrequencies
            | OpRequest::VariantGraph { .. }
            | OpRequest::Heatmap {
                kind: HeatmapKind::Pooling | HeatmapKind::Lagging,
            } => None,
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
