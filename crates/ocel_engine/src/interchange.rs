//! Import/export of OCEL 1.0 JSON interchange files (`.jsonocel`).

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use explorer_logging::explorer_warn;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::eventlog::{Event, EventLog};

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed interchange file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("event '{event}' has unparsable timestamp '{value}'")]
    Timestamp { event: String, value: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct FileFormat {
    #[serde(rename = "ocel:global-log", default)]
    global_log: GlobalLog,
    #[serde(rename = "ocel:events")]
    events: BTreeMap<String, FileEvent>,
    #[serde(rename = "ocel:objects")]
    objects: BTreeMap<String, FileObject>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GlobalLog {
    #[serde(rename = "ocel:version", default)]
    version: String,
    #[serde(rename = "ocel:ordering", default)]
    ordering: String,
    #[serde(rename = "ocel:object-types", default)]
    object_types: Vec<String>,
    #[serde(rename = "ocel:attribute-names", default)]
    attribute_names: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileEvent {
    #[serde(rename = "ocel:activity")]
    activity: String,
    #[serde(rename = "ocel:timestamp")]
    timestamp: String,
    #[serde(rename = "ocel:omap", default)]
    omap: Vec<String>,
    #[serde(rename = "ocel:vmap", default, skip_serializing_if = "serde_json::Map::is_empty")]
    vmap: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileObject {
    #[serde(rename = "ocel:type")]
    object_type: String,
    #[serde(rename = "ocel:ovmap", default, skip_serializing_if = "serde_json::Map::is_empty")]
    ovmap: serde_json::Map<String, serde_json::Value>,
}

/// Reads an OCEL JSON file into the in-memory event log.
///
/// Object references to undeclared object ids are dropped with a warning,
/// matching the leniency of the common event-log libraries.
pub fn import_file(path: &Path) -> Result<EventLog, InterchangeError> {
    let raw = fs::read_to_string(path)?;
    let file: FileFormat = serde_json::from_str(&raw)?;

    let objects: BTreeMap<String, String> = file
        .objects
        .into_iter()
        .map(|(id, object)| (id, object.object_type))
        .collect();

    let mut events = Vec::with_capacity(file.events.len());
    for (id, event) in file.events {
        let timestamp = parse_timestamp(&event.timestamp).ok_or_else(|| {
            InterchangeError::Timestamp {
                event: id.clone(),
                value: event.timestamp.clone(),
            }
        })?;
        let mut refs = Vec::with_capacity(event.omap.len());
        for object_id in event.omap {
            if objects.contains_key(&object_id) {
                refs.push(object_id);
            } else {
                explorer_warn!("event '{}' references unknown object '{}'", id, object_id);
            }
        }
        events.push(Event {
            id,
            activity: event.activity,
            timestamp,
            objects: refs,
        });
    }

    Ok(EventLog::new(events, objects))
}

/// Writes the event log as OCEL JSON, atomically (temp file then rename).
pub fn export_file(log: &EventLog, path: &Path) -> Result<(), InterchangeError> {
    let file = FileFormat {
        global_log: GlobalLog {
            version: "1.0".to_string(),
            ordering: "timestamp".to_string(),
            object_types: log.object_types().to_vec(),
            attribute_names: Vec::new(),
        },
        events: log
            .events()
            .iter()
            .map(|event| {
                (
                    event.id.clone(),
                    FileEvent {
                        activity: event.activity.clone(),
                        timestamp: event.timestamp.to_rfc3339(),
                        omap: event.objects.clone(),
                        vmap: serde_json::Map::new(),
                    },
                )
            })
            .collect(),
        objects: log
            .objects()
            .iter()
            .map(|(id, object_type)| {
                (
                    id.clone(),
                    FileObject {
                        object_type: object_type.clone(),
                        ovmap: serde_json::Map::new(),
                    },
                )
            })
            .collect(),
    };

    let serialized = serde_json::to_string_pretty(&file)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(serialized.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| InterchangeError::Io(e.error))?;
    Ok(())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Some exporters write naive timestamps; interpret them as UTC.
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    None
}
