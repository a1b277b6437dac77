use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};

/// A single event with its related objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub activity: String,
    pub timestamp: DateTime<Utc>,
    /// Ids of the objects this event relates to.
    pub objects: Vec<String>,
}

/// In-memory object-centric event log shared by all backend adapters.
///
/// Events are kept sorted by timestamp (ties broken by event id), so any
/// per-object or per-case slice of the log is already in temporal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
    /// Object id -> object type.
    objects: BTreeMap<String, String>,
    object_types: Vec<String>,
}

impl EventLog {
    pub fn new(mut events: Vec<Event>, objects: BTreeMap<String, String>) -> Self {
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        let object_types: Vec<String> = objects
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            events,
            objects,
            object_types,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn objects(&self) -> &BTreeMap<String, String> {
        &self.objects
    }

    /// Object types present in the log, sorted and deduplicated.
    pub fn object_types(&self) -> &[String] {
        &self.object_types
    }

    pub fn object_type_of(&self, object_id: &str) -> Option<&str> {
        self.objects.get(object_id).map(String::as_str)
    }

    /// Number of objects per object type.
    pub fn object_type_counts(&self) -> BTreeMap<String, u64> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for object_type in self.objects.values() {
            *counts.entry(object_type.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Activity names, sorted and deduplicated.
    pub fn activities(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.events.iter().map(|e| e.activity.as_str()).collect();
        set.into_iter().map(ToOwned::to_owned).collect()
    }

    /// Activities observed per object type.
    pub fn object_type_activities(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for event in &self.events {
            for object_id in &event.objects {
                if let Some(object_type) = self.object_type_of(object_id) {
                    map.entry(object_type.to_string())
                        .or_default()
                        .insert(event.activity.clone());
                }
            }
        }
        map.into_iter()
            .map(|(ot, acts)| (ot, acts.into_iter().collect()))
            .collect()
    }

    /// Map from object id to the indices of its events, in temporal order.
    pub fn events_per_object(&self) -> HashMap<&str, Vec<usize>> {
        let mut map: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, event) in self.events.iter().enumerate() {
            for object_id in &event.objects {
                map.entry(object_id.as_str()).or_default().push(index);
            }
        }
        map
    }

    pub fn event_index(&self, event_id: &str) -> Option<usize> {
        self.events.iter().position(|e| e.id == event_id)
    }

    /// Restriction of the log to the given object types and activities.
    ///
    /// Events whose activity is filtered out are dropped; surviving events
    /// lose references to objects of filtered-out types. An event left with
    /// no object references is dropped as well, since nothing object-centric
    /// can be said about it anymore.
    pub fn filtered(&self, object_types: &[String], activities: &[String]) -> EventLog {
        let keep_types: HashSet<&str> = object_types.iter().map(String::as_str).collect();
        let keep_activities: HashSet<&str> = activities.iter().map(String::as_str).collect();

        let objects: BTreeMap<String, String> = self
            .objects
            .iter()
            .filter(|(_, ot)| keep_types.contains(ot.as_str()))
            .map(|(id, ot)| (id.clone(), ot.clone()))
            .collect();

        let events: Vec<Event> = self
            .events
            .iter()
            .filter(|event| keep_activities.contains(event.activity.as_str()))
            .filter_map(|event| {
                let kept: Vec<String> = event
                    .objects
                    .iter()
                    .filter(|id| objects.contains_key(*id))
                    .cloned()
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    Some(Event {
                        id: event.id.clone(),
                        activity: event.activity.clone(),
                        timestamp: event.timestamp,
                        objects: kept,
                    })
                }
            })
            .collect();

        EventLog::new(events, objects)
    }
}
