use std::collections::BTreeMap;

use crate::backend::{Backend, BackendError, BackendKind};
use crate::ops::{OpRequest, OpValue};

/// Static responses for faster UI development; no event log behind it.
#[derive(Debug, Default)]
pub struct DummyBackend;

const OBJECT_TYPES: &[&str] = &["order", "item", "package", "delivery", "invoice"];
const ACTIVITIES: &[&str] = &[
    "Place Order",
    "Pack Items",
    "Send Invoice",
    "Start Delivery",
    "Receive Payment",
    "Request Refund",
];

impl Backend for DummyBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Dummy
    }

    fn query(&self, request: &OpRequest) -> Result<Option<OpValue>, BackendError> {
        let value = match request {
            OpRequest::ObjectTypes => Some(OpValue::ObjectTypes(
                OBJECT_TYPES.iter().map(|s| s.to_string()).collect(),
            )),
            OpRequest::Activities => Some(OpValue::Activities(
                ACTIVITIES.iter().map(|s| s.to_string()).collect(),
            )),
            OpRequest::ObjectTypeCounts => {
                let counts: BTreeMap<String, u64> = OBJECT_TYPES
                    .iter()
                    .enumerate()
                    .map(|(index, ot)| (ot.to_string(), 10 + 5 * index as u64))
                    .collect();
                Some(OpValue::ObjectTypeCounts(counts))
            }
            _ => None,
        };
        Ok(value)
    }
}
