use crate::deser::SerializationError;
use serde::{Deserialize, Serialize};

pub type JsonFieldUpdate = (String, serde_json::Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsonUpdateKind {
    Failed,
    Ok,
    UpdateFields(Vec<JsonFieldUpdate>),
}

pub fn update_fields_or_fail(
    callback: impl FnOnce(&mut Vec<JsonFieldUpdate>) -> Result<(), SerializationError>,
) -> JsonUpdateKind {
    let mut updates = Vec::with_capacity(1);
    if let Ok(()) = callback(&mut updates) {
        JsonUpdateKind::UpdateFields(updates)
    } else {
        JsonUpdateKind::Failed
    }
}
