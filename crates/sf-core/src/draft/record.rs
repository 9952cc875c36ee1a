use serde::Serialize;
use serde_json::Value;

use super::schema::DraftSchema;

/// Stored form of a draft: `{ "payload": {...}, "updatedAt": <ms> }`.
///
/// `updated_at` is diagnostic only and never used for conflict resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord<D: DraftSchema> {
    pub payload: D,
    pub updated_at: i64,
}

impl<D: DraftSchema> DraftRecord<D> {
    pub fn new(payload: D, updated_at: i64) -> Self {
        Self {
            payload,
            updated_at,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored record. Invalid JSON, a non-object top level, a missing
    /// or non-object payload, or a payload without valid fields all yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let record = value.as_object()?;
        let payload = D::normalize(record.get("payload")?)?;
        let updated_at = record
            .get("updatedAt")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        Some(Self::new(payload, updated_at))
    }
}
