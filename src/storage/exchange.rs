//! Bulk JSON export and all-or-nothing import of the subscription collection.

use std::collections::HashSet;

use serde_json::Value;
use tracing::info;

use crate::errors::{Result, TrackerError};
use crate::subscription::Subscription;

pub const EXPORT_FILE_NAME: &str = "subscriptions.json";

/// Serializes the collection as a pretty-printed JSON array.
pub fn export_json(subscriptions: &[Subscription]) -> Result<String> {
    Ok(serde_json::to_string_pretty(subscriptions)?)
}

/// Parses an exported collection.
///
/// The payload must be a JSON array whose every element is a complete subscription record
/// with a unique, non-empty id. Anything else is rejected as a whole; nothing is returned
/// for partial application.
pub fn import_json(payload: &str) -> Result<Vec<Subscription>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|err| TrackerError::ImportRejected(format!("not valid JSON: {err}")))?;
    let Value::Array(items) = value else {
        return Err(TrackerError::ImportRejected(
            "expected a JSON array of subscriptions".into(),
        ));
    };

    let mut seen = HashSet::new();
    let mut subscriptions = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.get("price").is_some_and(Value::is_number) {
            return Err(TrackerError::ImportRejected(format!(
                "record {index}: price must be a number"
            )));
        }
        let sub: Subscription = serde_json::from_value(item)
            .map_err(|err| TrackerError::ImportRejected(format!("record {index}: {err}")))?;
        if sub.id.trim().is_empty() {
            return Err(TrackerError::ImportRejected(format!(
                "record {index}: empty id"
            )));
        }
        if !seen.insert(sub.id.clone()) {
            return Err(TrackerError::ImportRejected(format!(
                "record {index}: duplicate id `{}`",
                sub.id
            )));
        }
        subscriptions.push(sub);
    }

    info!(count = subscriptions.len(), "import payload accepted");
    Ok(subscriptions)
}
