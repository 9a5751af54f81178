//! Presentation view of a [`Record`]:
//! locked values render as the literal sentinel `[Locked]`, hidden values
//! as `[Hidden]` (`[Locked]` wins if both apply); JSON/YAML omit empty
//! fields and expose `isHidden`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::storage::record::Record;

pub const LOCKED_SENTINEL: &str = "[Locked]";
pub const HIDDEN_SENTINEL: &str = "[Hidden]";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub is_locked: bool,
    pub is_hidden: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl RecordView {
    /// `no_values` omits the value entirely (`--no-values`); otherwise the
    /// displayed value is the sentinel for locked/hidden records, or the raw
    /// stored value (ciphertext, if locked and not already substituted).
    pub fn from_record(record: &Record, no_values: bool) -> Self {
        let value = if no_values {
            None
        } else if record.is_locked {
            Some(LOCKED_SENTINEL.to_string())
        } else if record.is_hidden {
            Some(HIDDEN_SENTINEL.to_string())
        } else {
            Some(record.value.clone())
        };

        RecordView {
            key: record.key.clone(),
            value,
            is_locked: record.is_locked,
            is_hidden: record.is_hidden,
            timestamp: record.timestamp,
            expires_at: record.expires_at,
        }
    }
}
