//! Emotion record models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One tapped emotion as persisted in `Records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionRecord {
    pub id: i64,
    pub label: String,
    /// Local wall-clock time at creation.
    pub timestamp: NaiveDateTime,
    pub comment: String,
}

/// A record as handed to the view, with its elapsed time rendered against
/// the clock at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedRecord {
    #[serde(flatten)]
    pub record: EmotionRecord,
    pub relative_time: String,
}

impl ListedRecord {
    pub fn id(&self) -> i64 {
        self.record.id
    }
}
