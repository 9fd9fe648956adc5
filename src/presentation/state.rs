use std::collections::HashMap;

use serde::Serialize;

use crate::{db::ListedRecord, locale::Locale};

/// Everything the screen shows, as last fetched from the store.
///
/// Replaced wholesale after every mutation. The only field touched in place
/// is `drafts`, which follows keystrokes ahead of the debounced write.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub locale: Locale,
    pub records: Vec<ListedRecord>,
    /// Per-label counts, in catalog order.
    pub counts: Vec<(String, i64)>,
    /// Unsaved comment text per visible record id.
    pub drafts: HashMap<i64, String>,
}

impl ViewState {
    pub fn count_for(&self, label: &str) -> i64 {
        self.counts
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn contains(&self, record_id: i64) -> bool {
        self.records.iter().any(|record| record.id() == record_id)
    }

    /// Text the comment field should show: the draft if one exists,
    /// otherwise the stored comment.
    pub fn comment_for<'a>(&'a self, record: &'a ListedRecord) -> &'a str {
        self.drafts
            .get(&record.id())
            .map(String::as_str)
            .unwrap_or(record.record.comment.as_str())
    }
}
