use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex as StdMutex, MutexGuard},
    time::Duration,
};

use anyhow::{bail, Result};
use tokio::sync::Mutex;

use crate::{
    catalog::EmotionCatalog,
    db::Database,
    debounce::{Debouncer, DEBOUNCE_DELAY},
    locale::Locale,
    settings::FeedbackSettings,
};

use super::{
    feedback::{Haptics, Notifier},
    render::{render, Screen},
    ViewState,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Comment-editing state for one visible row.
struct RowSlot {
    draft: String,
    debouncer: Debouncer,
}

type RowSlots = HashMap<i64, RowSlot>;

fn lock_rows(rows: &StdMutex<RowSlots>) -> MutexGuard<'_, RowSlots> {
    match rows.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Drives the mood screen: applies user actions to the store and rebuilds
/// the view state from it afterwards.
#[derive(Clone)]
pub struct MoodController {
    db: Database,
    catalog: Arc<EmotionCatalog>,
    locale: Locale,
    feedback: FeedbackSettings,
    haptics: Arc<dyn Haptics>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<ViewState>>,
    rows: Arc<StdMutex<RowSlots>>,
    debounce_delay: Duration,
}

impl MoodController {
    pub fn new(
        db: Database,
        catalog: EmotionCatalog,
        locale: Locale,
        feedback: FeedbackSettings,
        haptics: Arc<dyn Haptics>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            catalog: Arc::new(catalog),
            locale,
            feedback,
            haptics,
            notifier,
            state: Arc::new(Mutex::new(ViewState {
                locale,
                ..ViewState::default()
            })),
            rows: Arc::new(StdMutex::new(HashMap::new())),
            debounce_delay: DEBOUNCE_DELAY,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    pub fn catalog(&self) -> &EmotionCatalog {
        &self.catalog
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    pub async fn screen(&self) -> Screen {
        let state = self.snapshot().await;
        render(&state, &self.catalog)
    }

    /// Re-read every record and count, then swap in the new state.
    ///
    /// Row slots for records that are no longer listed are dropped, which
    /// cancels their pending writes.
    pub async fn refresh(&self) -> Result<ViewState> {
        let mut state = self.state.lock().await;

        let records = self.db.list_records(self.locale).await?;
        let counts = self.db.count_labels(self.catalog.labels()).await?;

        let visible: HashSet<i64> = records.iter().map(|record| record.id()).collect();
        let drafts = {
            let mut rows = lock_rows(&self.rows);
            rows.retain(|id, _| visible.contains(id));
            rows.iter()
                .map(|(id, slot)| (*id, slot.draft.clone()))
                .collect()
        };

        *state = ViewState {
            locale: self.locale,
            records,
            counts,
            drafts,
        };
        Ok(state.clone())
    }

    /// A button tap: store the label, pulse, confirm, refresh.
    pub async fn record_emotion(&self, label: &str) -> Result<ViewState> {
        if !self.catalog.emotions().any(|emotion| emotion.label == label) {
            bail!("'{label}' is not one of the configured emotions");
        }

        match self.db.insert_record(label, "").await {
            Ok(()) => {
                log_info!("recorded {label}");
                self.haptics.pulse(self.feedback.haptic());
                self.notifier
                    .show(&self.locale.recorded_notice(label), self.feedback.notice());
            }
            Err(err) => log_error!("failed to record {label}: {err:#}"),
        }

        self.refresh().await
    }

    pub async fn delete_record(&self, record_id: i64) -> Result<ViewState> {
        lock_rows(&self.rows).remove(&record_id);

        if let Err(err) = self.db.delete_record(record_id).await {
            log_error!("failed to delete record {record_id}: {err:#}");
        }

        self.refresh().await
    }

    /// A keystroke in a row's comment field.
    ///
    /// The draft is visible immediately; the store write and the refresh that
    /// follows it are debounced per row.
    pub async fn edit_comment(&self, record_id: i64, text: &str) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            if !state.contains(record_id) {
                bail!("record {record_id} is not on screen");
            }
            state.drafts.insert(record_id, text.to_string());
        }

        let controller = self.clone();
        let comment = text.to_string();

        let mut rows = lock_rows(&self.rows);
        let slot = rows.entry(record_id).or_insert_with(|| RowSlot {
            draft: String::new(),
            debouncer: Debouncer::new(self.debounce_delay),
        });
        slot.draft = comment.clone();
        slot.debouncer.debounce(move || async move {
            if let Err(err) = controller.db.update_comment(record_id, &comment).await {
                log_error!("failed to save comment for record {record_id}: {err:#}");
                return;
            }
            if let Err(err) = controller.refresh().await {
                log_error!("refresh after comment save failed: {err:#}");
            }
        });

        Ok(())
    }

    pub fn has_pending_writes(&self) -> bool {
        lock_rows(&self.rows)
            .values()
            .any(|slot| slot.debouncer.is_pending())
    }

    /// Wait for every scheduled comment write to run.
    pub async fn settle(&self) {
        let handles: Vec<_> = lock_rows(&self.rows)
            .values()
            .filter_map(|slot| slot.debouncer.take_handle())
            .collect();

        for handle in handles {
            if let Err(err) = handle.await {
                log_warn!("comment write task failed: {err}");
            }
        }
    }
}
