//! Ordered, in-memory transcript of settled exchanges.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};

use answer_service::AnswerService;
use tracing::{debug, info, warn};

use crate::core::entry::TranscriptEntry;
use crate::core::error::HistoryUnavailable;

#[derive(Debug, Default)]
struct TranscriptState {
    entries: Vec<TranscriptEntry>,
    restore_attempted: bool,
}

/// Ordered sequence of transcript entries.
///
/// Insertion order is display order. The only mutations are [`append`],
/// [`clear`], and the one-shot [`load_initial`]. Nothing is persisted locally.
///
/// [`append`]: TranscriptStore::append
/// [`clear`]: TranscriptStore::clear
/// [`load_initial`]: TranscriptStore::load_initial
#[derive(Debug, Default)]
pub struct TranscriptStore {
    state: Mutex<TranscriptState>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the transcript with the service's recorded history.
    ///
    /// Runs once per store. Later calls are ignored and return the current
    /// snapshot. A failed restore leaves the store empty, is logged as
    /// [`HistoryUnavailable`], and is not retried.
    pub fn load_initial(&self, service: &dyn AnswerService) -> Vec<TranscriptEntry> {
        {
            let mut state = self.lock_state();
            if state.restore_attempted {
                debug!("history restore already attempted; ignoring repeat call");
                return state.entries.clone();
            }
            state.restore_attempted = true;
        }

        match fetch_history(service) {
            Ok(entries) => {
                info!(entries = entries.len(), "restored transcript history");
                let mut state = self.lock_state();
                state.entries = entries;
                state.entries.clone()
            }
            Err(error) => {
                warn!(%error, "starting with an empty transcript");
                let mut state = self.lock_state();
                state.entries.clear();
                Vec::new()
            }
        }
    }

    /// Whether [`load_initial`](Self::load_initial) has already run.
    pub fn restore_attempted(&self) -> bool {
        self.lock_state().restore_attempted
    }

    /// Adds an entry at the end. No dedup, no reordering.
    pub fn append(&self, entry: TranscriptEntry) {
        let mut state = self.lock_state();
        state.entries.push(entry);
        debug!(entries = state.entries.len(), "transcript entry appended");
    }

    /// Empties the transcript. Local only.
    pub fn clear(&self) {
        let mut state = self.lock_state();
        let removed = state.entries.len();
        state.entries.clear();
        debug!(removed, "transcript cleared");
    }

    /// Snapshot reflecting the latest mutation.
    pub fn current_entries(&self) -> Vec<TranscriptEntry> {
        self.lock_state().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock_state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_state().entries.is_empty()
    }

    fn lock_state(&self) -> MutexGuard<'_, TranscriptState> {
        lock_unpoisoned(&self.state)
    }
}

fn fetch_history(service: &dyn AnswerService) -> Result<Vec<TranscriptEntry>, HistoryUnavailable> {
    let records = match catch_unwind(AssertUnwindSafe(|| service.history())) {
        Ok(Ok(records)) => records,
        Ok(Err(error)) => {
            return Err(HistoryUnavailable {
                reason: error.to_string(),
            })
        }
        Err(_) => {
            return Err(HistoryUnavailable {
                reason: "answer service panicked while fetching history".to_string(),
            })
        }
    };

    let total = records.len();
    let entries: Vec<TranscriptEntry> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match TranscriptEntry::from_history_record(record) {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(index, %error, "skipping unusable history record");
                None
            }
        })
        .collect();

    if entries.len() < total {
        debug!(kept = entries.len(), total, "history records filtered");
    }

    Ok(entries)
}

pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_service::{AskReply, AskRequest, HistoryRecord, ServiceError, ServiceProfile};
    use time::macros::datetime;

    struct PanickingHistory;

    impl AnswerService for PanickingHistory {
        fn profile(&self) -> ServiceProfile {
            ServiceProfile {
                service_id: "panicking".to_string(),
                endpoint: "memory://panicking".to_string(),
            }
        }

        fn history(&self) -> Result<Vec<HistoryRecord>, ServiceError> {
            panic!("history backend exploded");
        }

        fn ask(&self, _request: AskRequest) -> Result<AskReply, ServiceError> {
            Err(ServiceError::unavailable("unused"))
        }
    }

    #[test]
    fn panicking_history_is_treated_as_unavailable() {
        let store = TranscriptStore::new();

        let loaded = store.load_initial(&PanickingHistory);

        assert!(loaded.is_empty());
        assert!(store.is_empty());
        assert!(store.restore_attempted());
    }

    #[test]
    fn failed_restore_discards_entries_appended_before_it() {
        let store = TranscriptStore::new();
        store.append(TranscriptEntry::new(
            datetime!(2024-05-01 09:30 UTC),
            "early",
            "answer",
            None,
        ));

        store.load_initial(&PanickingHistory);

        assert!(store.is_empty());
    }
}
