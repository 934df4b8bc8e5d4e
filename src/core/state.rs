// framiq/src/core/state.rs
//! Published state of a batch run.
//!
//! The pipeline is the only writer; observers hold a [`RunStateHandle`] and
//! read consistent snapshots of [`BatchRunState`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRunState {
    pub is_running: bool,
    pub is_cancelled: bool,
    pub processed_count: usize,
    pub total_count: usize,
    /// `processed_count / total_count`, 0.0 when nothing is queued.
    pub progress: f64,
    pub current_file_name: String,
    pub processed_files: Vec<String>,
    pub skipped_files: Vec<String>,
}

impl BatchRunState {
    /// Clear everything, including the result lists of the last run.
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    /// Clear the live fields of a run but keep its counts and result lists.
    pub fn clear_active_only(&mut self) {
        self.is_running = false;
        self.is_cancelled = false;
        self.progress = 0.0;
        self.current_file_name.clear();
    }

    /// Count one more visited file and refresh `progress`.
    pub fn record_visit(&mut self) {
        self.processed_count += 1;
        self.progress = if self.total_count == 0 {
            0.0
        } else {
            self.processed_count as f64 / self.total_count as f64
        };
    }

    pub fn is_complete(&self) -> bool {
        !self.is_running && self.total_count > 0 && self.processed_count == self.total_count
    }
}

/// Shared, lock-guarded view of a run's state.
#[derive(Debug, Clone, Default)]
pub struct RunStateHandle {
    inner: Arc<Mutex<BatchRunState>>,
}

impl RunStateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BatchRunState {
        self.lock().clone()
    }

    /// Apply a mutation while holding the lock; observers never see it half done.
    pub fn update<R>(&self, f: impl FnOnce(&mut BatchRunState) -> R) -> R {
        f(&mut self.lock())
    }

    /// Set `is_running` unless a run is already active. Returns whether the
    /// caller now owns the run.
    pub(crate) fn try_begin(&self) -> bool {
        let mut state = self.lock();
        if state.is_running {
            return false;
        }
        state.reset_all();
        state.is_running = true;
        true
    }

    fn lock(&self) -> MutexGuard<'_, BatchRunState> {
        // A panicking writer leaves plain data behind; keep serving it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cooperative cancellation flag, checked by the pipeline between files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// How a call to the pipeline ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every queued file was visited.
    Completed,
    /// The cancel flag stopped the run between files.
    Cancelled,
    /// Listing the input or creating the output directory failed.
    Aborted,
    /// Another run was already active; nothing happened.
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_state() -> BatchRunState {
        BatchRunState {
            is_running: true,
            is_cancelled: true,
            processed_count: 3,
            total_count: 4,
            progress: 0.75,
            current_file_name: "d.jpg".to_string(),
            processed_files: vec!["a.jpg".into(), "b.jpg".into()],
            skipped_files: vec!["c.jpg".into()],
        }
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut state = finished_state();
        state.reset_all();
        assert_eq!(state, BatchRunState::default());
    }

    #[test]
    fn clear_active_keeps_results() {
        let mut state = finished_state();
        state.clear_active_only();

        assert!(!state.is_running);
        assert!(!state.is_cancelled);
        assert_eq!(state.progress, 0.0);
        assert!(state.current_file_name.is_empty());
        assert_eq!(state.processed_count, 3);
        assert_eq!(state.total_count, 4);
        assert_eq!(state.processed_files.len(), 2);
        assert_eq!(state.skipped_files, vec!["c.jpg".to_string()]);
    }

    #[test]
    fn record_visit_updates_progress() {
        let mut state = BatchRunState {
            total_count: 4,
            ..Default::default()
        };
        state.record_visit();
        assert_eq!(state.processed_count, 1);
        assert_eq!(state.progress, 0.25);
    }

    #[test]
    fn second_begin_is_rejected_while_running() {
        let handle = RunStateHandle::new();
        assert!(handle.try_begin());
        handle.update(|s| s.total_count = 2);
        assert!(!handle.try_begin());
        assert_eq!(handle.snapshot().total_count, 2);

        handle.update(|s| s.is_running = false);
        assert!(handle.try_begin());
        assert_eq!(handle.snapshot().total_count, 0);
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        observer.cancel();
        assert!(token.is_cancelled());
        token.reset();
        assert!(!observer.is_cancelled());
    }
}
