//! Latest-result slot shared by concurrent submissions
//!
//! Every submission gets an id from [`SubmissionTracker::submit`]. When its
//! answer arrives it is offered back with [`SubmissionTracker::resolve`], which
//! keeps it only if no newer submission has been made since. Responses that
//! arrive out of order therefore never replace a fresher result.

use super::outcome::Outcome;
use crate::grammar::Formula;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u64);

impl SubmissionId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A resolved submission currently on display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub id: SubmissionId,
    pub formula: Formula,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct SubmissionTracker {
    issued: AtomicU64,
    latest: Mutex<Option<Resolved>>,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new submission; it supersedes all earlier ones
    pub fn submit(&self) -> SubmissionId {
        SubmissionId(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Id of the most recent submission, if any
    pub fn current(&self) -> Option<SubmissionId> {
        match self.issued.load(Ordering::SeqCst) {
            0 => None,
            n => Some(SubmissionId(n)),
        }
    }

    /// Offer an answer; returns whether it was kept
    pub fn resolve(&self, id: SubmissionId, formula: Formula, outcome: Outcome) -> bool {
        if self.current() != Some(id) {
            tracing::debug!(submission = id.value(), "discarding stale response");
            return false;
        }

        let mut latest = self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // A newer submission may have been issued while waiting for the lock
        if self.current() != Some(id) {
            return false;
        }
        *latest = Some(Resolved { id, formula, outcome });
        true
    }

    /// The result currently on display
    pub fn latest(&self) -> Option<Resolved> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::VariableValue;
    use std::sync::Arc;

    fn sat(name: &str) -> Outcome {
        Outcome::Satisfiable {
            pairs: vec![VariableValue::new(name, true)],
        }
    }

    fn formula(text: &str) -> Formula {
        Formula::new(text).unwrap()
    }

    #[test]
    fn test_ids_increase() {
        let tracker = SubmissionTracker::new();
        assert_eq!(tracker.current(), None);

        let first = tracker.submit();
        let second = tracker.submit();
        assert!(second > first);
        assert_eq!(tracker.current(), Some(second));
    }

    #[test]
    fn test_latest_submission_is_kept() {
        let tracker = SubmissionTracker::new();
        let id = tracker.submit();

        assert!(tracker.resolve(id, formula("a"), sat("a")));
        let shown = tracker.latest().unwrap();
        assert_eq!(shown.id, id);
        assert_eq!(shown.outcome, sat("a"));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let tracker = SubmissionTracker::new();
        let first = tracker.submit();
        let second = tracker.submit();

        // Second answer arrives first, then the stale first answer
        assert!(tracker.resolve(second, formula("b"), sat("b")));
        assert!(!tracker.resolve(first, formula("a"), sat("a")));

        assert_eq!(tracker.latest().unwrap().formula, formula("b"));
    }

    #[test]
    fn test_pending_newer_submission_blocks_older_answer() {
        let tracker = SubmissionTracker::new();
        let first = tracker.submit();
        let _second = tracker.submit();

        assert!(!tracker.resolve(first, formula("a"), sat("a")));
        assert!(tracker.latest().is_none());
    }

    #[test]
    fn test_concurrent_submissions() {
        let tracker = Arc::new(SubmissionTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || tracker.submit())
            })
            .collect();
        let mut ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(tracker.current(), ids.last().copied());
    }
}
