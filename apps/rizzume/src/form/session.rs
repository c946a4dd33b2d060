use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::form::{apply, Edit, EditRejection};
use crate::models::resume::ResumeDocument;

/// Oldest snapshots are dropped past this depth.
const MAX_HISTORY: usize = 100;

struct History {
    current: Arc<ResumeDocument>,
    undo: Vec<Arc<ResumeDocument>>,
    redo: Vec<Arc<ResumeDocument>>,
}

/// The editing session's single document slot.
///
/// Snapshots are immutable and shared; `apply` computes the next one and swaps it in
/// under the lock, so concurrent callers never interleave a read-modify-write.
pub struct FormSession {
    inner: Mutex<History>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::with_document(ResumeDocument::new())
    }

    pub fn with_document(doc: ResumeDocument) -> Self {
        Self {
            inner: Mutex::new(History {
                current: Arc::new(doc),
                undo: Vec::new(),
                redo: Vec::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<ResumeDocument> {
        Arc::clone(&self.lock().current)
    }

    /// Applies `edit` to the current snapshot. Rejections leave the slot and history untouched.
    pub fn apply(&self, edit: &Edit) -> Result<Arc<ResumeDocument>, EditRejection> {
        let mut history = self.lock();
        let next = match apply(&history.current, edit) {
            Ok(next) => next,
            Err(rejection) => {
                debug!("Edit {:?} rejected: {}", edit, rejection);
                return Err(rejection);
            }
        };

        if next == *history.current {
            return Ok(Arc::clone(&history.current));
        }

        let next = Arc::new(next);
        let previous = std::mem::replace(&mut history.current, Arc::clone(&next));
        history.undo.push(previous);
        if history.undo.len() > MAX_HISTORY {
            history.undo.remove(0);
        }
        history.redo.clear();
        Ok(next)
    }

    /// Steps back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&self) -> bool {
        let mut history = self.lock();
        match history.undo.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut history.current, previous);
                history.redo.push(current);
                true
            }
            None => false,
        }
    }

    pub fn redo(&self) -> bool {
        let mut history = self.lock();
        match history.redo.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut history.current, next);
                history.undo.push(current);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        // snapshots are swapped whole, so a poisoned slot still holds a valid document
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Collection, ScalarField};

    fn set_name(value: &str) -> Edit {
        Edit::SetScalar {
            field: ScalarField::Name,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_apply_replaces_snapshot() {
        let session = FormSession::new();
        let before = session.snapshot();
        let after = session.apply(&set_name("Jane Doe")).unwrap();

        assert_eq!(before.name, "");
        assert_eq!(after.name, "Jane Doe");
        assert_eq!(session.snapshot().name, "Jane Doe");
    }

    #[test]
    fn test_rejected_edit_keeps_last_valid_state() {
        let session = FormSession::new();
        session.apply(&set_name("Jane")).unwrap();
        let err = session
            .apply(&Edit::RemoveEntry {
                collection: Collection::Projects,
                index: 0,
            })
            .unwrap_err();

        assert!(matches!(err, EditRejection::BelowMinimumCount { .. }));
        assert_eq!(session.snapshot().projects.len(), 1);
        assert!(session.undo());
        assert_eq!(session.snapshot().name, "");
        assert!(!session.undo());
    }

    #[test]
    fn test_undo_redo() {
        let session = FormSession::new();
        session.apply(&set_name("A")).unwrap();
        session.apply(&set_name("B")).unwrap();

        assert!(session.undo());
        assert_eq!(session.snapshot().name, "A");
        assert!(session.redo());
        assert_eq!(session.snapshot().name, "B");
        assert!(!session.redo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let session = FormSession::new();
        session.apply(&set_name("A")).unwrap();
        session.undo();
        session.apply(&set_name("C")).unwrap();
        assert!(!session.redo());
        assert_eq!(session.snapshot().name, "C");
    }

    #[test]
    fn test_noop_edit_not_recorded() {
        let session = FormSession::new();
        session.apply(&set_name("")).unwrap();
        assert!(!session.undo());
    }

    #[test]
    fn test_history_is_bounded() {
        let session = FormSession::new();
        for i in 0..(MAX_HISTORY + 10) {
            session.apply(&set_name(&i.to_string())).unwrap();
        }
        let mut undone = 0;
        while session.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_HISTORY);
    }

    #[test]
    fn test_concurrent_edits_are_not_lost() {
        let session = Arc::new(FormSession::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        session.apply(&Edit::AddEntry(Collection::Education)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(session.snapshot().education.len(), 81);
    }
}
