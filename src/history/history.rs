//! Snapshot-based undo/redo history.
//!
//! [`DocumentHistory`] keeps a linear stack of full document snapshots.
//! Before every mutation the caller records the pre-mutation state with
//! [`commit`](DocumentHistory::commit); undo and redo then move a cursor
//! through the recorded states and restore the document wholesale.
//! Recording after undoing discards the redo branch (standard editor
//! behavior).

use std::collections::VecDeque;

use crate::document::Document;
use crate::snapshot;

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_UNDO: usize = 100;

struct HistoryEntry {
    label: String,
    /// Encoded document state from just before the labeled mutation.
    data: Vec<u8>,
}

/// Linear undo/redo stack of full document snapshots.
///
/// The entry list is a bounded [`VecDeque`]; when it exceeds `max_undo`
/// the oldest snapshot is dropped from the front. `cursor` counts how
/// many entries lie behind the current state: `cursor == entries.len()`
/// means the document is at the live top, `cursor == 0` means every
/// recorded mutation has been undone. The first undo from the top
/// captures the live state so redo can return all the way forward.
///
/// # Example
///
/// ```ignore
/// let mut doc = Document::new();
/// let mut history = DocumentHistory::new(DEFAULT_MAX_UNDO);
///
/// history.commit("Create sprite", &doc);
/// doc.create_sprite(position, size, "hero.png", &resolver)?;
///
/// history.undo(&mut doc); // sprite gone
/// history.redo(&mut doc); // sprite back
/// ```
pub struct DocumentHistory {
    entries: VecDeque<HistoryEntry>,
    /// Number of entries behind the current state, in `0..=entries.len()`.
    cursor: usize,
    /// Live state captured on the first undo from the top.
    live_top: Option<Vec<u8>>,
    max_undo: usize,
    /// Cursor position at the last save, or `None` when the saved state
    /// is unreachable through undo/redo.
    saved_cursor: Option<usize>,
}

impl DocumentHistory {
    /// Creates an empty history with the given maximum undo depth.
    pub fn new(max_undo: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            live_top: None,
            max_undo: max_undo.max(1),
            saved_cursor: Some(0),
        }
    }

    /// Records the current document state under `label`, to be called
    /// immediately before the labeled mutation is applied.
    ///
    /// If the cursor sits below the top, the redo branch above it is
    /// discarded first.
    pub fn commit(&mut self, label: impl Into<String>, doc: &Document) {
        if self.cursor < self.entries.len() {
            self.entries.truncate(self.cursor);
            if matches!(self.saved_cursor, Some(s) if s > self.cursor) {
                self.saved_cursor = None;
            }
        }
        self.live_top = None;

        self.entries.push_back(HistoryEntry {
            label: label.into(),
            data: snapshot::encode(doc),
        });
        self.cursor = self.entries.len();

        if self.entries.len() > self.max_undo {
            self.entries.pop_front();
            self.cursor -= 1;
            self.saved_cursor = match self.saved_cursor {
                Some(0) | None => None,
                Some(s) => Some(s - 1),
            };
        }
        log::debug!("history commit, {} undo steps", self.cursor);
    }

    /// Steps the document back one recorded state.
    ///
    /// Returns `false` without touching the document when everything is
    /// already undone. The first undo from the top captures the live
    /// state so a later redo can restore it.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        if self.cursor == 0 {
            return false;
        }
        if self.cursor == self.entries.len() && self.live_top.is_none() {
            self.live_top = Some(snapshot::encode(doc));
        }
        self.cursor -= 1;
        Self::restore(doc, &self.entries[self.cursor].data);
        true
    }

    /// Steps the document forward one recorded state.
    ///
    /// Returns `false` when the document is already at the live top.
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        if self.cursor == self.entries.len() {
            return false;
        }
        self.cursor += 1;
        if self.cursor == self.entries.len() {
            // Captured by the first undo from the top; a redo can only
            // get here after such an undo.
            let top = self
                .live_top
                .as_deref()
                .expect("live state captured on first undo");
            Self::restore(doc, top);
        } else {
            Self::restore(doc, &self.entries[self.cursor].data);
        }
        true
    }

    /// A snapshot produced by this history must always decode again;
    /// failure means the document state is corrupt beyond recovery.
    fn restore(doc: &mut Document, data: &[u8]) {
        *doc = snapshot::decode(data).expect("history snapshot failed to decode");
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Labels of the states that undo would step through, most recent
    /// first.
    pub fn undo_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .take(self.cursor)
            .rev()
            .map(|e| e.label.as_str())
    }

    /// Labels of the states that redo would step through, nearest first.
    pub fn redo_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .skip(self.cursor)
            .map(|e| e.label.as_str())
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.cursor
    }

    pub fn max_undo(&self) -> usize {
        self.max_undo
    }

    /// Records the current state as the saved state.
    pub fn mark_saved(&mut self) {
        self.saved_cursor = Some(self.cursor);
    }

    /// Returns `true` when the current state differs from the last
    /// saved state, or when the save point is no longer reachable.
    pub fn has_unsaved_changes(&self) -> bool {
        self.saved_cursor != Some(self.cursor)
    }

    /// Drops all recorded states. The document itself is untouched, so
    /// a clean history stays clean; otherwise the save point is lost.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.live_top = None;
        self.saved_cursor = if self.has_unsaved_changes() {
            None
        } else {
            Some(0)
        };
        self.cursor = 0;
    }
}

impl Default for DocumentHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl std::fmt::Debug for DocumentHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHistory")
            .field("entries", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("max_undo", &self.max_undo)
            .field("saved_cursor", &self.saved_cursor)
            .finish()
    }
}
