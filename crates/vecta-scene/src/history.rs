//! The undo/redo log of one document.

use tracing::{debug, error, info, warn};
use vecta_core::HistoryConfig;

use crate::command::{Command, Macro, Outcome};
use crate::document::Document;
use crate::error::{SceneError, SceneResult};

/// Proof of an open macro scope, handed back to [`HistoryManager::end_macro`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an open macro must be closed with end_macro"]
pub struct MacroToken {
    depth: usize,
}

/// Linear history of applied commands with a cursor.
///
/// `cursor` counts applied entries: entries before it can be undone, entries
/// from it on can be redone. While a macro is open, pushed commands are
/// buffered into it and the cursor does not move.
pub struct HistoryManager {
    entries: Vec<Box<dyn Command>>,
    cursor: usize,
    open: Vec<Macro>,
    max_entries: usize,
    corrupted: Option<String>,
}

impl HistoryManager {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            open: Vec::new(),
            max_entries: config.max_entries,
            corrupted: None,
        }
    }

    fn check_usable(&self) -> SceneResult<()> {
        match &self.corrupted {
            Some(reason) => Err(SceneError::HistoryCorruption {
                label: "history".to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Apply `command` and record it unless it was a no-op.
    pub fn push(&mut self, doc: &mut Document, command: impl Command + 'static) -> SceneResult<Outcome> {
        self.push_boxed(doc, Box::new(command))
    }

    pub fn push_boxed(&mut self, doc: &mut Document, mut command: Box<dyn Command>) -> SceneResult<Outcome> {
        self.check_usable()?;
        let outcome = command.apply(doc)?;
        if outcome == Outcome::NoOp {
            debug!(label = %command.label(), "discarding no-op command");
            return Ok(outcome);
        }
        let depth = self.open.len();
        match self.open.last_mut() {
            Some(open) => {
                debug!(label = %command.label(), depth, "buffered into macro");
                open.record(command);
            }
            None => self.record(command),
        }
        Ok(outcome)
    }

    fn record(&mut self, command: Box<dyn Command>) {
        debug!(label = %command.label(), cursor = self.cursor, "recorded");
        self.entries.truncate(self.cursor);
        self.entries.push(command);
        self.cursor = self.entries.len();
        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
            self.cursor -= excess;
        }
    }

    /// Open a compound scope. Scopes nest; the outermost one becomes a single entry.
    pub fn begin_macro(&mut self, label: impl Into<String>) -> SceneResult<MacroToken> {
        self.check_usable()?;
        let label = label.into();
        self.open.push(Macro::new(label.clone()));
        debug!(label = %label, depth = self.open.len(), "macro opened");
        Ok(MacroToken {
            depth: self.open.len(),
        })
    }

    /// Close the innermost scope. Returns `NoOp` when it buffered nothing and was discarded.
    pub fn end_macro(&mut self, token: MacroToken) -> SceneResult<Outcome> {
        if token.depth != self.open.len() {
            return Err(SceneError::MacroState(format!(
                "closing macro at depth {} while {} are open",
                token.depth,
                self.open.len()
            )));
        }
        let Some(closed) = self.open.pop() else {
            return Err(SceneError::MacroState("no macro is open".into()));
        };
        if closed.is_empty() {
            warn!(label = %closed.label(), "discarding empty macro");
            return Ok(Outcome::NoOp);
        }
        debug!(label = %closed.label(), commands = closed.len(), "macro closed");
        match self.open.last_mut() {
            Some(outer) => outer.record(Box::new(closed)),
            None => self.record(Box::new(closed)),
        }
        Ok(Outcome::Changed)
    }

    pub fn is_recording(&self) -> bool {
        !self.open.is_empty()
    }

    fn check_idle(&self) -> SceneResult<()> {
        self.check_usable()?;
        if self.is_recording() {
            return Err(SceneError::MacroState(
                "undo and redo are unavailable while a macro is open".into(),
            ));
        }
        Ok(())
    }

    fn corrupt(&mut self, label: String, err: SceneError) -> SceneError {
        error!(label = %label, error = %err, "history corrupted");
        self.corrupted = Some(format!("'{}' failed: {}", label, err));
        SceneError::HistoryCorruption {
            label,
            reason: err.to_string(),
        }
    }

    pub fn undo(&mut self, doc: &mut Document) -> SceneResult<()> {
        self.check_idle()?;
        if self.cursor == 0 {
            return Err(SceneError::NothingToUndo);
        }
        let entry = &mut self.entries[self.cursor - 1];
        if let Err(err) = entry.revert(doc) {
            let label = entry.label();
            return Err(self.corrupt(label, err));
        }
        debug!(label = %entry.label(), "undone");
        self.cursor -= 1;
        Ok(())
    }

    pub fn redo(&mut self, doc: &mut Document) -> SceneResult<()> {
        self.check_idle()?;
        if self.cursor == self.entries.len() {
            return Err(SceneError::NothingToRedo);
        }
        let entry = &mut self.entries[self.cursor];
        if let Err(err) = entry.apply(doc) {
            let label = entry.label();
            return Err(self.corrupt(label, err));
        }
        debug!(label = %entry.label(), "redone");
        self.cursor += 1;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.corrupted.is_none() && !self.is_recording() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.corrupted.is_none() && !self.is_recording() && self.cursor < self.entries.len()
    }

    pub fn undo_label(&self) -> Option<String> {
        self.cursor.checked_sub(1).map(|i| self.entries[i].label())
    }

    pub fn redo_label(&self) -> Option<String> {
        self.entries.get(self.cursor).map(|e| e.label())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_corrupted(&self) -> bool {
        self.corrupted.is_some()
    }

    /// Labels of every entry, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label()).collect()
    }

    /// Forget everything, as when a document is closed or loaded.
    pub fn clear(&mut self) {
        info!(entries = self.entries.len(), "history cleared");
        self.entries.clear();
        self.cursor = 0;
        self.open.clear();
        self.corrupted = None;
    }
}
