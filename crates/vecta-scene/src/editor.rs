use tracing::{info, warn};
use vecta_core::EditorConfig;

use crate::animator::Animator;
use crate::command::{Command, Outcome};
use crate::document::Document;
use crate::error::SceneResult;
use crate::history::{HistoryManager, MacroToken};
use crate::owner::{OwnerKind, PropertyOwner};

/// One open document with its history. Every mutation goes through here.
pub struct Editor {
    config: EditorConfig,
    document: Document,
    history: HistoryManager,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let document = Document::new(&config);
        Self::with_document(config, document)
    }

    pub fn with_document(config: EditorConfig, document: Document) -> Self {
        let history = HistoryManager::new(&config.history);
        Self {
            config,
            document,
            history,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// The scene clock; changing frames is not recorded.
    pub fn animator_mut(&mut self) -> &mut Animator {
        self.document.animator_mut()
    }

    /// Build a detached owner with a fresh id, ready for an [`AddOwners`](crate::command::AddOwners).
    /// Allocating ids is not an undoable change.
    pub fn create_owner(&mut self, kind: OwnerKind) -> PropertyOwner {
        self.document.create_owner(kind)
    }

    pub fn push(&mut self, command: impl Command + 'static) -> SceneResult<Outcome> {
        self.history.push(&mut self.document, command)
    }

    pub fn undo(&mut self) -> SceneResult<()> {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> SceneResult<()> {
        self.history.redo(&mut self.document)
    }

    /// Open a macro that closes when the returned scope is finished or dropped.
    pub fn begin_macro(&mut self, label: impl Into<String>) -> SceneResult<MacroScope<'_>> {
        let token = self.history.begin_macro(label)?;
        Ok(MacroScope {
            editor: self,
            token: Some(token),
        })
    }

    /// Replace the document, discarding all history.
    pub fn load(&mut self, document: Document) {
        info!(document = %document.id(), owners = document.len(), "document loaded");
        self.document = document;
        self.history.clear();
    }

    /// Start over with an empty document.
    pub fn close(&mut self) {
        let document = Document::new(&self.config);
        self.load(document);
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

/// An open macro. Commands pushed through it become one undo step.
pub struct MacroScope<'a> {
    editor: &'a mut Editor,
    token: Option<MacroToken>,
}

impl MacroScope<'_> {
    pub fn push(&mut self, command: impl Command + 'static) -> SceneResult<Outcome> {
        self.editor.push(command)
    }

    pub fn document(&self) -> &Document {
        self.editor.document()
    }

    /// Open a scope nested in this one.
    pub fn begin_macro(&mut self, label: impl Into<String>) -> SceneResult<MacroScope<'_>> {
        self.editor.begin_macro(label)
    }

    /// Close the macro, reporting whether it was recorded.
    pub fn finish(mut self) -> SceneResult<Outcome> {
        match self.token.take() {
            Some(token) => self.editor.history.end_macro(token),
            None => Ok(Outcome::NoOp),
        }
    }
}

impl Drop for MacroScope<'_> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            if let Err(err) = self.editor.history.end_macro(token) {
                warn!(error = %err, "failed to close macro");
            }
        }
    }
}
