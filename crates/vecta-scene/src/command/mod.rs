//! Reversible scene mutations.
//!
//! A command is applied once when pushed, then reverted and re-applied any
//! number of times by the history. `apply` either changes the document and
//! reports [`Outcome::Changed`], reports [`Outcome::NoOp`] having changed
//! nothing, or fails having changed nothing.

mod checkpoint;
mod points;
mod property;
mod selection;
mod track;
mod tree;

pub use points::{PointsCommand, PointsEdit};
pub use property::SetProperty;
pub use selection::SetSelection;
pub use track::{CreateKeyframe, CreateTrack, MoveKeyframes, RemoveKeyframe, RemoveTrack, SetInterpolation};
pub use tree::{AddOwners, Convert, CopyObjects, NewOwner, RemoveOwners, Reparent};

use crate::document::Document;
use crate::error::{SceneError, SceneResult};

/// Whether applying a command changed the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    NoOp,
}

impl Outcome {
    pub fn changed(self) -> bool {
        self == Outcome::Changed
    }
}

/// An atomic, reversible description of one mutation.
pub trait Command: Send {
    /// Single-line description for the history view.
    fn label(&self) -> String;

    /// Perform the mutation, capturing whatever `revert` needs.
    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome>;

    /// Restore the exact state from before the last `apply`.
    fn revert(&mut self, doc: &mut Document) -> SceneResult<()>;
}

/// Several commands acting as one undo step.
pub struct Macro {
    label: String,
    commands: Vec<Box<dyn Command>>,
}

impl Macro {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
        }
    }

    /// Add a sub-command that has not been applied yet.
    pub fn with(mut self, command: impl Command + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    /// Record a sub-command that has already been applied.
    pub(crate) fn record(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.label()).collect()
    }
}

impl Command for Macro {
    fn label(&self) -> String {
        self.label.clone()
    }

    /// Applies sub-commands in order and keeps only those that changed
    /// something. On failure the ones already applied are rolled back.
    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        let pending = std::mem::take(&mut self.commands);
        let mut applied: Vec<Box<dyn Command>> = Vec::with_capacity(pending.len());
        for mut command in pending {
            match command.apply(doc) {
                Ok(Outcome::Changed) => applied.push(command),
                Ok(Outcome::NoOp) => {}
                Err(err) => {
                    for done in applied.iter_mut().rev() {
                        done.revert(doc).map_err(|e| SceneError::HistoryCorruption {
                            label: done.label(),
                            reason: e.to_string(),
                        })?;
                    }
                    self.commands = applied;
                    return Err(err);
                }
            }
        }
        let outcome = if applied.is_empty() {
            Outcome::NoOp
        } else {
            Outcome::Changed
        };
        self.commands = applied;
        Ok(outcome)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        for command in self.commands.iter_mut().rev() {
            command.revert(doc)?;
        }
        Ok(())
    }
}
