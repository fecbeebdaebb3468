use std::collections::BTreeSet;

use crate::document::Document;
use crate::error::{SceneError, SceneResult};
use crate::owner::OwnerId;

use super::{Command, Outcome};

/// Replace the set of selected owners.
pub struct SetSelection {
    selection: BTreeSet<OwnerId>,
    previous: BTreeSet<OwnerId>,
}

impl SetSelection {
    pub fn new(selection: impl IntoIterator<Item = OwnerId>) -> Self {
        Self {
            selection: selection.into_iter().collect(),
            previous: BTreeSet::new(),
        }
    }

    pub fn clear() -> Self {
        Self::new(Vec::new())
    }
}

impl Command for SetSelection {
    fn label(&self) -> String {
        "Select".to_string()
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        if let Some(missing) = self.selection.iter().find(|id| !doc.contains(**id)) {
            return Err(SceneError::UnknownOwner(*missing));
        }
        if doc.selection == self.selection {
            return Ok(Outcome::NoOp);
        }
        self.previous = std::mem::replace(&mut doc.selection, self.selection.clone());
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        doc.selection = self.previous.clone();
        Ok(())
    }
}
