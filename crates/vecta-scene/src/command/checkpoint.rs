use std::collections::{BTreeMap, BTreeSet};

use crate::document::Document;
use crate::error::SceneResult;
use crate::owner::{OwnerId, PropertyOwner};

/// Copies of every owner a structural edit touches, plus the document-level lists.
///
/// `None` records that the owner did not exist at capture time.
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    owners: BTreeMap<OwnerId, Option<PropertyOwner>>,
    styles: Vec<OwnerId>,
    tools: Vec<OwnerId>,
    selection: BTreeSet<OwnerId>,
}

impl Checkpoint {
    pub(crate) fn capture(doc: &Document, ids: &BTreeSet<OwnerId>) -> Self {
        Self {
            owners: ids.iter().map(|id| (*id, doc.owners.get(id).cloned())).collect(),
            styles: doc.styles.clone(),
            tools: doc.tools.clone(),
            selection: doc.selection.clone(),
        }
    }

    pub(crate) fn restore(&self, doc: &mut Document) {
        for (id, owner) in &self.owners {
            match owner {
                Some(owner) => {
                    doc.owners.insert(*id, owner.clone());
                }
                None => {
                    doc.owners.remove(id);
                }
            }
        }
        doc.styles = self.styles.clone();
        doc.tools = self.tools.clone();
        doc.selection = self.selection.clone();
    }
}

/// Before and after states of a structural edit. Redo restores the after
/// state so ids allocated on the first run stay stable.
#[derive(Debug, Clone)]
pub(crate) struct Transition {
    before: Checkpoint,
    after: Checkpoint,
}

impl Transition {
    /// Run `edit` over the owners in `touched`. If it fails the document is
    /// put back as it was.
    pub(crate) fn record(
        doc: &mut Document,
        touched: &BTreeSet<OwnerId>,
        edit: impl FnOnce(&mut Document) -> SceneResult<()>,
    ) -> SceneResult<Self> {
        let before = Checkpoint::capture(doc, touched);
        if let Err(err) = edit(doc) {
            before.restore(doc);
            return Err(err);
        }
        let after = Checkpoint::capture(doc, touched);
        Ok(Self { before, after })
    }

    pub(crate) fn redo(&self, doc: &mut Document) {
        self.after.restore(doc);
    }

    pub(crate) fn undo(&self, doc: &mut Document) {
        self.before.restore(doc);
    }
}
