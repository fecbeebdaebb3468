//! The stable export/import form of a document, for the serialization layer.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use vecta_core::{ContentHash, EditorConfig, VectaResult};

use crate::animator::Animator;
use crate::document::Document;
use crate::error::{SceneError, SceneResult};
use crate::owner::{OwnerId, PropertyOwner};
use crate::validate::validate_document;

/// Every owner with kind, id, parent link, properties (with tracks) and
/// path knots, plus the document-level lists. History is not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: Uuid,
    pub root: OwnerId,
    #[serde(default)]
    pub styles: Vec<OwnerId>,
    #[serde(default)]
    pub tools: Vec<OwnerId>,
    #[serde(default)]
    pub selection: Vec<OwnerId>,
    pub animator: Animator,
    pub owners: Vec<PropertyOwner>,
}

impl DocumentSnapshot {
    pub fn to_json(&self) -> VectaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> VectaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The undoable part of a document, in a canonical order.
#[derive(Serialize)]
struct Canonical<'a> {
    root: OwnerId,
    styles: &'a [OwnerId],
    tools: &'a [OwnerId],
    selection: Vec<OwnerId>,
    owners: Vec<&'a PropertyOwner>,
}

impl Document {
    pub fn snapshot(&self) -> DocumentSnapshot {
        let mut order = self.ordered_ids();
        let listed: std::collections::BTreeSet<OwnerId> = order.iter().copied().collect();
        order.extend(self.owners.keys().copied().filter(|id| !listed.contains(id)));
        DocumentSnapshot {
            id: self.id(),
            root: self.root,
            styles: self.styles.clone(),
            tools: self.tools.clone(),
            selection: self.selection.iter().copied().collect(),
            animator: self.animator().clone(),
            owners: order
                .iter()
                .filter_map(|id| self.owners.get(id).cloned())
                .collect(),
        }
    }

    /// Rebuild a document and check its structure. Fails with every problem found.
    pub fn from_snapshot(snapshot: DocumentSnapshot, config: &EditorConfig) -> Result<Self, Vec<SceneError>> {
        let mut doc = Document::empty(snapshot.id, config);
        for owner in snapshot.owners {
            let id = owner.id;
            doc.reserve_ids_above(id);
            if doc.owners.insert(id, owner).is_some() {
                return Err(vec![SceneError::Validation(format!("duplicate owner {}", id))]);
            }
        }
        doc.root = snapshot.root;
        doc.styles = snapshot.styles;
        doc.tools = snapshot.tools;
        doc.selection = snapshot.selection.into_iter().collect();
        doc.set_animator(snapshot.animator);
        validate_document(&doc)?;
        info!(document = %doc.id(), owners = doc.len(), "document restored from snapshot");
        Ok(doc)
    }

    /// Hash of every undoable piece of state. Equal fingerprints mean
    /// field-for-field equal documents.
    pub fn fingerprint(&self) -> SceneResult<ContentHash> {
        let canonical = Canonical {
            root: self.root,
            styles: &self.styles,
            tools: &self.tools,
            selection: self.selection.iter().copied().collect(),
            owners: self.owners.values().collect(),
        };
        ContentHash::of_json(&canonical).map_err(|e| SceneError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{AddOwners, Command, SetProperty};
    use crate::document::Slot;
    use crate::owner::ObjectType;
    use crate::value::Value;

    #[test]
    fn test_snapshot_json_restores_document() {
        let config = EditorConfig::default();
        let mut doc = Document::new(&config);
        let root = doc.root();
        let e = doc
            .create_object(ObjectType::Ellipse)
            .with_value("radius", Value::Float(42.0))
            .unwrap();
        let e_id = e.id();
        AddOwners::single(e, Slot::Child { parent: root, index: 0 })
            .apply(&mut doc)
            .unwrap();

        let json = doc.snapshot().to_json().unwrap();
        let restored = Document::from_snapshot(DocumentSnapshot::from_json(&json).unwrap(), &config).unwrap();
        assert_eq!(restored.fingerprint().unwrap(), doc.fingerprint().unwrap());
        assert_eq!(restored.value(e_id, "radius").unwrap(), Value::Float(42.0));
        assert_eq!(restored.id(), doc.id());
    }

    #[test]
    fn test_restored_document_allocates_fresh_ids() {
        let config = EditorConfig::default();
        let doc = Document::new(&config);
        let mut restored = Document::from_snapshot(doc.snapshot(), &config).unwrap();
        let fresh = restored.create_style();
        assert!(!doc.contains(fresh.id()));
    }

    #[test]
    fn test_fingerprint_tracks_changes() {
        let mut doc = Document::new(&EditorConfig::default());
        let before = doc.fingerprint().unwrap();
        let root = doc.root();
        let mut cmd = SetProperty::new(root, "rotation", Value::Float(3.0));
        cmd.apply(&mut doc).unwrap();
        assert_ne!(doc.fingerprint().unwrap(), before);
        cmd.revert(&mut doc).unwrap();
        assert_eq!(doc.fingerprint().unwrap(), before);
    }

    #[test]
    fn test_broken_snapshot_is_rejected() {
        let config = EditorConfig::default();
        let doc = Document::new(&config);
        let mut snapshot = doc.snapshot();
        snapshot.root = OwnerId(999);
        assert!(Document::from_snapshot(snapshot, &config).is_err());
    }
}
