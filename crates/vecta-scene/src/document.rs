use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;
use vecta_core::{EditorConfig, PathConfig};

use crate::animator::Animator;
use crate::error::{SceneError, SceneResult};
use crate::owner::{ObjectType, OwnerId, OwnerKind, PropertyOwner, ToolType};
use crate::path::PathGeometry;
use crate::property::Property;
use crate::value::Value;

/// Where an owner is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Object child of another object.
    Child { parent: OwnerId, index: usize },
    /// Tag on an object.
    Tag { object: OwnerId, index: usize },
    Style { index: usize },
    Tool { index: usize },
}

/// The arena of all property owners of one open document.
///
/// Ownership edges (children, tags) are id lists; references between owners
/// are ids stored in reference properties. Mutating methods are crate-private:
/// outside this crate the document changes only through commands.
#[derive(Debug, Clone)]
pub struct Document {
    id: Uuid,
    pub(crate) owners: BTreeMap<OwnerId, PropertyOwner>,
    pub(crate) root: OwnerId,
    pub(crate) styles: Vec<OwnerId>,
    pub(crate) tools: Vec<OwnerId>,
    pub(crate) selection: BTreeSet<OwnerId>,
    animator: Animator,
    next_id: u64,
    path_config: PathConfig,
}

impl Document {
    /// A document holding an empty root object and the default tools.
    pub fn new(config: &EditorConfig) -> Self {
        let mut doc = Self::empty(Uuid::new_v4(), config);
        let root = doc.create_object(ObjectType::Empty).with_name("root");
        doc.root = root.id;
        doc.owners.insert(root.id, root);
        let tool = doc.create_tool(ToolType::Select);
        doc.tools.push(tool.id);
        doc.owners.insert(tool.id, tool);
        doc
    }

    pub(crate) fn empty(id: Uuid, config: &EditorConfig) -> Self {
        Self {
            id,
            owners: BTreeMap::new(),
            root: OwnerId(0),
            styles: Vec::new(),
            tools: Vec::new(),
            selection: BTreeSet::new(),
            animator: Animator::new(&config.animation),
            next_id: 1,
            path_config: config.paths.clone(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root(&self) -> OwnerId {
        self.root
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// The scene clock is not part of the undoable state.
    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    pub(crate) fn set_animator(&mut self, animator: Animator) {
        self.animator = animator;
    }

    pub fn path_config(&self) -> &PathConfig {
        &self.path_config
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn contains(&self, id: OwnerId) -> bool {
        self.owners.contains_key(&id)
    }

    pub fn owner(&self, id: OwnerId) -> SceneResult<&PropertyOwner> {
        self.owners.get(&id).ok_or(SceneError::UnknownOwner(id))
    }

    pub(crate) fn owner_mut(&mut self, id: OwnerId) -> SceneResult<&mut PropertyOwner> {
        self.owners.get_mut(&id).ok_or(SceneError::UnknownOwner(id))
    }

    pub fn owners(&self) -> impl Iterator<Item = &PropertyOwner> {
        self.owners.values()
    }

    pub fn styles(&self) -> &[OwnerId] {
        &self.styles
    }

    pub fn tools(&self) -> &[OwnerId] {
        &self.tools
    }

    pub fn selection(&self) -> &BTreeSet<OwnerId> {
        &self.selection
    }

    pub fn property(&self, owner: OwnerId, name: &str) -> SceneResult<&Property> {
        self.owner(owner)?
            .property(name)
            .ok_or_else(|| SceneError::UnknownProperty {
                owner,
                property: name.to_string(),
            })
    }

    pub(crate) fn property_mut(&mut self, owner: OwnerId, name: &str) -> SceneResult<&mut Property> {
        self.owner_mut(owner)?
            .property_mut(name)
            .ok_or_else(|| SceneError::UnknownProperty {
                owner,
                property: name.to_string(),
            })
    }

    /// Effective value at the animator's current frame.
    pub fn value(&self, owner: OwnerId, name: &str) -> SceneResult<Value> {
        self.value_at(owner, name, self.animator.current())
    }

    /// Effective value at an arbitrary frame. Pure read, safe to call from a renderer
    /// between commands.
    pub fn value_at(&self, owner: OwnerId, name: &str, frame: i32) -> SceneResult<Value> {
        Ok(self.property(owner, name)?.value_at(Some(frame)))
    }

    pub fn geometry(&self, owner: OwnerId) -> SceneResult<&PathGeometry> {
        self.owner(owner)?
            .geometry()
            .ok_or(SceneError::NotAPath(owner))
    }

    pub(crate) fn geometry_mut(&mut self, owner: OwnerId) -> SceneResult<&mut PathGeometry> {
        self.owner_mut(owner)?
            .geometry
            .as_mut()
            .ok_or(SceneError::NotAPath(owner))
    }

    pub(crate) fn allocate_id(&mut self) -> OwnerId {
        let id = OwnerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn reserve_ids_above(&mut self, id: OwnerId) {
        self.next_id = self.next_id.max(id.0 + 1);
    }

    /// `id`, its tags and all descendant objects with their tags, in tree order.
    pub fn subtree(&self, id: OwnerId) -> Vec<OwnerId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        let mut seen = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            if let Some(owner) = self.owners.get(&current) {
                out.extend(owner.tags.iter().copied().filter(|t| seen.insert(*t)));
                stack.extend(owner.children.iter().rev().copied());
            }
        }
        out
    }

    /// Every owner in a deterministic order: the object tree, then styles, then tools.
    pub fn ordered_ids(&self) -> Vec<OwnerId> {
        let mut out = self.subtree(self.root);
        out.extend(self.styles.iter().copied());
        out.extend(self.tools.iter().copied());
        out
    }

    /// Whether `id` is `ancestor` or lies beneath it in the ownership tree.
    pub fn is_within(&self, id: OwnerId, ancestor: OwnerId) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.owners.len() {
                return false;
            }
            current = self.owners.get(&c).and_then(|o| o.parent);
        }
        false
    }

    /// First owner, in [`Document::ordered_ids`] order, whose `name` matches.
    pub fn find_by_name(&self, name: &str) -> Option<OwnerId> {
        self.ordered_ids()
            .into_iter()
            .find(|id| self.owners.get(id).and_then(|o| o.name()) == Some(name))
    }

    pub fn slot_of(&self, id: OwnerId) -> Option<Slot> {
        let owner = self.owners.get(&id)?;
        match owner.kind {
            OwnerKind::Object(_) => {
                let parent = owner.parent?;
                let index = self.owners.get(&parent)?.children.iter().position(|c| *c == id)?;
                Some(Slot::Child { parent, index })
            }
            OwnerKind::Tag(_) => {
                let object = owner.parent?;
                let index = self.owners.get(&object)?.tags.iter().position(|t| *t == id)?;
                Some(Slot::Tag { object, index })
            }
            OwnerKind::Style => self
                .styles
                .iter()
                .position(|s| *s == id)
                .map(|index| Slot::Style { index }),
            OwnerKind::Tool(_) => self
                .tools
                .iter()
                .position(|t| *t == id)
                .map(|index| Slot::Tool { index }),
        }
    }

    /// Unlink `id` from its slot, leaving it in the arena.
    pub(crate) fn detach(&mut self, id: OwnerId) -> SceneResult<Slot> {
        let slot = self.slot_of(id).ok_or_else(|| SceneError::InvalidParent {
            owner: id,
            reason: "owner is not attached".into(),
        })?;
        match slot {
            Slot::Child { parent, index } => {
                self.owner_mut(parent)?.children.remove(index);
            }
            Slot::Tag { object, index } => {
                self.owner_mut(object)?.tags.remove(index);
            }
            Slot::Style { index } => {
                self.styles.remove(index);
            }
            Slot::Tool { index } => {
                self.tools.remove(index);
            }
        }
        if let Some(owner) = self.owners.get_mut(&id) {
            owner.parent = None;
        }
        Ok(slot)
    }

    /// Check that `id` could be attached at `slot`; indices past the end append.
    pub(crate) fn check_attach(&self, id: OwnerId, slot: Slot) -> SceneResult<()> {
        let owner = self.owner(id)?;
        let invalid = |reason: &str| SceneError::InvalidParent {
            owner: id,
            reason: reason.to_string(),
        };
        match slot {
            Slot::Child { parent, .. } => {
                if !owner.kind.is_object() {
                    return Err(invalid("only objects can be children"));
                }
                if !self.owner(parent)?.kind.is_object() {
                    return Err(invalid("parent is not an object"));
                }
                if self.is_within(parent, id) {
                    return Err(SceneError::CyclicParent(id));
                }
            }
            Slot::Tag { object, .. } => {
                if !owner.kind.is_tag() {
                    return Err(invalid("only tags can be attached as tags"));
                }
                if !self.owner(object)?.kind.is_object() {
                    return Err(invalid("tags must sit on an object"));
                }
            }
            Slot::Style { .. } if owner.kind != OwnerKind::Style => {
                return Err(invalid("not a style"));
            }
            Slot::Tool { .. } if !matches!(owner.kind, OwnerKind::Tool(_)) => {
                return Err(invalid("not a tool"));
            }
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn attach(&mut self, id: OwnerId, slot: Slot) -> SceneResult<()> {
        self.check_attach(id, slot)?;
        let parent = match slot {
            Slot::Child { parent, index } => {
                let list = &mut self.owner_mut(parent)?.children;
                list.insert(index.min(list.len()), id);
                Some(parent)
            }
            Slot::Tag { object, index } => {
                let list = &mut self.owner_mut(object)?.tags;
                list.insert(index.min(list.len()), id);
                Some(object)
            }
            Slot::Style { index } => {
                self.styles.insert(index.min(self.styles.len()), id);
                None
            }
            Slot::Tool { index } => {
                self.tools.insert(index.min(self.tools.len()), id);
                None
            }
        };
        self.owner_mut(id)?.parent = parent;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(&EditorConfig::default())
    }

    fn add_object(doc: &mut Document, parent: OwnerId, t: ObjectType) -> OwnerId {
        let owner = doc.create_object(t);
        let id = owner.id;
        doc.owners.insert(id, owner);
        doc.attach(id, Slot::Child { parent, index: usize::MAX }).unwrap();
        id
    }

    #[test]
    fn test_new_document_has_root_and_tool() {
        let doc = doc();
        assert!(doc.contains(doc.root()));
        assert_eq!(doc.tools().len(), 1);
        assert_eq!(doc.owner(doc.root()).unwrap().name(), Some("root"));
    }

    #[test]
    fn test_subtree_order_includes_tags() {
        let mut doc = doc();
        let root = doc.root();
        let a = add_object(&mut doc, root, ObjectType::Empty);
        let b = add_object(&mut doc, a, ObjectType::Ellipse);
        let tag = doc.create_tag(crate::owner::TagType::Style);
        let tag_id = tag.id;
        doc.owners.insert(tag_id, tag);
        doc.attach(tag_id, Slot::Tag { object: a, index: 0 }).unwrap();
        assert_eq!(doc.subtree(a), vec![a, tag_id, b]);
    }

    #[test]
    fn test_attach_rejects_cycle() {
        let mut doc = doc();
        let root = doc.root();
        let a = add_object(&mut doc, root, ObjectType::Empty);
        let b = add_object(&mut doc, a, ObjectType::Empty);
        doc.detach(a).unwrap();
        let err = doc.attach(a, Slot::Child { parent: b, index: 0 }).unwrap_err();
        assert_eq!(err, SceneError::CyclicParent(a));
    }

    #[test]
    fn test_detach_and_reattach_keeps_index() {
        let mut doc = doc();
        let root = doc.root();
        let a = add_object(&mut doc, root, ObjectType::Empty);
        let b = add_object(&mut doc, root, ObjectType::Empty);
        let slot = doc.detach(a).unwrap();
        assert_eq!(slot, Slot::Child { parent: root, index: 0 });
        doc.attach(a, slot).unwrap();
        assert_eq!(doc.owner(root).unwrap().children(), &[a, b]);
    }

    #[test]
    fn test_find_by_name() {
        let mut doc = doc();
        let root = doc.root();
        let a = add_object(&mut doc, root, ObjectType::Ellipse);
        assert_eq!(doc.find_by_name("Ellipse"), Some(a));
        assert_eq!(doc.find_by_name("nope"), None);
    }
}
