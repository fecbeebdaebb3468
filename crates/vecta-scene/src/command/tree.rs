use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use vecta_core::Point2D;

use crate::document::{Document, Slot};
use crate::error::{SceneError, SceneResult};
use crate::owner::{ObjectType, OwnerId, OwnerKind, PropertyOwner};
use crate::path::{Knot, PathGeometry};
use crate::track::PropertyPath;
use crate::value::Value;

use super::checkpoint::Transition;
use super::{Command, Outcome};

/// Keep ids that exist and are not beneath another id of the list.
fn top_level(doc: &Document, ids: &[OwnerId]) -> Vec<OwnerId> {
    let mut seen = BTreeSet::new();
    let unique: Vec<OwnerId> = ids
        .iter()
        .copied()
        .filter(|id| doc.contains(*id) && seen.insert(*id))
        .collect();
    unique
        .iter()
        .copied()
        .filter(|id| !unique.iter().any(|other| other != id && doc.is_within(*id, *other)))
        .collect()
}

fn host_of(slot: Slot) -> Option<OwnerId> {
    match slot {
        Slot::Child { parent, .. } => Some(parent),
        Slot::Tag { object, .. } => Some(object),
        Slot::Style { .. } | Slot::Tool { .. } => None,
    }
}

/// An owner built with [`Document::create_owner`] and where to attach it.
#[derive(Debug, Clone)]
pub struct NewOwner {
    pub owner: PropertyOwner,
    pub slot: Slot,
}

impl NewOwner {
    pub fn new(owner: PropertyOwner, slot: Slot) -> Self {
        Self { owner, slot }
    }
}

/// Insert freshly built owners. Items attach in order, so a later item may
/// sit on an earlier one.
pub struct AddOwners {
    items: Vec<NewOwner>,
    transition: Option<Transition>,
}

impl AddOwners {
    pub fn new(items: Vec<NewOwner>) -> Self {
        Self {
            items,
            transition: None,
        }
    }

    pub fn single(owner: PropertyOwner, slot: Slot) -> Self {
        Self::new(vec![NewOwner::new(owner, slot)])
    }

    pub fn ids(&self) -> Vec<OwnerId> {
        self.items.iter().map(|i| i.owner.id).collect()
    }
}

impl Command for AddOwners {
    fn label(&self) -> String {
        match self.items.as_slice() {
            [item] => format!("Add {}", item.owner.kind),
            items => format!("Add {} owners", items.len()),
        }
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        if let Some(transition) = &self.transition {
            transition.redo(doc);
            return Ok(Outcome::Changed);
        }
        if self.items.is_empty() {
            return Ok(Outcome::NoOp);
        }
        if let Some(item) = self.items.iter().find(|i| doc.contains(i.owner.id)) {
            return Err(SceneError::Validation(format!(
                "owner {} already exists",
                item.owner.id
            )));
        }
        let mut touched: BTreeSet<OwnerId> = self.items.iter().map(|i| i.owner.id).collect();
        touched.extend(self.items.iter().filter_map(|i| host_of(i.slot)));

        let items = &self.items;
        let transition = Transition::record(doc, &touched, |doc| {
            for item in items {
                let mut owner = item.owner.clone();
                owner.parent = None;
                owner.children.clear();
                owner.tags.clear();
                let id = owner.id;
                doc.reserve_ids_above(id);
                doc.owners.insert(id, owner);
                doc.attach(id, item.slot)?;
            }
            for item in items {
                for p in item.owner.properties() {
                    if let Value::Reference(Some(target)) = p.value() {
                        if !doc.contains(*target) {
                            return Err(SceneError::InvalidReference {
                                property: p.name().to_string(),
                                target: *target,
                            });
                        }
                    }
                }
            }
            Ok(())
        })?;
        self.transition = Some(transition);
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        if let Some(transition) = &self.transition {
            transition.undo(doc);
        }
        Ok(())
    }
}

/// Remove owners with everything beneath them.
///
/// Owners outside the removed set that reference into it block the removal
/// with [`SceneError::DanglingReference`] unless the command is
/// [`confirmed`](RemoveOwners::confirmed); confirmed removal clears those
/// references in the same step.
pub struct RemoveOwners {
    roots: Vec<OwnerId>,
    confirmed: bool,
    label: String,
    transition: Option<Transition>,
}

impl RemoveOwners {
    pub fn new(roots: Vec<OwnerId>) -> Self {
        Self {
            roots,
            confirmed: false,
            label: "Remove".to_string(),
            transition: None,
        }
    }

    pub fn confirmed(mut self) -> Self {
        self.confirmed = true;
        self
    }

    /// Remove every style nothing refers to.
    pub fn unused_styles(doc: &Document) -> Self {
        Self {
            roots: doc.unused_styles(),
            confirmed: false,
            label: "Remove unused styles".to_string(),
            transition: None,
        }
    }
}

impl Command for RemoveOwners {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        if let Some(transition) = &self.transition {
            transition.redo(doc);
            return Ok(Outcome::Changed);
        }
        if let Some(missing) = self.roots.iter().find(|id| !doc.contains(**id)) {
            return Err(SceneError::UnknownOwner(*missing));
        }
        if self.roots.contains(&doc.root()) {
            return Err(SceneError::InvalidParent {
                owner: doc.root(),
                reason: "the root object cannot be removed".into(),
            });
        }
        let top = top_level(doc, &self.roots);
        if top.is_empty() {
            return Ok(Outcome::NoOp);
        }
        let closure = doc.removal_closure(&top);
        let holders = doc.find_reference_holders(&closure);
        let holder_owners: BTreeSet<OwnerId> = holders.iter().map(|h| h.owner).collect();
        if !holder_owners.is_empty() && !self.confirmed {
            return Err(SceneError::DanglingReference {
                count: holder_owners.len(),
            });
        }

        let mut touched = closure.clone();
        touched.extend(holder_owners);
        touched.extend(top.iter().filter_map(|id| doc.owners.get(id).and_then(|o| o.parent)));

        let transition = Transition::record(doc, &touched, |doc| {
            for h in &holders {
                doc.property_mut(h.owner, &h.property)?
                    .restore(Value::Reference(None));
            }
            for id in &top {
                doc.detach(*id)?;
            }
            for id in &closure {
                doc.owners.remove(id);
            }
            doc.selection.retain(|s| !closure.contains(s));
            Ok(())
        })?;
        self.transition = Some(transition);
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        if let Some(transition) = &self.transition {
            transition.undo(doc);
        }
        Ok(())
    }
}

/// Move objects or tags to new slots. Moves happen in order; indices refer
/// to the lists as they are at the time of each move.
pub struct Reparent {
    moves: Vec<(OwnerId, Slot)>,
    previous: Vec<(OwnerId, Slot)>,
}

impl Reparent {
    pub fn new(moves: Vec<(OwnerId, Slot)>) -> Self {
        Self {
            moves,
            previous: Vec::new(),
        }
    }

    pub fn to(owner: OwnerId, slot: Slot) -> Self {
        Self::new(vec![(owner, slot)])
    }

    fn unwind(doc: &mut Document, done: &[(OwnerId, Slot)]) -> SceneResult<()> {
        for (id, old) in done.iter().rev() {
            doc.detach(*id)?;
            doc.attach(*id, *old)?;
        }
        Ok(())
    }
}

impl Command for Reparent {
    fn label(&self) -> String {
        "Reparent".to_string()
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        let mut done: Vec<(OwnerId, Slot)> = Vec::with_capacity(self.moves.len());
        for (id, slot) in &self.moves {
            let step = doc.slot_of(*id).ok_or_else(|| SceneError::InvalidParent {
                owner: *id,
                reason: "owner is not attached".into(),
            });
            let step = step.and_then(|old| {
                doc.detach(*id)?;
                if let Err(err) = doc.attach(*id, *slot) {
                    doc.attach(*id, old)?;
                    return Err(err);
                }
                Ok(old)
            });
            match step {
                Ok(old) => done.push((*id, old)),
                Err(err) => {
                    Self::unwind(doc, &done)?;
                    return Err(err);
                }
            }
        }
        if done.iter().all(|(id, old)| doc.slot_of(*id) == Some(*old)) {
            return Ok(Outcome::NoOp);
        }
        self.previous = done;
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        Self::unwind(doc, &self.previous)
    }
}

/// Deep-copy object subtrees under `parent`. Copies get fresh ids; references
/// between copied owners point at the copies.
pub struct CopyObjects {
    sources: Vec<OwnerId>,
    parent: OwnerId,
    index: usize,
    copies: Vec<OwnerId>,
    transition: Option<Transition>,
}

impl CopyObjects {
    pub fn new(sources: Vec<OwnerId>, parent: OwnerId, index: usize) -> Self {
        Self {
            sources,
            parent,
            index,
            copies: Vec::new(),
            transition: None,
        }
    }

    /// Ids of the top-level copies, once applied.
    pub fn copies(&self) -> &[OwnerId] {
        &self.copies
    }
}

fn remap_owner(owner: &PropertyOwner, ids: &BTreeMap<OwnerId, OwnerId>) -> PropertyOwner {
    let map = |id: &OwnerId| ids.get(id).copied().unwrap_or(*id);
    let mut copy = owner.clone();
    copy.id = map(&owner.id);
    copy.parent = owner.parent.and_then(|p| ids.get(&p).copied());
    copy.children = owner.children.iter().map(map).collect();
    copy.tags = owner.tags.iter().map(map).collect();
    let new_id = copy.id;
    for p in copy.properties.iter_mut() {
        if let Some(target) = p.value().as_reference() {
            p.restore(Value::Reference(Some(map(&target))));
        }
        let path = PropertyPath::new(new_id, p.name());
        if let Some(track) = p.track_mut() {
            track.retarget(path);
        }
    }
    copy
}

impl Command for CopyObjects {
    fn label(&self) -> String {
        "Copy".to_string()
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        if let Some(transition) = &self.transition {
            transition.redo(doc);
            return Ok(Outcome::Changed);
        }
        if !doc.owner(self.parent)?.kind().is_object() {
            return Err(SceneError::InvalidParent {
                owner: self.parent,
                reason: "copies must go under an object".into(),
            });
        }
        if let Some(bad) = self
            .sources
            .iter()
            .find(|id| doc.owners.get(*id).map(|o| !o.kind().is_object()).unwrap_or(true))
        {
            return Err(SceneError::InvalidParent {
                owner: *bad,
                reason: "only existing objects can be copied".into(),
            });
        }
        let top = top_level(doc, &self.sources);
        if top.is_empty() {
            return Ok(Outcome::NoOp);
        }

        let mut ids = BTreeMap::new();
        for root in &top {
            for id in doc.subtree(*root) {
                let fresh = doc.allocate_id();
                ids.insert(id, fresh);
            }
        }
        let copies: Vec<PropertyOwner> = ids
            .keys()
            .filter_map(|id| doc.owners.get(id))
            .map(|o| remap_owner(o, &ids))
            .collect();
        let top_copies: Vec<OwnerId> = top.iter().filter_map(|id| ids.get(id).copied()).collect();

        let mut touched: BTreeSet<OwnerId> = ids.values().copied().collect();
        touched.insert(self.parent);
        let (parent, index) = (self.parent, self.index);
        let transition = Transition::record(doc, &touched, |doc| {
            for copy in copies {
                doc.owners.insert(copy.id, copy);
            }
            for (offset, id) in top_copies.iter().enumerate() {
                doc.attach(
                    *id,
                    Slot::Child {
                        parent,
                        index: index.saturating_add(offset),
                    },
                )?;
            }
            Ok(())
        })?;
        self.copies = top_copies;
        self.transition = Some(transition);
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        if let Some(transition) = &self.transition {
            transition.undo(doc);
        }
        Ok(())
    }
}

/// Replace ellipses and rectangles by equivalent path objects.
///
/// Shared properties (with their tracks), children and tags move across and
/// references to the original point at the new path. Targets beneath another
/// target are left alone; targets that cannot be converted are skipped.
pub struct Convert {
    targets: Vec<OwnerId>,
    converted: Vec<(OwnerId, OwnerId)>,
    transition: Option<Transition>,
}

impl Convert {
    pub fn new(targets: Vec<OwnerId>) -> Self {
        Self {
            targets,
            converted: Vec::new(),
            transition: None,
        }
    }

    /// `(original, path)` pairs, once applied.
    pub fn converted(&self) -> &[(OwnerId, OwnerId)] {
        &self.converted
    }
}

fn ellipse_geometry(radius: f64, segments: i64) -> PathGeometry {
    let n = segments.max(3);
    let handle = 4.0 / 3.0 * (PI / (2.0 * n as f64)).tan() * radius;
    let knots = (0..n)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / n as f64;
            let (sin, cos) = theta.sin_cos();
            Knot::smooth(
                Point2D::new(radius * cos, radius * sin),
                Point2D::new(-sin, cos) * handle,
            )
        })
        .collect();
    PathGeometry::new(knots, true)
}

fn rectangle_geometry(size: Point2D) -> PathGeometry {
    let (w, h) = (size.x / 2.0, size.y / 2.0);
    PathGeometry::new(
        vec![
            Knot::linear(-w, -h),
            Knot::linear(w, -h),
            Knot::linear(w, h),
            Knot::linear(-w, h),
        ],
        true,
    )
}

fn converted_owner(doc: &Document, original: &PropertyOwner, id: OwnerId) -> SceneResult<PropertyOwner> {
    let frame = doc.animator().current();
    let geometry = match original.kind().object_type() {
        Some(ObjectType::Ellipse) => {
            let radius = doc.value_at(original.id, "radius", frame)?.as_float().unwrap_or(0.0);
            let segments = doc
                .value_at(original.id, "segments", frame)?
                .as_integer()
                .unwrap_or(4);
            ellipse_geometry(radius, segments)
        }
        Some(ObjectType::Rectangle) => {
            let size = doc.value_at(original.id, "size", frame)?.as_point().unwrap_or_default();
            rectangle_geometry(size)
        }
        _ => return Err(SceneError::Validation(format!("{} cannot be converted", original.id))),
    };
    let mut path = doc
        .build_owner(id, OwnerKind::Object(ObjectType::Path))
        .with_geometry(geometry);
    for p in path.properties.iter_mut() {
        if let Some(source) = original.property(p.name()) {
            if source.kind() == p.kind() {
                *p = source.clone();
                let target = PropertyPath::new(id, p.name());
                if let Some(track) = p.track_mut() {
                    track.retarget(target);
                }
            }
        }
    }
    Ok(path)
}

impl Command for Convert {
    fn label(&self) -> String {
        "Convert to path".to_string()
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        if let Some(transition) = &self.transition {
            transition.redo(doc);
            return Ok(Outcome::Changed);
        }
        let originals: Vec<OwnerId> = top_level(doc, &self.targets)
            .into_iter()
            .filter(|id| {
                doc.owners
                    .get(id)
                    .and_then(|o| o.kind().object_type())
                    .map(ObjectType::is_convertible)
                    .unwrap_or(false)
            })
            .collect();
        if originals.is_empty() {
            return Ok(Outcome::NoOp);
        }

        let mut pairs = Vec::with_capacity(originals.len());
        let mut touched = BTreeSet::new();
        for original in &originals {
            let owner = doc.owner(*original)?;
            touched.insert(*original);
            touched.extend(owner.parent);
            touched.extend(owner.children.iter().copied());
            touched.extend(owner.tags.iter().copied());
            touched.extend(
                doc.find_reference_holders(&BTreeSet::from([*original]))
                    .iter()
                    .map(|h| h.owner),
            );
        }
        for original in originals {
            let id = doc.allocate_id();
            let path = converted_owner(doc, doc.owner(original)?, id)?;
            touched.insert(id);
            pairs.push((original, path));
        }

        let converted: Vec<(OwnerId, OwnerId)> = pairs.iter().map(|(o, p)| (*o, p.id)).collect();
        let transition = Transition::record(doc, &touched, |doc| {
            for (original, mut path) in pairs {
                let slot = doc.detach(original)?;
                let source = doc.owner_mut(original)?;
                path.children = std::mem::take(&mut source.children);
                path.tags = std::mem::take(&mut source.tags);
                let new_id = path.id;
                for moved in path.children.iter().chain(path.tags.iter()) {
                    doc.owner_mut(*moved)?.parent = Some(new_id);
                }
                doc.owners.insert(new_id, path);
                doc.attach(new_id, slot)?;
                for h in doc.find_reference_holders(&BTreeSet::from([original])) {
                    doc.property_mut(h.owner, &h.property)?
                        .restore(Value::Reference(Some(new_id)));
                }
                if doc.selection.remove(&original) {
                    doc.selection.insert(new_id);
                }
                doc.owners.remove(&original);
            }
            Ok(())
        })?;
        self.converted = converted;
        self.transition = Some(transition);
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        if let Some(transition) = &self.transition {
            transition.undo(doc);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::TagType;
    use vecta_core::EditorConfig;

    fn add(doc: &mut Document, owner: PropertyOwner, slot: Slot) -> OwnerId {
        let mut cmd = AddOwners::single(owner, slot);
        cmd.apply(doc).unwrap();
        cmd.ids()[0]
    }

    fn child_of(parent: OwnerId) -> Slot {
        Slot::Child {
            parent,
            index: usize::MAX,
        }
    }

    #[test]
    fn test_add_and_revert() {
        let mut doc = Document::new(&EditorConfig::default());
        let root = doc.root();
        let e = doc.create_object(ObjectType::Ellipse);
        let mut cmd = AddOwners::single(e, child_of(root));
        assert_eq!(cmd.apply(&mut doc).unwrap(), Outcome::Changed);
        let id = cmd.ids()[0];
        assert_eq!(doc.owner(root).unwrap().children(), &[id]);
        cmd.revert(&mut doc).unwrap();
        assert!(!doc.contains(id));
        assert!(doc.owner(root).unwrap().children().is_empty());
        cmd.apply(&mut doc).unwrap();
        assert!(doc.contains(id));
    }

    #[test]
    fn test_reparent_into_descendant_fails() {
        let mut doc = Document::new(&EditorConfig::default());
        let root = doc.root();
        let a = doc.create_object(ObjectType::Empty);
        let a = add(&mut doc, a, child_of(root));
        let b = doc.create_object(ObjectType::Empty);
        let b = add(&mut doc, b, child_of(a));
        let mut cmd = Reparent::to(a, child_of(b));
        assert_eq!(cmd.apply(&mut doc).unwrap_err(), SceneError::CyclicParent(a));
        assert_eq!(doc.owner(root).unwrap().children(), &[a]);
        assert_eq!(doc.owner(a).unwrap().parent(), Some(root));
    }

    #[test]
    fn test_reparent_and_revert_restores_order() {
        let mut doc = Document::new(&EditorConfig::default());
        let root = doc.root();
        let a = doc.create_object(ObjectType::Empty);
        let a = add(&mut doc, a, child_of(root));
        let b = doc.create_object(ObjectType::Empty);
        let b = add(&mut doc, b, child_of(root));
        let c = doc.create_object(ObjectType::Empty);
        let c = add(&mut doc, c, child_of(root));
        let mut cmd = Reparent::new(vec![(c, child_of(a)), (a, child_of(b))]);
        cmd.apply(&mut doc).unwrap();
        assert_eq!(doc.owner(root).unwrap().children(), &[b]);
        cmd.revert(&mut doc).unwrap();
        assert_eq!(doc.owner(root).unwrap().children(), &[a, b, c]);
    }

    #[test]
    fn test_reparent_to_same_slot_is_noop() {
        let mut doc = Document::new(&EditorConfig::default());
        let root = doc.root();
        let a = doc.create_object(ObjectType::Empty);
        let a = add(&mut doc, a, child_of(root));
        let mut cmd = Reparent::to(a, Slot::Child { parent: root, index: 0 });
        assert_eq!(cmd.apply(&mut doc).unwrap(), Outcome::NoOp);
    }

    #[test]
    fn test_copy_remaps_internal_references() {
        let mut doc = Document::new(&EditorConfig::default());
        let root = doc.root();
        let group = doc.create_object(ObjectType::Empty);
        let group = add(&mut doc, group, child_of(root));
        let path = doc.create_object(ObjectType::Path);
        let path = add(&mut doc, path, child_of(group));
        let tag = doc
            .create_tag(TagType::Path)
            .with_value("path", Value::Reference(Some(path)))
            .unwrap();
        add(&mut doc, tag, Slot::Tag { object: group, index: 0 });

        let mut cmd = CopyObjects::new(vec![group], root, usize::MAX);
        cmd.apply(&mut doc).unwrap();
        let copy = cmd.copies()[0];
        let copy_owner = doc.owner(copy).unwrap();
        let copied_path = copy_owner.children()[0];
        let copied_tag = copy_owner.tags()[0];
        assert_ne!(copied_path, path);
        assert_eq!(
            doc.value(copied_tag, "path").unwrap(),
            Value::Reference(Some(copied_path))
        );
        cmd.revert(&mut doc).unwrap();
        assert!(!doc.contains(copy));
        assert_eq!(doc.owner(root).unwrap().children(), &[group]);
    }

    #[test]
    fn test_convert_rectangle_moves_children_and_references() {
        let mut doc = Document::new(&EditorConfig::default());
        let root = doc.root();
        let rect = doc
            .create_object(ObjectType::Rectangle)
            .with_value("size", Value::FloatVector(Point2D::new(4.0, 2.0)))
            .unwrap();
        let rect = add(&mut doc, rect, child_of(root));
        let inner = doc.create_object(ObjectType::Ellipse);
        let inner = add(&mut doc, inner, child_of(rect));
        let other = doc.create_object(ObjectType::Empty);
        let other = add(&mut doc, other, child_of(root));
        let tag = doc
            .create_tag(TagType::Path)
            .with_value("path", Value::Reference(Some(rect)))
            .unwrap();
        let tag = add(&mut doc, tag, Slot::Tag { object: other, index: 0 });

        let mut cmd = Convert::new(vec![rect, inner]);
        cmd.apply(&mut doc).unwrap();
        let (_, path) = cmd.converted()[0];
        assert_eq!(cmd.converted().len(), 1);
        assert!(!doc.contains(rect));
        let geometry = doc.geometry(path).unwrap();
        assert_eq!(geometry.len(), 4);
        assert!(geometry.closed);
        assert_eq!(geometry.knots[2].position, Point2D::new(2.0, 1.0));
        assert_eq!(doc.owner(path).unwrap().children(), &[inner]);
        assert_eq!(doc.owner(inner).unwrap().parent(), Some(path));
        assert_eq!(doc.value(tag, "path").unwrap(), Value::Reference(Some(path)));
        assert_eq!(doc.owner(root).unwrap().children()[0], path);

        cmd.revert(&mut doc).unwrap();
        assert!(!doc.contains(path));
        assert_eq!(doc.owner(inner).unwrap().parent(), Some(rect));
        assert_eq!(doc.value(tag, "path").unwrap(), Value::Reference(Some(rect)));
    }

    #[test]
    fn test_ellipse_geometry_is_on_circle() {
        let g = ellipse_geometry(10.0, 4);
        assert_eq!(g.len(), 4);
        for knot in &g.knots {
            assert!((knot.position.length() - 10.0).abs() < 1e-9);
        }
        let quarter = g.segment(0).unwrap().point_at(0.5);
        assert!((quarter.length() - 10.0).abs() < 0.03);
    }

    #[test]
    fn test_remove_unused_styles() {
        let mut doc = Document::new(&EditorConfig::default());
        let s = doc.create_style();
        let s = add(&mut doc, s, Slot::Style { index: 0 });
        let mut cmd = RemoveOwners::unused_styles(&doc);
        cmd.apply(&mut doc).unwrap();
        assert!(!doc.contains(s));
        assert!(doc.styles().is_empty());
        cmd.revert(&mut doc).unwrap();
        assert_eq!(doc.styles(), &[s]);
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut doc = Document::new(&EditorConfig::default());
        let root = doc.root();
        let mut cmd = RemoveOwners::new(vec![root]).confirmed();
        assert!(matches!(cmd.apply(&mut doc), Err(SceneError::InvalidParent { .. })));
    }
}
