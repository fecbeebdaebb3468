use std::collections::BTreeSet;

use crate::document::Document;
use crate::owner::OwnerId;
use crate::value::Value;

/// A reference property pointing at some owner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReferenceHolder {
    pub owner: OwnerId,
    pub property: String,
    pub target: OwnerId,
}

impl Document {
    /// Every reference property in the document, in owner id order.
    pub fn references(&self) -> Vec<ReferenceHolder> {
        self.owners
            .values()
            .flat_map(|owner| {
                owner.properties().iter().filter_map(move |p| match p.value() {
                    Value::Reference(Some(target)) => Some(ReferenceHolder {
                        owner: owner.id(),
                        property: p.name().to_string(),
                        target: *target,
                    }),
                    _ => None,
                })
            })
            .collect()
    }

    /// Reference properties outside `targets` that point into `targets`.
    pub fn find_reference_holders(&self, targets: &BTreeSet<OwnerId>) -> Vec<ReferenceHolder> {
        self.references()
            .into_iter()
            .filter(|r| targets.contains(&r.target) && !targets.contains(&r.owner))
            .collect()
    }

    /// Every id removed along with `roots`: the roots, their descendants and all their tags.
    pub fn removal_closure(&self, roots: &[OwnerId]) -> BTreeSet<OwnerId> {
        roots.iter().flat_map(|r| self.subtree(*r)).collect()
    }

    /// Distinct owners that would be left with a dangling reference if `roots` were removed.
    pub fn removal_conflicts(&self, roots: &[OwnerId]) -> usize {
        let closure = self.removal_closure(roots);
        self.find_reference_holders(&closure)
            .iter()
            .map(|r| r.owner)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Styles no reference property points at.
    pub fn unused_styles(&self) -> Vec<OwnerId> {
        let referenced: BTreeSet<OwnerId> = self.references().iter().map(|r| r.target).collect();
        self.styles
            .iter()
            .copied()
            .filter(|s| !referenced.contains(s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Slot;
    use crate::owner::{ObjectType, TagType};
    use vecta_core::EditorConfig;

    fn insert(doc: &mut Document, owner: crate::owner::PropertyOwner, slot: Slot) -> OwnerId {
        let id = owner.id();
        doc.owners.insert(id, owner);
        doc.attach(id, slot).unwrap();
        id
    }

    #[test]
    fn test_holders_inside_removed_set_are_ignored() {
        let mut doc = Document::new(&EditorConfig::default());
        let root = doc.root();
        let a = doc.create_object(ObjectType::Empty);
        let a = insert(&mut doc, a, Slot::Child { parent: root, index: 0 });
        let b = doc.create_object(ObjectType::Path);
        let b = insert(&mut doc, b, Slot::Child { parent: a, index: 0 });
        let inner = doc
            .create_tag(TagType::Path)
            .with_value("path", Value::Reference(Some(b)))
            .unwrap();
        insert(&mut doc, inner, Slot::Tag { object: a, index: 0 });
        assert_eq!(doc.removal_conflicts(&[a]), 0);

        let other = doc.create_object(ObjectType::Empty);
        let other = insert(&mut doc, other, Slot::Child { parent: root, index: 1 });
        let outer = doc
            .create_tag(TagType::Path)
            .with_value("path", Value::Reference(Some(b)))
            .unwrap();
        insert(&mut doc, outer, Slot::Tag { object: other, index: 0 });
        assert_eq!(doc.removal_conflicts(&[a]), 1);
    }

    #[test]
    fn test_unused_styles() {
        let mut doc = Document::new(&EditorConfig::default());
        let used = doc.create_style();
        let used = insert(&mut doc, used, Slot::Style { index: 0 });
        let unused = doc.create_style();
        let unused = insert(&mut doc, unused, Slot::Style { index: 1 });
        let root = doc.root();
        let tag = doc
            .create_tag(TagType::Style)
            .with_value("style", Value::Reference(Some(used)))
            .unwrap();
        insert(&mut doc, tag, Slot::Tag { object: root, index: 0 });
        assert_eq!(doc.unused_styles(), vec![unused]);
    }
}
