use std::collections::{BTreeMap, BTreeSet};

use crate::document::Document;
use crate::error::SceneError;
use crate::owner::{ObjectType, OwnerId, OwnerKind, PropertyOwner};
use crate::track::PropertyPath;
use crate::value::Value;

fn invalid(errors: &mut Vec<SceneError>, message: String) {
    errors.push(SceneError::Validation(message));
}

fn check_links(doc: &Document, owner: &PropertyOwner, errors: &mut Vec<SceneError>) {
    let id = owner.id();
    for child in owner.children() {
        match doc.owners.get(child) {
            Some(c) if c.kind().is_object() && c.parent() == Some(id) => {}
            Some(_) => invalid(errors, format!("child {} of {} does not link back", child, id)),
            None => invalid(errors, format!("child {} of {} does not exist", child, id)),
        }
    }
    for tag in owner.tags() {
        match doc.owners.get(tag) {
            Some(t) if t.kind().is_tag() && t.parent() == Some(id) => {}
            Some(_) => invalid(errors, format!("tag {} of {} does not link back", tag, id)),
            None => invalid(errors, format!("tag {} of {} does not exist", tag, id)),
        }
    }
    if !owner.kind().is_object() && !owner.children().is_empty() {
        invalid(errors, format!("{} is not an object but has children", id));
    }
    if let Some(parent) = owner.parent() {
        let listed = doc
            .owners
            .get(&parent)
            .map(|p| p.children().contains(&id) || p.tags().contains(&id))
            .unwrap_or(false);
        if !listed {
            invalid(errors, format!("{} claims parent {} which does not list it", id, parent));
        }
    }
    let is_path = owner.kind() == OwnerKind::Object(ObjectType::Path);
    if is_path != owner.geometry().is_some() {
        invalid(errors, format!("{} has mismatched path geometry", id));
    }
}

fn check_properties(doc: &Document, owner: &PropertyOwner, errors: &mut Vec<SceneError>) {
    for p in owner.properties() {
        if p.value().kind() != p.kind() {
            errors.push(SceneError::TypeMismatch {
                property: p.name().to_string(),
                expected: p.kind(),
                found: p.value().kind(),
            });
            continue;
        }
        if let Err(err) = p.check_range(p.value()) {
            errors.push(err);
        }
        if let Value::Reference(Some(target)) = p.value() {
            if let Some(t) = doc.owners.get(target) {
                if !p.constraints().allows_category(t.kind().category()) {
                    errors.push(SceneError::InvalidReference {
                        property: p.name().to_string(),
                        target: *target,
                    });
                }
            }
        }
        let Some(track) = p.track() else { continue };
        if !p.kind().is_animatable() {
            errors.push(SceneError::NotAnimatable(p.kind()));
        }
        if track.kind() != p.kind() {
            invalid(errors, format!("track of {}.{} has the wrong kind", owner.id(), p.name()));
        }
        if track.target() != &PropertyPath::new(owner.id(), p.name()) {
            invalid(errors, format!("track of {}.{} targets {}", owner.id(), p.name(), track.target()));
        }
        let frames = track.frames();
        if frames.windows(2).any(|w| w[0] >= w[1]) {
            invalid(errors, format!("keyframes of {}.{} are not sorted and unique", owner.id(), p.name()));
        }
        for keyframe in track.keyframes() {
            if let Err(err) = track.check(keyframe) {
                errors.push(err);
            }
        }
    }
}

/// Check every structural rule of a document, collecting all violations.
///
/// Covers the ownership tree (rooted, acyclic, symmetric links), the style and
/// tool lists, property kinds and ranges, tracks, references and the selection.
pub fn validate_document(doc: &Document) -> Result<(), Vec<SceneError>> {
    let mut errors = Vec::new();
    let root = doc.root();
    match doc.owners.get(&root) {
        Some(r) if r.kind().is_object() && r.parent().is_none() => {}
        Some(_) => invalid(&mut errors, format!("root {} must be a parentless object", root)),
        None => invalid(&mut errors, format!("root {} does not exist", root)),
    }

    let mut occurrences: BTreeMap<OwnerId, usize> = BTreeMap::new();
    for owner in doc.owners.values() {
        for id in owner.children().iter().chain(owner.tags()) {
            *occurrences.entry(*id).or_default() += 1;
        }
        check_links(doc, owner, &mut errors);
        check_properties(doc, owner, &mut errors);
    }
    for (id, count) in &occurrences {
        if *count > 1 {
            invalid(&mut errors, format!("{} is owned {} times", id, count));
        }
    }

    let reachable: BTreeSet<OwnerId> = doc.subtree(root).into_iter().collect();
    for owner in doc.owners.values() {
        let id = owner.id();
        match owner.kind() {
            OwnerKind::Object(_) | OwnerKind::Tag(_) if !reachable.contains(&id) => {
                invalid(&mut errors, format!("{} is not reachable from the root", id));
            }
            OwnerKind::Style if !doc.styles.contains(&id) => {
                invalid(&mut errors, format!("style {} is not listed", id));
            }
            OwnerKind::Tool(_) if !doc.tools.contains(&id) => {
                invalid(&mut errors, format!("tool {} is not listed", id));
            }
            _ => {}
        }
    }
    for id in &doc.styles {
        if doc.owners.get(id).map(|o| o.kind()) != Some(OwnerKind::Style) {
            invalid(&mut errors, format!("style list entry {} is not a style", id));
        }
    }
    for id in &doc.tools {
        if !matches!(doc.owners.get(id).map(|o| o.kind()), Some(OwnerKind::Tool(_))) {
            invalid(&mut errors, format!("tool list entry {} is not a tool", id));
        }
    }

    let dangling: BTreeSet<OwnerId> = doc
        .references()
        .into_iter()
        .filter(|r| !doc.contains(r.target))
        .map(|r| r.owner)
        .collect();
    if !dangling.is_empty() {
        errors.push(SceneError::DanglingReference {
            count: dangling.len(),
        });
    }
    if let Some(missing) = doc.selection.iter().find(|id| !doc.contains(**id)) {
        errors.push(SceneError::UnknownOwner(*missing));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
