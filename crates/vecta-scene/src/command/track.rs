use std::collections::{BTreeMap, BTreeSet};

use crate::document::Document;
use crate::error::{SceneError, SceneResult};
use crate::track::{Interpolation, Keyframe, PropertyPath, Track};

use super::{Command, Outcome};

fn track_of<'a>(doc: &'a Document, path: &PropertyPath) -> SceneResult<&'a Track> {
    doc.property(path.owner, &path.property)?
        .track()
        .ok_or_else(|| SceneError::NoTrack(path.to_string()))
}

fn track_mut<'a>(doc: &'a mut Document, path: &PropertyPath) -> SceneResult<&'a mut Track> {
    doc.property_mut(path.owner, &path.property)?
        .track_mut()
        .ok_or_else(|| SceneError::NoTrack(path.to_string()))
}

/// Attach an empty track to a property, optionally keyed at the current frame.
pub struct CreateTrack {
    path: PropertyPath,
    interpolation: Interpolation,
    key_current: bool,
    created: Option<Track>,
}

impl CreateTrack {
    pub fn new(path: PropertyPath, interpolation: Interpolation) -> Self {
        Self {
            path,
            interpolation,
            key_current: false,
            created: None,
        }
    }

    /// Seed the track with the property's static value at the animator's current frame.
    pub fn keyed_at_current_frame(mut self) -> Self {
        self.key_current = true;
        self
    }
}

impl Command for CreateTrack {
    fn label(&self) -> String {
        format!("Animate {}", self.path.property)
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        let frame = doc.animator().current();
        let prop = doc.property(self.path.owner, &self.path.property)?;
        if !prop.kind().is_animatable() {
            return Err(SceneError::NotAnimatable(prop.kind()));
        }
        if prop.track().is_some() {
            return Ok(Outcome::NoOp);
        }
        let track = match &self.created {
            Some(track) => track.clone(),
            None => {
                let mut track = Track::new(self.path.clone(), prop.kind(), self.interpolation);
                if self.key_current {
                    track.upsert(Keyframe::new(frame, prop.value().clone()))?;
                }
                self.created = Some(track.clone());
                track
            }
        };
        doc.property_mut(self.path.owner, &self.path.property)?
            .replace_track(Some(track));
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        doc.property_mut(self.path.owner, &self.path.property)?
            .replace_track(None);
        Ok(())
    }
}

/// Detach a property's track together with all its keyframes.
pub struct RemoveTrack {
    path: PropertyPath,
    removed: Option<Track>,
}

impl RemoveTrack {
    pub fn new(path: PropertyPath) -> Self {
        Self { path, removed: None }
    }
}

impl Command for RemoveTrack {
    fn label(&self) -> String {
        format!("Remove animation of {}", self.path.property)
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        track_of(doc, &self.path)?;
        self.removed = doc
            .property_mut(self.path.owner, &self.path.property)?
            .replace_track(None);
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        let track = self.removed.clone();
        doc.property_mut(self.path.owner, &self.path.property)?
            .replace_track(track);
        Ok(())
    }
}

/// Insert a keyframe, replacing any keyframe at the same frame.
///
/// A property without a track gets one with linear interpolation.
pub struct CreateKeyframe {
    path: PropertyPath,
    keyframe: Keyframe,
    replaced: Option<Keyframe>,
    created_track: bool,
}

impl CreateKeyframe {
    pub fn new(path: PropertyPath, keyframe: Keyframe) -> Self {
        Self {
            path,
            keyframe,
            replaced: None,
            created_track: false,
        }
    }
}

impl Command for CreateKeyframe {
    fn label(&self) -> String {
        format!("Key {} at frame {}", self.path.property, self.keyframe.frame)
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        let prop = doc.property(self.path.owner, &self.path.property)?;
        if !prop.kind().is_animatable() {
            return Err(SceneError::NotAnimatable(prop.kind()));
        }
        let mut keyframe = self.keyframe.clone();
        keyframe.value = prop.coerce(keyframe.value)?;
        let existing = prop.track().map(|t| t.keyframe(keyframe.frame).cloned());
        if let Some(Some(existing)) = &existing {
            if *existing == keyframe {
                return Ok(Outcome::NoOp);
            }
        }
        let mut track = match prop.track() {
            Some(track) => track.clone(),
            None => Track::new(self.path.clone(), prop.kind(), Interpolation::Linear),
        };
        self.replaced = track.upsert(keyframe)?;
        self.created_track = existing.is_none();
        doc.property_mut(self.path.owner, &self.path.property)?
            .replace_track(Some(track));
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        if self.created_track {
            doc.property_mut(self.path.owner, &self.path.property)?
                .replace_track(None);
            return Ok(());
        }
        let track = track_mut(doc, &self.path)?;
        match self.replaced.clone() {
            Some(old) => {
                track.upsert(old)?;
            }
            None => {
                track.remove(self.keyframe.frame);
            }
        }
        Ok(())
    }
}

/// Delete the keyframe at one frame.
pub struct RemoveKeyframe {
    path: PropertyPath,
    frame: i32,
    removed: Option<Keyframe>,
}

impl RemoveKeyframe {
    pub fn new(path: PropertyPath, frame: i32) -> Self {
        Self {
            path,
            frame,
            removed: None,
        }
    }
}

impl Command for RemoveKeyframe {
    fn label(&self) -> String {
        format!("Remove key of {} at frame {}", self.path.property, self.frame)
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        if track_of(doc, &self.path)?.keyframe(self.frame).is_none() {
            return Err(SceneError::NoKeyframe(self.frame));
        }
        self.removed = track_mut(doc, &self.path)?.remove(self.frame);
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        if let Some(keyframe) = self.removed.clone() {
            track_mut(doc, &self.path)?.upsert(keyframe)?;
        }
        Ok(())
    }
}

/// Shift selected keyframes of one or more tracks by a frame offset.
pub struct MoveKeyframes {
    selection: BTreeMap<PropertyPath, BTreeSet<i32>>,
    offset: i32,
    before: Vec<(PropertyPath, Vec<Keyframe>)>,
}

impl MoveKeyframes {
    pub fn new(selection: BTreeMap<PropertyPath, BTreeSet<i32>>, offset: i32) -> Self {
        Self {
            selection,
            offset,
            before: Vec::new(),
        }
    }

    fn plan(&self, doc: &Document) -> SceneResult<Vec<(PropertyPath, Vec<Keyframe>, Vec<Keyframe>)>> {
        self.selection
            .iter()
            .map(|(path, frames)| {
                let track = track_of(doc, path)?;
                if let Some(missing) = frames.iter().find(|f| track.keyframe(**f).is_none()) {
                    return Err(SceneError::NoKeyframe(*missing));
                }
                let old = track.keyframes().to_vec();
                let mut moved = old
                    .iter()
                    .cloned()
                    .map(|mut k| {
                        if frames.contains(&k.frame) {
                            k.frame = k.frame.checked_add(self.offset).ok_or(SceneError::FrameOverflow {
                                frame: k.frame,
                                offset: self.offset,
                            })?;
                        }
                        Ok(k)
                    })
                    .collect::<SceneResult<Vec<Keyframe>>>()?;
                moved.sort_by_key(|k| k.frame);
                if let Some(w) = moved.windows(2).find(|w| w[0].frame == w[1].frame) {
                    return Err(SceneError::KeyframeExists(w[0].frame));
                }
                Ok((path.clone(), old, moved))
            })
            .collect()
    }
}

impl Command for MoveKeyframes {
    fn label(&self) -> String {
        let count: usize = self.selection.values().map(|f| f.len()).sum();
        format!("Move {} keyframe(s) by {}", count, self.offset)
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        let selected = self.selection.values().any(|f| !f.is_empty());
        if self.offset == 0 || !selected {
            return Ok(Outcome::NoOp);
        }
        let plan = self.plan(doc)?;
        self.before.clear();
        for (path, old, moved) in plan {
            track_mut(doc, &path)?.replace_all(moved)?;
            self.before.push((path, old));
        }
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        for (path, old) in self.before.iter().rev() {
            track_mut(doc, path)?.replace_all(old.clone())?;
        }
        Ok(())
    }
}

/// Change how a track blends between its keyframes.
pub struct SetInterpolation {
    path: PropertyPath,
    interpolation: Interpolation,
    previous: Option<Interpolation>,
}

impl SetInterpolation {
    pub fn new(path: PropertyPath, interpolation: Interpolation) -> Self {
        Self {
            path,
            interpolation,
            previous: None,
        }
    }
}

impl Command for SetInterpolation {
    fn label(&self) -> String {
        format!("Set interpolation of {}", self.path.property)
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        if track_of(doc, &self.path)?.interpolation() == self.interpolation {
            return Ok(Outcome::NoOp);
        }
        self.previous = Some(track_mut(doc, &self.path)?.set_interpolation(self.interpolation));
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        if let Some(previous) = self.previous {
            track_mut(doc, &self.path)?.set_interpolation(previous);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use vecta_core::EditorConfig;

    fn setup() -> (Document, PropertyPath) {
        let doc = Document::new(&EditorConfig::default());
        let path = PropertyPath::new(doc.root(), "rotation");
        (doc, path)
    }

    fn key(doc: &mut Document, path: &PropertyPath, frame: i32, v: f64) {
        let mut cmd = CreateKeyframe::new(path.clone(), Keyframe::new(frame, Value::Float(v)));
        assert_eq!(cmd.apply(doc).unwrap(), Outcome::Changed);
    }

    #[test]
    fn test_create_keyframe_creates_track_and_reverts() {
        let (mut doc, path) = setup();
        let mut cmd = CreateKeyframe::new(path.clone(), Keyframe::new(0, Value::Float(0.0)));
        cmd.apply(&mut doc).unwrap();
        assert!(doc.property(path.owner, "rotation").unwrap().track().is_some());
        cmd.revert(&mut doc).unwrap();
        assert!(doc.property(path.owner, "rotation").unwrap().track().is_none());
    }

    #[test]
    fn test_replaced_keyframe_is_restored() {
        let (mut doc, path) = setup();
        key(&mut doc, &path, 0, 1.0);
        let mut cmd = CreateKeyframe::new(path.clone(), Keyframe::new(0, Value::Float(2.0)));
        cmd.apply(&mut doc).unwrap();
        cmd.revert(&mut doc).unwrap();
        let track = doc.property(path.owner, "rotation").unwrap().track().unwrap();
        assert_eq!(track.keyframe(0).unwrap().value, Value::Float(1.0));
    }

    #[test]
    fn test_linear_eval_midpoint() {
        let (mut doc, path) = setup();
        key(&mut doc, &path, 0, 0.0);
        key(&mut doc, &path, 10, 1.0);
        assert_eq!(doc.value_at(path.owner, "rotation", 5).unwrap(), Value::Float(0.5));
    }

    #[test]
    fn test_move_keyframes_collision_is_rejected() {
        let (mut doc, path) = setup();
        key(&mut doc, &path, 0, 0.0);
        key(&mut doc, &path, 5, 1.0);
        let mut sel = BTreeMap::new();
        sel.insert(path.clone(), BTreeSet::from([0]));
        let mut cmd = MoveKeyframes::new(sel, 5);
        assert_eq!(cmd.apply(&mut doc).unwrap_err(), SceneError::KeyframeExists(5));
        let track = doc.property(path.owner, "rotation").unwrap().track().unwrap();
        assert_eq!(track.frames(), vec![0, 5]);
    }

    #[test]
    fn test_move_keyframes_past_frame_range_is_rejected() {
        let (mut doc, path) = setup();
        key(&mut doc, &path, 0, 0.0);
        key(&mut doc, &path, 10, 1.0);
        let mut sel = BTreeMap::new();
        sel.insert(path.clone(), BTreeSet::from([10]));
        let mut cmd = MoveKeyframes::new(sel, i32::MAX);
        assert_eq!(
            cmd.apply(&mut doc).unwrap_err(),
            SceneError::FrameOverflow { frame: 10, offset: i32::MAX }
        );
        let track = doc.property(path.owner, "rotation").unwrap().track().unwrap();
        assert_eq!(track.frames(), vec![0, 10]);
    }

    #[test]
    fn test_move_keyframes_and_revert() {
        let (mut doc, path) = setup();
        key(&mut doc, &path, 0, 0.0);
        key(&mut doc, &path, 5, 1.0);
        let mut sel = BTreeMap::new();
        sel.insert(path.clone(), BTreeSet::from([0, 5]));
        let mut cmd = MoveKeyframes::new(sel, 3);
        cmd.apply(&mut doc).unwrap();
        let frames = |doc: &Document| {
            doc.property(path.owner, "rotation").unwrap().track().unwrap().frames()
        };
        assert_eq!(frames(&doc), vec![3, 8]);
        cmd.revert(&mut doc).unwrap();
        assert_eq!(frames(&doc), vec![0, 5]);
    }

    #[test]
    fn test_reference_cannot_be_animated() {
        let mut doc = Document::new(&EditorConfig::default());
        let tag = doc.create_tag(crate::owner::TagType::Style);
        let id = tag.id();
        doc.owners.insert(id, tag);
        let mut cmd = CreateTrack::new(PropertyPath::new(id, "style"), Interpolation::Step);
        assert!(matches!(cmd.apply(&mut doc), Err(SceneError::NotAnimatable(_))));
    }

    #[test]
    fn test_remove_missing_keyframe() {
        let (mut doc, path) = setup();
        key(&mut doc, &path, 0, 0.0);
        let mut cmd = RemoveKeyframe::new(path, 4);
        assert_eq!(cmd.apply(&mut doc).unwrap_err(), SceneError::NoKeyframe(4));
    }

    #[test]
    fn test_create_track_keyed_at_current_frame() {
        let (mut doc, path) = setup();
        doc.animator_mut().set_current(12);
        let mut cmd = CreateTrack::new(path.clone(), Interpolation::SmoothCubic).keyed_at_current_frame();
        cmd.apply(&mut doc).unwrap();
        let track = doc.property(path.owner, "rotation").unwrap().track().unwrap();
        assert_eq!(track.frames(), vec![12]);
        assert_eq!(cmd.apply(&mut doc).unwrap(), Outcome::NoOp);
    }
}
