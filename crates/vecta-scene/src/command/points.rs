use std::collections::{BTreeMap, BTreeSet};

use vecta_core::Transform2D;

use crate::document::Document;
use crate::error::SceneResult;
use crate::owner::OwnerId;
use crate::path::{Knot, KnotMode, PathGeometry};

use super::{Command, Outcome};

/// One edit of a path's knot list.
#[derive(Debug, Clone, PartialEq)]
pub enum PointsEdit {
    /// Insert knots before `index`.
    Add { index: usize, knots: Vec<Knot> },
    Remove(BTreeSet<usize>),
    /// Replace knots by index.
    Modify(BTreeMap<usize, Knot>),
    Transform(BTreeSet<usize>, Transform2D),
    /// Split the given segments at their midpoints.
    Subdivide(BTreeSet<usize>),
    MakeSmooth(BTreeSet<usize>),
    MakeLinear(BTreeSet<usize>),
    SetMode(BTreeSet<usize>, KnotMode),
    SetClosed(bool),
}

impl PointsEdit {
    fn run(&self, geometry: &PathGeometry) -> SceneResult<PathGeometry> {
        match self {
            PointsEdit::Add { index, knots } => geometry.with_inserted(*index, knots),
            PointsEdit::Remove(indices) => geometry.with_removed(indices),
            PointsEdit::Modify(knots) => geometry.with_modified(knots),
            PointsEdit::Transform(indices, t) => geometry.with_transformed(indices, t),
            PointsEdit::Subdivide(segments) => geometry.subdivided(segments),
            PointsEdit::MakeSmooth(indices) => geometry.smoothened(indices),
            PointsEdit::MakeLinear(indices) => geometry.linearized(indices),
            PointsEdit::SetMode(indices, mode) => geometry.with_mode(indices, *mode),
            PointsEdit::SetClosed(closed) => Ok(geometry.with_closed(*closed)),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            PointsEdit::Add { .. } => "Add points",
            PointsEdit::Remove(_) => "Remove points",
            PointsEdit::Modify(_) => "Modify points",
            PointsEdit::Transform(..) => "Transform points",
            PointsEdit::Subdivide(_) => "Subdivide",
            PointsEdit::MakeSmooth(_) => "Make smooth",
            PointsEdit::MakeLinear(_) => "Make linear",
            PointsEdit::SetMode(..) => "Set knot mode",
            PointsEdit::SetClosed(true) => "Close path",
            PointsEdit::SetClosed(false) => "Open path",
        }
    }
}

/// Applies a [`PointsEdit`] to one path object, keeping the full knot list
/// before and after for exact revert.
pub struct PointsCommand {
    path: OwnerId,
    edit: PointsEdit,
    states: Option<(PathGeometry, PathGeometry)>,
}

impl PointsCommand {
    pub fn new(path: OwnerId, edit: PointsEdit) -> Self {
        Self {
            path,
            edit,
            states: None,
        }
    }

    pub fn add(path: OwnerId, index: usize, knots: Vec<Knot>) -> Self {
        Self::new(path, PointsEdit::Add { index, knots })
    }

    pub fn remove(path: OwnerId, indices: BTreeSet<usize>) -> Self {
        Self::new(path, PointsEdit::Remove(indices))
    }

    pub fn modify(path: OwnerId, knots: BTreeMap<usize, Knot>) -> Self {
        Self::new(path, PointsEdit::Modify(knots))
    }

    pub fn transform(path: OwnerId, indices: BTreeSet<usize>, transform: Transform2D) -> Self {
        Self::new(path, PointsEdit::Transform(indices, transform))
    }

    pub fn subdivide(path: OwnerId, segments: BTreeSet<usize>) -> Self {
        Self::new(path, PointsEdit::Subdivide(segments))
    }

    pub fn make_smooth(path: OwnerId, indices: BTreeSet<usize>) -> Self {
        Self::new(path, PointsEdit::MakeSmooth(indices))
    }

    pub fn make_linear(path: OwnerId, indices: BTreeSet<usize>) -> Self {
        Self::new(path, PointsEdit::MakeLinear(indices))
    }

    pub fn set_mode(path: OwnerId, indices: BTreeSet<usize>, mode: KnotMode) -> Self {
        Self::new(path, PointsEdit::SetMode(indices, mode))
    }

    pub fn set_closed(path: OwnerId, closed: bool) -> Self {
        Self::new(path, PointsEdit::SetClosed(closed))
    }

    pub fn edit(&self) -> &PointsEdit {
        &self.edit
    }
}

impl Command for PointsCommand {
    fn label(&self) -> String {
        self.edit.describe().to_string()
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        let (before, after) = match &self.states {
            Some(states) => states.clone(),
            None => {
                let before = doc.geometry(self.path)?.clone();
                let after = self.edit.run(&before)?;
                (before, after)
            }
        };
        if before == after {
            return Ok(Outcome::NoOp);
        }
        *doc.geometry_mut(self.path)? = after.clone();
        self.states = Some((before, after));
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        if let Some((before, _)) = &self.states {
            *doc.geometry_mut(self.path)? = before.clone();
        }
        Ok(())
    }
}
