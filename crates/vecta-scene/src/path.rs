//! Path geometry: knots with tangent handles, and the pure edits that
//! path commands are built from.
//!
//! Every edit here returns a new [`PathGeometry`]; nothing mutates in place,
//! so a command can capture both sides of an edit for exact revert.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use vecta_core::{Point2D, Transform2D};

use crate::error::{SceneError, SceneResult};

const LENGTH_SAMPLES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KnotMode {
    /// Zero tangents.
    #[default]
    Linear,
    /// Tangents mirrored through the knot.
    Smooth,
    /// Independent tangents.
    Bezier,
}

/// A path control point. Tangents are offsets relative to `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knot {
    pub position: Point2D,
    pub left_tangent: Point2D,
    pub right_tangent: Point2D,
    pub mode: KnotMode,
}

impl Knot {
    pub fn linear(x: f64, y: f64) -> Self {
        Self {
            position: Point2D::new(x, y),
            left_tangent: Point2D::zero(),
            right_tangent: Point2D::zero(),
            mode: KnotMode::Linear,
        }
    }

    /// Smooth knot whose left tangent mirrors `right`.
    pub fn smooth(position: Point2D, right: Point2D) -> Self {
        Self {
            position,
            left_tangent: -right,
            right_tangent: right,
            mode: KnotMode::Smooth,
        }
    }

    pub fn bezier(position: Point2D, left: Point2D, right: Point2D) -> Self {
        Self {
            position,
            left_tangent: left,
            right_tangent: right,
            mode: KnotMode::Bezier,
        }
    }

    pub fn left_handle(&self) -> Point2D {
        self.position + self.left_tangent
    }

    pub fn right_handle(&self) -> Point2D {
        self.position + self.right_tangent
    }

    /// Set the outgoing tangent, keeping the mode's invariant.
    pub fn set_right_tangent(&mut self, tangent: Point2D) {
        match self.mode {
            KnotMode::Linear => {}
            KnotMode::Smooth => {
                self.right_tangent = tangent;
                self.left_tangent = -tangent;
            }
            KnotMode::Bezier => self.right_tangent = tangent,
        }
    }

    /// Set the incoming tangent, keeping the mode's invariant.
    pub fn set_left_tangent(&mut self, tangent: Point2D) {
        match self.mode {
            KnotMode::Linear => {}
            KnotMode::Smooth => {
                self.left_tangent = tangent;
                self.right_tangent = -tangent;
            }
            KnotMode::Bezier => self.left_tangent = tangent,
        }
    }

    fn transformed(&self, t: &Transform2D) -> Knot {
        Knot {
            position: t.apply_point(self.position),
            left_tangent: t.apply_vector(self.left_tangent),
            right_tangent: t.apply_vector(self.right_tangent),
            mode: self.mode,
        }
    }
}

/// One cubic Bézier segment between two neighbouring knots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub p0: Point2D,
    pub p1: Point2D,
    pub p2: Point2D,
    pub p3: Point2D,
}

impl CubicSegment {
    pub fn point_at(&self, t: f64) -> Point2D {
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }

    /// Both handles sit on their endpoints.
    pub fn is_linear(&self) -> bool {
        self.p1 == self.p0 && self.p2 == self.p3
    }

    /// De Casteljau split at `t`.
    pub fn split(&self, t: f64) -> (CubicSegment, CubicSegment) {
        let q0 = self.p0.lerp(&self.p1, t);
        let q1 = self.p1.lerp(&self.p2, t);
        let q2 = self.p2.lerp(&self.p3, t);
        let r0 = q0.lerp(&q1, t);
        let r1 = q1.lerp(&q2, t);
        let s = r0.lerp(&r1, t);
        (
            CubicSegment {
                p0: self.p0,
                p1: q0,
                p2: r0,
                p3: s,
            },
            CubicSegment {
                p0: s,
                p1: r1,
                p2: q2,
                p3: self.p3,
            },
        )
    }

    /// Arc length; exact for linear segments, sampled otherwise.
    pub fn length(&self) -> f64 {
        if self.is_linear() {
            return self.p0.distance(&self.p3);
        }
        let mut total = 0.0;
        let mut prev = self.p0;
        for i in 1..=LENGTH_SAMPLES {
            let p = self.point_at(i as f64 / LENGTH_SAMPLES as f64);
            total += prev.distance(&p);
            prev = p;
        }
        total
    }
}

/// Ordered knots of a path; closed paths connect the last knot back to the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathGeometry {
    pub knots: Vec<Knot>,
    pub closed: bool,
}

impl PathGeometry {
    pub fn new(knots: Vec<Knot>, closed: bool) -> Self {
        Self { knots, closed }
    }

    pub fn open(knots: Vec<Knot>) -> Self {
        Self::new(knots, false)
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        match self.knots.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Segment `i` runs from knot `i` to knot `i + 1` (wrapping on closed paths).
    pub fn segment(&self, i: usize) -> Option<CubicSegment> {
        if i >= self.segment_count() {
            return None;
        }
        let a = &self.knots[i];
        let b = &self.knots[(i + 1) % self.knots.len()];
        Some(CubicSegment {
            p0: a.position,
            p1: a.right_handle(),
            p2: b.left_handle(),
            p3: b.position,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = CubicSegment> + '_ {
        (0..self.segment_count()).filter_map(move |i| self.segment(i))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    fn check_index(&self, index: usize) -> SceneResult<()> {
        if index >= self.knots.len() {
            return Err(SceneError::InvalidKnotIndex {
                index,
                len: self.knots.len(),
            });
        }
        Ok(())
    }

    fn check_indices<'a>(&self, indices: impl IntoIterator<Item = &'a usize>) -> SceneResult<()> {
        indices.into_iter().try_for_each(|&i| self.check_index(i))
    }

    /// Insert `knots` before position `index` (`index == len` appends).
    pub fn with_inserted(&self, index: usize, knots: &[Knot]) -> SceneResult<PathGeometry> {
        if index > self.knots.len() {
            return Err(SceneError::InvalidKnotIndex {
                index,
                len: self.knots.len(),
            });
        }
        let mut out = self.clone();
        out.knots.splice(index..index, knots.iter().copied());
        Ok(out)
    }

    pub fn with_removed(&self, indices: &BTreeSet<usize>) -> SceneResult<PathGeometry> {
        self.check_indices(indices)?;
        let mut out = self.clone();
        out.knots = self
            .knots
            .iter()
            .enumerate()
            .filter(|(i, _)| !indices.contains(i))
            .map(|(_, k)| *k)
            .collect();
        Ok(out)
    }

    pub fn with_modified(&self, knots: &BTreeMap<usize, Knot>) -> SceneResult<PathGeometry> {
        self.check_indices(knots.keys())?;
        let mut out = self.clone();
        for (&i, knot) in knots {
            out.knots[i] = *knot;
        }
        Ok(out)
    }

    pub fn with_transformed(
        &self,
        indices: &BTreeSet<usize>,
        transform: &Transform2D,
    ) -> SceneResult<PathGeometry> {
        self.check_indices(indices)?;
        let mut out = self.clone();
        for &i in indices {
            out.knots[i] = self.knots[i].transformed(transform);
        }
        Ok(out)
    }

    pub fn with_mode(&self, indices: &BTreeSet<usize>, mode: KnotMode) -> SceneResult<PathGeometry> {
        self.check_indices(indices)?;
        let mut out = self.clone();
        for &i in indices {
            out.knots[i].mode = mode;
        }
        Ok(out)
    }

    pub fn with_closed(&self, closed: bool) -> PathGeometry {
        PathGeometry {
            knots: self.knots.clone(),
            closed,
        }
    }

    /// Insert a knot in the middle of each listed segment without changing the
    /// drawn shape.
    ///
    /// Linear segments get their midpoint as a linear knot. Cubic segments are
    /// split with De Casteljau at t = 0.5; the new knot is smooth and the
    /// neighbouring handles shrink to match, which turns smooth neighbours into
    /// bezier knots.
    pub fn subdivided(&self, segments: &BTreeSet<usize>) -> SceneResult<PathGeometry> {
        let count = self.segment_count();
        if let Some(&bad) = segments.iter().find(|&&s| s >= count) {
            return Err(SceneError::InvalidKnotIndex {
                index: bad,
                len: self.knots.len(),
            });
        }
        let n = self.knots.len();
        let mut out = self.knots.clone();
        let mut inserted: Vec<(usize, Knot)> = Vec::with_capacity(segments.len());

        for &s in segments {
            let Some(seg) = self.segment(s) else { continue };
            let next = (s + 1) % n;
            if seg.is_linear() {
                let mid = seg.p0.midpoint(&seg.p3);
                inserted.push((s + 1, Knot::linear(mid.x, mid.y)));
                continue;
            }
            let (left, right) = seg.split(0.5);
            let mid = left.p3;
            inserted.push((
                s + 1,
                Knot {
                    position: mid,
                    left_tangent: left.p2 - mid,
                    right_tangent: right.p1 - mid,
                    mode: KnotMode::Smooth,
                },
            ));
            set_handle(&mut out[s], left.p1 - left.p0, Side::Right);
            set_handle(&mut out[next], right.p2 - right.p3, Side::Left);
        }

        // Insert back to front so earlier indices stay valid.
        for (index, knot) in inserted.into_iter().rev() {
            out.insert(index, knot);
        }
        Ok(PathGeometry {
            knots: out,
            closed: self.closed,
        })
    }

    fn neighbours(&self, i: usize) -> (Option<Point2D>, Option<Point2D>) {
        let n = self.knots.len();
        let prev = if i > 0 {
            Some(self.knots[i - 1].position)
        } else if self.closed && n > 2 {
            Some(self.knots[n - 1].position)
        } else {
            None
        };
        let next = if i + 1 < n {
            Some(self.knots[i + 1].position)
        } else if self.closed && n > 2 {
            Some(self.knots[0].position)
        } else {
            None
        };
        (prev, next)
    }

    /// Smooth knot tangents for knot `i`, derived from its neighbours; the position stays put.
    pub fn smooth_knot(&self, i: usize) -> SceneResult<Knot> {
        self.check_index(i)?;
        let knot = self.knots[i];
        let p = knot.position;
        let right = match self.neighbours(i) {
            (Some(prev), Some(next)) => {
                let reach = (p.distance(&prev) + p.distance(&next)) / 6.0;
                (next - prev).normalized() * reach
            }
            (None, Some(next)) => (next - p) * (1.0 / 3.0),
            (Some(prev), None) => (p - prev) * (1.0 / 3.0),
            (None, None) => Point2D::zero(),
        };
        Ok(Knot::smooth(p, right))
    }

    pub fn smoothened(&self, indices: &BTreeSet<usize>) -> SceneResult<PathGeometry> {
        let mut map = BTreeMap::new();
        for &i in indices {
            map.insert(i, self.smooth_knot(i)?);
        }
        self.with_modified(&map)
    }

    pub fn linearized(&self, indices: &BTreeSet<usize>) -> SceneResult<PathGeometry> {
        self.check_indices(indices)?;
        let mut out = self.clone();
        for &i in indices {
            let k = &mut out.knots[i];
            k.left_tangent = Point2D::zero();
            k.right_tangent = Point2D::zero();
            k.mode = KnotMode::Linear;
        }
        Ok(out)
    }
}

enum Side {
    Left,
    Right,
}

/// Rewrite one handle of a neighbouring knot after a split. Only the split
/// side may change, so a smooth knot whose handle actually moved becomes bezier.
fn set_handle(knot: &mut Knot, tangent: Point2D, side: Side) {
    let current = match side {
        Side::Left => knot.left_tangent,
        Side::Right => knot.right_tangent,
    };
    if current == tangent {
        return;
    }
    if knot.mode != KnotMode::Bezier {
        knot.mode = KnotMode::Bezier;
    }
    match side {
        Side::Left => knot.left_tangent = tangent,
        Side::Right => knot.right_tangent = tangent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(indices: &[usize]) -> BTreeSet<usize> {
        indices.iter().copied().collect()
    }

    fn close(a: Point2D, b: Point2D) -> bool {
        a.distance(&b) < 1e-9
    }

    #[test]
    fn test_subdivide_linear_segment() {
        let path = PathGeometry::open(vec![Knot::linear(0.0, 0.0), Knot::linear(10.0, 0.0)]);
        let out = path.subdivided(&set(&[0])).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.knots[1], Knot::linear(5.0, 0.0));
        assert!((out.length() - path.length()).abs() < 1e-12);
    }

    #[test]
    fn test_subdivide_cubic_preserves_shape() {
        let path = PathGeometry::open(vec![
            Knot::smooth(Point2D::new(0.0, 0.0), Point2D::new(0.0, 10.0)),
            Knot::smooth(Point2D::new(30.0, 0.0), Point2D::new(0.0, -10.0)),
        ]);
        let original = path.segment(0).unwrap();
        let out = path.subdivided(&set(&[0])).unwrap();
        assert_eq!(out.segment_count(), 2);
        let first = out.segment(0).unwrap();
        let second = out.segment(1).unwrap();
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!(close(first.point_at(t), original.point_at(t * 0.5)));
            assert!(close(second.point_at(t), original.point_at(0.5 + t * 0.5)));
        }
        assert_eq!(out.knots[1].mode, KnotMode::Smooth);
        assert!(close(out.knots[1].left_tangent, -out.knots[1].right_tangent));
        assert_eq!(out.knots[0].mode, KnotMode::Bezier);
    }

    #[test]
    fn test_subdivide_closing_segment_appends() {
        let path = PathGeometry::new(
            vec![
                Knot::linear(0.0, 0.0),
                Knot::linear(10.0, 0.0),
                Knot::linear(10.0, 10.0),
            ],
            true,
        );
        let out = path.subdivided(&set(&[2])).unwrap();
        assert_eq!(out.knots[3], Knot::linear(5.0, 5.0));
        assert!((out.length() - path.length()).abs() < 1e-9);
    }

    #[test]
    fn test_subdivide_several_segments() {
        let path = PathGeometry::open(vec![
            Knot::linear(0.0, 0.0),
            Knot::linear(2.0, 0.0),
            Knot::linear(4.0, 0.0),
        ]);
        let out = path.subdivided(&set(&[0, 1])).unwrap();
        let xs: Vec<f64> = out.knots.iter().map(|k| k.position.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_subdivide_rejects_missing_segment() {
        let path = PathGeometry::open(vec![Knot::linear(0.0, 0.0), Knot::linear(1.0, 0.0)]);
        assert!(path.subdivided(&set(&[1])).is_err());
    }

    #[test]
    fn test_smooth_keeps_position_and_mirrors_direction() {
        let path = PathGeometry::open(vec![
            Knot::linear(0.0, 0.0),
            Knot::linear(3.0, 3.0),
            Knot::linear(6.0, 0.0),
        ]);
        let out = path.smoothened(&set(&[1])).unwrap();
        let k = out.knots[1];
        assert_eq!(k.position, Point2D::new(3.0, 3.0));
        assert_eq!(k.mode, KnotMode::Smooth);
        assert!(close(k.left_tangent.normalized(), -k.right_tangent.normalized()));
        assert!(k.right_tangent.y.abs() < 1e-12);
    }

    #[test]
    fn test_smooth_mirrors_uneven_neighbours_exactly() {
        let path = PathGeometry::open(vec![
            Knot::linear(0.0, 0.0),
            Knot::linear(1.0, 0.0),
            Knot::linear(10.0, 0.0),
        ]);
        let mut k = path.smooth_knot(1).unwrap();
        assert_eq!(k.left_tangent, -k.right_tangent);
        assert!((k.right_tangent.x - 10.0 / 6.0).abs() < 1e-12);
        let right = k.right_tangent;
        k.set_left_tangent(k.left_tangent);
        assert_eq!(k.right_tangent, right);
    }

    #[test]
    fn test_linearize_zeroes_tangents() {
        let path = PathGeometry::open(vec![Knot::smooth(
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 0.0),
        )]);
        let out = path.linearized(&set(&[0])).unwrap();
        assert_eq!(out.knots[0], Knot::linear(1.0, 1.0));
    }

    #[test]
    fn test_smooth_knot_tangent_setter_mirrors() {
        let mut k = Knot::smooth(Point2D::zero(), Point2D::new(1.0, 0.0));
        k.set_right_tangent(Point2D::new(0.0, 2.0));
        assert_eq!(k.left_tangent, Point2D::new(0.0, -2.0));
        let mut l = Knot::linear(0.0, 0.0);
        l.set_left_tangent(Point2D::new(5.0, 5.0));
        assert!(l.left_tangent.is_zero());
    }

    #[test]
    fn test_transform_moves_tangents_linearly() {
        let path = PathGeometry::open(vec![Knot::bezier(
            Point2D::new(1.0, 0.0),
            Point2D::new(-1.0, 0.0),
            Point2D::new(1.0, 0.0),
        )]);
        let t = Transform2D::translate(5.0, 5.0);
        let out = path.with_transformed(&set(&[0]), &t).unwrap();
        assert_eq!(out.knots[0].position, Point2D::new(6.0, 5.0));
        assert_eq!(out.knots[0].right_tangent, Point2D::new(1.0, 0.0));
    }

    #[test]
    fn test_remove_and_insert() {
        let path = PathGeometry::open(vec![
            Knot::linear(0.0, 0.0),
            Knot::linear(1.0, 0.0),
            Knot::linear(2.0, 0.0),
        ]);
        let removed = path.with_removed(&set(&[1])).unwrap();
        assert_eq!(removed.len(), 2);
        let back = removed.with_inserted(1, &[Knot::linear(1.0, 0.0)]).unwrap();
        assert_eq!(back, path);
        assert!(path.with_removed(&set(&[3])).is_err());
        assert!(path.with_inserted(4, &[]).is_err());
    }
}
