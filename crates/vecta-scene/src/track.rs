use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::owner::OwnerId;
use crate::value::{PropertyKind, Value};

/// Addresses one property of one owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyPath {
    pub owner: OwnerId,
    pub property: String,
}

impl PropertyPath {
    pub fn new(owner: OwnerId, property: impl Into<String>) -> Self {
        Self {
            owner,
            property: property.into(),
        }
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.owner, self.property)
    }
}

/// How a track blends between neighbouring keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    SmoothCubic,
    Step,
}

/// Per-component slopes (value units per frame) on either side of a keyframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tangents {
    pub incoming: Vec<f64>,
    pub outgoing: Vec<f64>,
}

impl Tangents {
    pub fn new(incoming: Vec<f64>, outgoing: Vec<f64>) -> Self {
        Self { incoming, outgoing }
    }

    /// Same slope on both sides.
    pub fn mirrored(slope: Vec<f64>) -> Self {
        Self {
            incoming: slope.clone(),
            outgoing: slope,
        }
    }
}

/// A value at a specific frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i32,
    pub value: Value,
    /// Only consulted in [`Interpolation::SmoothCubic`] mode; zero slopes when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangents: Option<Tangents>,
}

impl Keyframe {
    pub fn new(frame: i32, value: Value) -> Self {
        Self {
            frame,
            value,
            tangents: None,
        }
    }

    pub fn with_tangents(mut self, tangents: Tangents) -> Self {
        self.tangents = Some(tangents);
        self
    }
}

/// Animation timeline of one property.
///
/// Keyframes are kept sorted by frame and frames are unique. Mutators are
/// crate-private: keyframes change only through commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    target: PropertyPath,
    kind: PropertyKind,
    interpolation: Interpolation,
    keyframes: Vec<Keyframe>,
}

impl Track {
    pub fn new(target: PropertyPath, kind: PropertyKind, interpolation: Interpolation) -> Self {
        Self {
            target,
            kind,
            interpolation,
            keyframes: Vec::new(),
        }
    }

    pub fn target(&self) -> &PropertyPath {
        &self.target
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn frames(&self) -> Vec<i32> {
        self.keyframes.iter().map(|k| k.frame).collect()
    }

    pub fn keyframe(&self, frame: i32) -> Option<&Keyframe> {
        self.position(frame).ok().map(|i| &self.keyframes[i])
    }

    fn position(&self, frame: i32) -> Result<usize, usize> {
        self.keyframes.binary_search_by_key(&frame, |k| k.frame)
    }

    /// Check that a keyframe fits this track's kind.
    pub fn check(&self, keyframe: &Keyframe) -> SceneResult<()> {
        if keyframe.value.kind() != self.kind {
            return Err(SceneError::TypeMismatch {
                property: self.target.property.clone(),
                expected: self.kind,
                found: keyframe.value.kind(),
            });
        }
        if let Some(t) = &keyframe.tangents {
            let n = self.kind.component_count();
            if t.incoming.len() != n || t.outgoing.len() != n {
                return Err(SceneError::Validation(format!(
                    "tangents of '{}' at frame {} need {} component(s)",
                    self.target.property, keyframe.frame, n
                )));
            }
        }
        Ok(())
    }

    /// Insert or replace the keyframe at `keyframe.frame`, returning the one replaced.
    pub(crate) fn upsert(&mut self, keyframe: Keyframe) -> SceneResult<Option<Keyframe>> {
        self.check(&keyframe)?;
        match self.position(keyframe.frame) {
            Ok(i) => Ok(Some(std::mem::replace(&mut self.keyframes[i], keyframe))),
            Err(i) => {
                self.keyframes.insert(i, keyframe);
                Ok(None)
            }
        }
    }

    pub(crate) fn remove(&mut self, frame: i32) -> Option<Keyframe> {
        self.position(frame).ok().map(|i| self.keyframes.remove(i))
    }

    /// Replace every keyframe at once. Sorts, and rejects duplicate frames.
    pub(crate) fn replace_all(&mut self, mut keyframes: Vec<Keyframe>) -> SceneResult<Vec<Keyframe>> {
        for k in &keyframes {
            self.check(k)?;
        }
        keyframes.sort_by_key(|k| k.frame);
        if let Some(w) = keyframes.windows(2).find(|w| w[0].frame == w[1].frame) {
            return Err(SceneError::KeyframeExists(w[0].frame));
        }
        Ok(std::mem::replace(&mut self.keyframes, keyframes))
    }

    pub(crate) fn set_interpolation(&mut self, interpolation: Interpolation) -> Interpolation {
        std::mem::replace(&mut self.interpolation, interpolation)
    }

    pub(crate) fn retarget(&mut self, target: PropertyPath) {
        self.target = target;
    }

    /// Evaluate the track at `frame`. `None` only when the track has no keyframes.
    ///
    /// Frames outside the keyed range clamp to the boundary keyframe. Pure:
    /// depends only on the track and the frame.
    pub fn evaluate(&self, frame: i32) -> Option<Value> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        if frame <= first.frame {
            return Some(first.value.clone());
        }
        if frame >= last.frame {
            return Some(last.value.clone());
        }

        // first.frame < frame < last.frame, so both neighbours exist.
        let i = self.keyframes.partition_point(|k| k.frame <= frame);
        let k0 = &self.keyframes[i - 1];
        let k1 = &self.keyframes[i];
        if k0.frame == frame {
            return Some(k0.value.clone());
        }
        if !self.kind.is_interpolable() {
            return Some(k0.value.clone());
        }

        let span = f64::from(k1.frame) - f64::from(k0.frame);
        let t = (f64::from(frame) - f64::from(k0.frame)) / span;
        let value = match self.interpolation {
            Interpolation::Step => k0.value.clone(),
            Interpolation::Linear => k0.value.lerp(&k1.value, t),
            Interpolation::SmoothCubic => hermite(k0, k1, span, t, self.kind),
        };
        Some(value)
    }
}

/// Cubic Hermite segment between two keyframes, per component.
fn hermite(k0: &Keyframe, k1: &Keyframe, span: f64, t: f64, kind: PropertyKind) -> Value {
    let p0 = k0.value.components();
    let p1 = k1.value.components();
    let n = p0.len();
    let zeros = vec![0.0; n];
    let m0 = k0.tangents.as_ref().map(|t| &t.outgoing).unwrap_or(&zeros);
    let m1 = k1.tangents.as_ref().map(|t| &t.incoming).unwrap_or(&zeros);

    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    let c: Vec<f64> = (0..n)
        .map(|i| h00 * p0[i] + h10 * span * m0[i] + h01 * p1[i] + h11 * span * m1[i])
        .collect();
    Value::from_components(kind, &c).unwrap_or_else(|| k0.value.clone())
}
