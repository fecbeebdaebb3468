use serde::{Deserialize, Serialize};
use vecta_core::{Color, Point2D};

use crate::error::{SceneError, SceneResult};
use crate::owner::OwnerCategory;
use crate::track::Track;
use crate::value::{PropertyKind, Value};

/// Optional restrictions on the values a property accepts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Editing increment offered to widgets. Not enforced on assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Owner categories a reference may point at; `None` allows any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_filter: Option<Vec<OwnerCategory>>,
}

impl Constraints {
    /// NaN lands on the lower bound (or upper, or zero); infinities stay finite.
    fn clamp_f64(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.min.or(self.max).unwrap_or(0.0);
        }
        let v = v.clamp(f64::MIN, f64::MAX);
        let v = match self.min {
            Some(min) if v < min => min,
            _ => v,
        };
        match self.max {
            Some(max) if v > max => max,
            _ => v,
        }
    }

    fn clamp_i64(&self, v: i64) -> i64 {
        let v = match self.min {
            Some(min) if (v as f64) < min => min.ceil() as i64,
            _ => v,
        };
        match self.max {
            Some(max) if (v as f64) > max => max.floor() as i64,
            _ => v,
        }
    }

    pub fn allows_category(&self, category: OwnerCategory) -> bool {
        self.reference_filter
            .as_ref()
            .map(|allowed| allowed.contains(&category))
            .unwrap_or(true)
    }
}

/// A typed, named, constrained value slot, optionally animated by a [`Track`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    name: String,
    kind: PropertyKind,
    value: Value,
    #[serde(default)]
    constraints: Constraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    track: Option<Track>,
}

impl Property {
    /// A property whose kind is taken from its initial value.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: value.kind(),
            value,
            constraints: Constraints::default(),
            track: None,
        }
    }

    pub fn bool(name: impl Into<String>, v: bool) -> Self {
        Self::new(name, Value::Bool(v))
    }

    pub fn integer(name: impl Into<String>, v: i64) -> Self {
        Self::new(name, Value::Integer(v))
    }

    pub fn float(name: impl Into<String>, v: f64) -> Self {
        Self::new(name, Value::Float(v))
    }

    pub fn string(name: impl Into<String>, v: impl Into<String>) -> Self {
        Self::new(name, Value::String(v.into()))
    }

    pub fn color(name: impl Into<String>, v: Color) -> Self {
        Self::new(name, Value::Color(v))
    }

    pub fn options(name: impl Into<String>, options: &[&str], selected: usize) -> Self {
        let mut p = Self::new(name, Value::Options(selected));
        p.constraints.options = options.iter().map(|s| s.to_string()).collect();
        p.value = p.constrain(p.value.clone());
        p
    }

    pub fn reference(name: impl Into<String>, filter: &[OwnerCategory]) -> Self {
        let mut p = Self::new(name, Value::Reference(None));
        p.constraints.reference_filter = Some(filter.to_vec());
        p
    }

    pub fn trigger(name: impl Into<String>) -> Self {
        Self::new(name, Value::Trigger)
    }

    pub fn integer_vector(name: impl Into<String>, v: [i64; 2]) -> Self {
        Self::new(name, Value::IntegerVector(v))
    }

    pub fn float_vector(name: impl Into<String>, v: Point2D) -> Self {
        Self::new(name, Value::FloatVector(v))
    }

    /// Builder: numeric bounds. The current value is clamped into them.
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.constraints.min = Some(min);
        self.constraints.max = Some(max);
        self.value = self.constrain(self.value.clone());
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self.value = self.constrain(self.value.clone());
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.constraints.step = Some(step);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// The stored static value, ignoring any track.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn is_animated(&self) -> bool {
        self.track.as_ref().map(|t| !t.is_empty()).unwrap_or(false)
    }

    /// Effective value: the track's value at `frame` when both exist, the static value otherwise.
    pub fn value_at(&self, frame: Option<i32>) -> Value {
        match (&self.track, frame) {
            (Some(track), Some(frame)) => track
                .evaluate(frame)
                .map(|v| self.constrain(v))
                .unwrap_or_else(|| self.value.clone()),
            _ => self.value.clone(),
        }
    }

    /// Clamp a value of the right kind into this property's constraints.
    pub fn constrain(&self, value: Value) -> Value {
        let c = &self.constraints;
        match value {
            Value::Integer(v) => Value::Integer(c.clamp_i64(v)),
            Value::Float(v) => Value::Float(c.clamp_f64(v)),
            Value::IntegerVector([x, y]) => Value::IntegerVector([c.clamp_i64(x), c.clamp_i64(y)]),
            Value::FloatVector(p) => {
                Value::FloatVector(Point2D::new(c.clamp_f64(p.x), c.clamp_f64(p.y)))
            }
            Value::Color(color) => Value::Color(color.clamped()),
            Value::Options(i) if !c.options.is_empty() => {
                Value::Options(i.min(c.options.len() - 1))
            }
            other => other,
        }
    }

    /// Type-check and clamp a candidate value without assigning it.
    pub fn coerce(&self, value: Value) -> SceneResult<Value> {
        if value.kind() != self.kind {
            return Err(SceneError::TypeMismatch {
                property: self.name.clone(),
                expected: self.kind,
                found: value.kind(),
            });
        }
        Ok(self.constrain(value))
    }

    /// Report (rather than clamp) a value outside the constraints.
    pub fn check_range(&self, value: &Value) -> SceneResult<()> {
        let clamped = self.constrain(value.clone());
        if &clamped != value {
            return Err(SceneError::OutOfRange {
                property: self.name.clone(),
                detail: format!("{} clamps to {}", value, clamped),
            });
        }
        Ok(())
    }

    /// Assign a value; returns whether the stored value changed.
    pub(crate) fn set(&mut self, value: Value) -> SceneResult<bool> {
        let value = self.coerce(value)?;
        if value == self.value {
            return Ok(false);
        }
        self.value = value;
        Ok(true)
    }

    /// Put back a value captured earlier from this property.
    pub(crate) fn restore(&mut self, value: Value) {
        self.value = value;
    }

    pub(crate) fn track_mut(&mut self) -> Option<&mut Track> {
        self.track.as_mut()
    }

    pub(crate) fn replace_track(&mut self, track: Option<Track>) -> Option<Track> {
        std::mem::replace(&mut self.track, track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::OwnerId;
    use crate::track::{Interpolation, Keyframe, PropertyPath};

    #[test]
    fn test_set_clamps_to_bounds() {
        let mut radius = Property::float("radius", 10.0).with_bounds(0.0, 1000.0);
        assert!(radius.set(Value::Float(1500.0)).unwrap());
        assert_eq!(radius.value(), &Value::Float(1000.0));
        assert!(radius.set(Value::Float(-3.0)).unwrap());
        assert_eq!(radius.value(), &Value::Float(0.0));
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut radius = Property::float("radius", 10.0);
        let err = radius.set(Value::Integer(3)).unwrap_err();
        assert!(matches!(err, SceneError::TypeMismatch { .. }));
        assert_eq!(radius.value(), &Value::Float(10.0));
    }

    #[test]
    fn test_set_same_value_reports_unchanged() {
        let mut p = Property::string("name", "ellipse");
        assert!(!p.set(Value::String("ellipse".into())).unwrap());
    }

    #[test]
    fn test_integer_vector_clamps_per_component() {
        let p = Property::integer_vector("grid", [10, 10]).with_bounds(1.0, 100.0);
        assert_eq!(
            p.coerce(Value::IntegerVector([0, 500])).unwrap(),
            Value::IntegerVector([1, 100])
        );
    }

    #[test]
    fn test_options_clamp_to_last() {
        let p = Property::options("pen_style", &["solid", "dashed"], 0);
        assert_eq!(p.coerce(Value::Options(7)).unwrap(), Value::Options(1));
    }

    #[test]
    fn test_non_finite_floats_land_inside_bounds() {
        let radius = Property::float("radius", 10.0).with_bounds(0.0, 1000.0);
        assert_eq!(radius.coerce(Value::Float(f64::NAN)).unwrap(), Value::Float(0.0));
        assert_eq!(radius.coerce(Value::Float(f64::INFINITY)).unwrap(), Value::Float(1000.0));

        let free = Property::float_vector("position", Point2D::zero());
        let candidate = Value::FloatVector(Point2D::new(f64::NAN, f64::NEG_INFINITY));
        let Value::FloatVector(p) = free.coerce(candidate).unwrap() else {
            panic!("expected a float vector");
        };
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, f64::MIN);
        assert!(free.check_range(&Value::FloatVector(p)).is_ok());
    }

    #[test]
    fn test_check_range_reports() {
        let p = Property::float("t", 0.0).with_bounds(0.0, 1.0);
        assert!(p.check_range(&Value::Float(0.5)).is_ok());
        assert!(matches!(
            p.check_range(&Value::Float(2.0)),
            Err(SceneError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_value_at_uses_track_and_clamps() {
        let mut p = Property::float("radius", 1.0).with_bounds(0.0, 5.0);
        let mut track = Track::new(
            PropertyPath::new(OwnerId(1), "radius"),
            PropertyKind::Float,
            Interpolation::Linear,
        );
        track.upsert(Keyframe::new(0, Value::Float(0.0))).unwrap();
        track.upsert(Keyframe::new(10, Value::Float(10.0))).unwrap();
        p.replace_track(Some(track));
        assert_eq!(p.value_at(Some(2)), Value::Float(2.0));
        assert_eq!(p.value_at(Some(8)), Value::Float(5.0));
        assert_eq!(p.value_at(None), Value::Float(1.0));
    }
}
