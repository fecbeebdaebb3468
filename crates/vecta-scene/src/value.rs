use serde::{Deserialize, Serialize};
use vecta_core::{Color, Point2D};

use crate::owner::OwnerId;

/// The closed set of property kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Bool,
    Integer,
    Float,
    String,
    Color,
    Options,
    Reference,
    Trigger,
    IntegerVector,
    FloatVector,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 10] = [
        PropertyKind::Bool,
        PropertyKind::Integer,
        PropertyKind::Float,
        PropertyKind::String,
        PropertyKind::Color,
        PropertyKind::Options,
        PropertyKind::Reference,
        PropertyKind::Trigger,
        PropertyKind::IntegerVector,
        PropertyKind::FloatVector,
    ];

    /// Whether a track may be attached to a property of this kind.
    pub fn is_animatable(self) -> bool {
        !matches!(self, PropertyKind::Reference | PropertyKind::Trigger)
    }

    /// Whether values of this kind blend between keyframes. Other animatable
    /// kinds always step.
    pub fn is_interpolable(self) -> bool {
        self.component_count() > 0
    }

    /// Whether numeric bounds apply to this kind (per component for vectors).
    pub fn is_bounded(self) -> bool {
        matches!(
            self,
            PropertyKind::Integer
                | PropertyKind::Float
                | PropertyKind::IntegerVector
                | PropertyKind::FloatVector
        )
    }

    /// Number of f64 components a value of this kind decomposes into.
    pub fn component_count(self) -> usize {
        match self {
            PropertyKind::Integer | PropertyKind::Float => 1,
            PropertyKind::IntegerVector | PropertyKind::FloatVector => 2,
            PropertyKind::Color => 4,
            _ => 0,
        }
    }

    pub fn default_value(self) -> Value {
        match self {
            PropertyKind::Bool => Value::Bool(false),
            PropertyKind::Integer => Value::Integer(0),
            PropertyKind::Float => Value::Float(0.0),
            PropertyKind::String => Value::String(String::new()),
            PropertyKind::Color => Value::Color(Color::BLACK),
            PropertyKind::Options => Value::Options(0),
            PropertyKind::Reference => Value::Reference(None),
            PropertyKind::Trigger => Value::Trigger,
            PropertyKind::IntegerVector => Value::IntegerVector([0, 0]),
            PropertyKind::FloatVector => Value::FloatVector(Point2D::zero()),
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PropertyKind::Bool => "bool",
            PropertyKind::Integer => "integer",
            PropertyKind::Float => "float",
            PropertyKind::String => "string",
            PropertyKind::Color => "color",
            PropertyKind::Options => "options",
            PropertyKind::Reference => "reference",
            PropertyKind::Trigger => "trigger",
            PropertyKind::IntegerVector => "integer_vector",
            PropertyKind::FloatVector => "float_vector",
        };
        write!(f, "{}", name)
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Color(Color),
    /// Index into the property's option list.
    Options(usize),
    Reference(Option<OwnerId>),
    Trigger,
    IntegerVector([i64; 2]),
    FloatVector(Point2D),
}

impl Value {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Value::Bool(_) => PropertyKind::Bool,
            Value::Integer(_) => PropertyKind::Integer,
            Value::Float(_) => PropertyKind::Float,
            Value::String(_) => PropertyKind::String,
            Value::Color(_) => PropertyKind::Color,
            Value::Options(_) => PropertyKind::Options,
            Value::Reference(_) => PropertyKind::Reference,
            Value::Trigger => PropertyKind::Trigger,
            Value::IntegerVector(_) => PropertyKind::IntegerVector,
            Value::FloatVector(_) => PropertyKind::FloatVector,
        }
    }

    /// Decompose into f64 components; empty for non-interpolable kinds.
    pub fn components(&self) -> Vec<f64> {
        match self {
            Value::Integer(v) => vec![*v as f64],
            Value::Float(v) => vec![*v],
            Value::IntegerVector([x, y]) => vec![*x as f64, *y as f64],
            Value::FloatVector(p) => vec![p.x, p.y],
            Value::Color(c) => c.components().to_vec(),
            _ => Vec::new(),
        }
    }

    /// Rebuild a value of `kind` from components. Integers round half away from zero.
    pub fn from_components(kind: PropertyKind, c: &[f64]) -> Option<Value> {
        if c.len() != kind.component_count() || c.is_empty() {
            return None;
        }
        Some(match kind {
            PropertyKind::Integer => Value::Integer(c[0].round() as i64),
            PropertyKind::Float => Value::Float(c[0]),
            PropertyKind::IntegerVector => {
                Value::IntegerVector([c[0].round() as i64, c[1].round() as i64])
            }
            PropertyKind::FloatVector => Value::FloatVector(Point2D::new(c[0], c[1])),
            PropertyKind::Color => Value::Color(Color::from_components([c[0], c[1], c[2], c[3]])),
            _ => return None,
        })
    }

    /// Linear blend towards `other`. Non-interpolable kinds (and mismatched
    /// kinds) hold `self`.
    pub fn lerp(&self, other: &Value, t: f64) -> Value {
        if self.kind() != other.kind() || !self.kind().is_interpolable() {
            return self.clone();
        }
        let a = self.components();
        let b = other.components();
        let blended: Vec<f64> = a.iter().zip(&b).map(|(x, y)| x + (y - x) * t).collect();
        Value::from_components(self.kind(), &blended).unwrap_or_else(|| self.clone())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_option_index(&self) -> Option<usize> {
        match self {
            Value::Options(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point2D> {
        match self {
            Value::FloatVector(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_int_vector(&self) -> Option<[i64; 2]> {
        match self {
            Value::IntegerVector(v) => Some(*v),
            _ => None,
        }
    }

    /// The referenced owner, if this is a set reference.
    pub fn as_reference(&self) -> Option<OwnerId> {
        match self {
            Value::Reference(r) => *r,
            _ => None,
        }
    }

    /// Interpret a loosely typed JSON value as a value of `kind`.
    ///
    /// Accepts the natural JSON shape for each kind: numbers, `[x, y]` arrays,
    /// `"#RRGGBB"` or `[r, g, b, a]` colors, owner ids as integers, `null` for
    /// an empty reference.
    pub fn from_json(kind: PropertyKind, json: &serde_json::Value) -> Option<Value> {
        use serde_json::Value as J;
        let pair = |j: &J| -> Option<(f64, f64)> {
            let arr = j.as_array()?;
            if arr.len() != 2 {
                return None;
            }
            Some((arr[0].as_f64()?, arr[1].as_f64()?))
        };
        match kind {
            PropertyKind::Bool => json.as_bool().map(Value::Bool),
            PropertyKind::Integer => json.as_i64().map(Value::Integer),
            PropertyKind::Float => json.as_f64().map(Value::Float),
            PropertyKind::String => json.as_str().map(|s| Value::String(s.to_string())),
            PropertyKind::Options => json.as_u64().map(|i| Value::Options(i as usize)),
            PropertyKind::Trigger => Some(Value::Trigger),
            PropertyKind::Reference => match json {
                J::Null => Some(Value::Reference(None)),
                other => other.as_u64().map(|id| Value::Reference(Some(OwnerId(id)))),
            },
            PropertyKind::Color => match json {
                J::String(s) => Color::from_hex(s).ok().map(Value::Color),
                J::Array(arr) if arr.len() == 4 => {
                    let c: Option<Vec<f64>> = arr.iter().map(|v| v.as_f64()).collect();
                    c.map(|c| Value::Color(Color::from_components([c[0], c[1], c[2], c[3]])))
                }
                _ => None,
            },
            PropertyKind::IntegerVector => {
                let arr = json.as_array()?;
                if arr.len() != 2 {
                    return None;
                }
                Some(Value::IntegerVector([arr[0].as_i64()?, arr[1].as_i64()?]))
            }
            PropertyKind::FloatVector => pair(json).map(|(x, y)| Value::FloatVector(Point2D::new(x, y))),
        }
    }

    /// The natural JSON shape of this value; inverse of [`Value::from_json`].
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            Value::Bool(v) => json!(v),
            Value::Integer(v) => json!(v),
            Value::Float(v) => json!(v),
            Value::String(s) => json!(s),
            Value::Color(c) => json!([c.r, c.g, c.b, c.a]),
            Value::Options(i) => json!(i),
            Value::Reference(r) => match r {
                Some(id) => json!(id.0),
                None => serde_json::Value::Null,
            },
            Value::Trigger => serde_json::Value::Null,
            Value::IntegerVector([x, y]) => json!([x, y]),
            Value::FloatVector(p) => json!([p.x, p.y]),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Color(c) => write!(f, "{}", c),
            Value::Options(i) => write!(f, "option {}", i),
            Value::Reference(Some(id)) => write!(f, "-> {}", id),
            Value::Reference(None) => write!(f, "-> none"),
            Value::Trigger => write!(f, "trigger"),
            Value::IntegerVector([x, y]) => write!(f, "({}, {})", x, y),
            Value::FloatVector(p) => write!(f, "({}, {})", p.x, p.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_default_matches() {
        for kind in PropertyKind::ALL {
            assert_eq!(kind.default_value().kind(), kind);
        }
    }

    #[test]
    fn test_capabilities() {
        assert!(PropertyKind::Float.is_interpolable());
        assert!(PropertyKind::Bool.is_animatable());
        assert!(!PropertyKind::Bool.is_interpolable());
        assert!(!PropertyKind::Reference.is_animatable());
        assert!(!PropertyKind::Trigger.is_animatable());
        assert!(!PropertyKind::Color.is_bounded());
    }

    #[test]
    fn test_integer_lerp_rounds() {
        let v = Value::Integer(0).lerp(&Value::Integer(3), 0.5);
        assert_eq!(v, Value::Integer(2));
        let v = Value::Integer(0).lerp(&Value::Integer(-3), 0.5);
        assert_eq!(v, Value::Integer(-2));
    }

    #[test]
    fn test_step_kinds_hold() {
        let a = Value::String("a".into());
        assert_eq!(a.lerp(&Value::String("b".into()), 0.9), a);
        assert_eq!(Value::Bool(true).lerp(&Value::Float(1.0), 0.5), Value::Bool(true));
    }

    #[test]
    fn test_from_json_shapes() {
        use serde_json::json;
        assert_eq!(
            Value::from_json(PropertyKind::FloatVector, &json!([1.0, 2.5])),
            Some(Value::FloatVector(Point2D::new(1.0, 2.5)))
        );
        assert_eq!(
            Value::from_json(PropertyKind::Reference, &json!(null)),
            Some(Value::Reference(None))
        );
        assert_eq!(
            Value::from_json(PropertyKind::Color, &json!("#FF0000")),
            Some(Value::Color(Color::RED))
        );
        assert_eq!(Value::from_json(PropertyKind::Integer, &json!("7")), None);
        assert_eq!(Value::from_json(PropertyKind::IntegerVector, &json!([1])), None);
    }

    #[test]
    fn test_json_round_trip_shape() {
        let v = Value::IntegerVector([4, -2]);
        assert_eq!(Value::from_json(v.kind(), &v.to_json()), Some(v));
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Value::Float(1.5)).unwrap();
        assert_eq!(json, r#"{"kind":"float","value":1.5}"#);
        let trigger = serde_json::to_string(&Value::Trigger).unwrap();
        let back: Value = serde_json::from_str(&trigger).unwrap();
        assert_eq!(back, Value::Trigger);
    }
}
