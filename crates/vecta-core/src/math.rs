use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point or offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (*other - *self).length()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(&self) -> Point2D {
        let len = self.length();
        if len == 0.0 {
            Point2D::zero()
        } else {
            Point2D::new(self.x / len, self.y / len)
        }
    }

    /// Linear interpolation between two points.
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        self.lerp(other, 0.5)
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;
    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2D {
    type Output = Point2D;
    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

/// A 2D affine transform built from translation, scale and rotation.
///
/// Points are scaled first, then rotated about the origin, then translated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub translation: Point2D,
    pub scale: Point2D,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f64,
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            translation: Point2D::zero(),
            scale: Point2D::new(1.0, 1.0),
            rotation: 0.0,
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translation: Point2D::new(x, y),
            ..Self::identity()
        }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            scale: Point2D::new(sx, sy),
            ..Self::identity()
        }
    }

    pub fn rotating(degrees: f64) -> Self {
        Self {
            rotation: degrees,
            ..Self::identity()
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Apply only the linear part (scale and rotation). Used for tangent offsets.
    pub fn apply_vector(&self, v: Point2D) -> Point2D {
        let sx = v.x * self.scale.x;
        let sy = v.y * self.scale.y;
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Point2D::new(sx * cos - sy * sin, sx * sin + sy * cos)
    }

    pub fn apply_point(&self, p: Point2D) -> Point2D {
        self.apply_vector(p) + self.translation
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
