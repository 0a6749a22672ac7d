use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::math::matrix3::Matrix3;

/// Mutable 2D vector with value semantics.
///
/// The in-place operations return `&mut Self` so calls can be chained; use `Copy`/`clone`
/// (or the operator impls) when an independent value is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn set_scalar(&mut self, v: f64) -> &mut Self {
        self.set(v, v)
    }

    pub fn copy_from(&mut self, other: Vector2) -> &mut Self {
        self.set(other.x, other.y)
    }

    pub fn add_vector(&mut self, other: Vector2) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    pub fn sub_vector(&mut self, other: Vector2) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    /// Store `a - b` into `self`.
    pub fn sub_vectors(&mut self, a: Vector2, b: Vector2) -> &mut Self {
        self.set(a.x - b.x, a.y - b.y)
    }

    /// Component-wise product.
    pub fn multiply(&mut self, other: Vector2) -> &mut Self {
        self.x *= other.x;
        self.y *= other.y;
        self
    }

    pub fn multiply_scalar(&mut self, s: f64) -> &mut Self {
        self.x *= s;
        self.y *= s;
        self
    }

    /// Transform this vector as a point (translation included).
    pub fn apply_matrix3(&mut self, m: &Matrix3) -> &mut Self {
        let [a, b, c, d, e, f] = m.elements();
        let (x, y) = (self.x, self.y);
        self.set(a * x + c * y + e, b * x + d * y + f)
    }

    /// Angle to the positive x axis, in `[0, 2π)`.
    pub fn angle(&self) -> f64 {
        (-self.y).atan2(-self.x) + std::f64::consts::PI
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn approx_eq(&self, other: Vector2, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }

    pub fn to_point(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.add_vector(rhs);
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.sub_vector(rhs);
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl From<kurbo::Point> for Vector2 {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<kurbo::Vec2> for Vector2 {
    fn from(v: kurbo::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for kurbo::Vec2 {
    fn from(v: Vector2) -> Self {
        kurbo::Vec2::new(v.x, v.y)
    }
}

impl From<Vector2> for kurbo::Point {
    fn from(v: Vector2) -> Self {
        v.to_point()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/math/vector2.rs"]
mod tests;
