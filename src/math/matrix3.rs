use std::ops::Mul;

use kurbo::{Affine, Vec2};

/// 2D affine transform stored as a 3×3 matrix with an implicit `[0 0 1]` last row.
///
/// The chained builders (`scale`, `rotate`, `translate`) premultiply: each call is applied
/// to points *after* the transforms already in the matrix, so
/// `Matrix3::new().scale(..).rotate(..).translate(..)` scales first and translates last.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3(Affine);

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    pub const IDENTITY: Self = Self(Affine::IDENTITY);

    pub fn new() -> Self {
        Self::IDENTITY
    }

    /// Build from kurbo-ordered coefficients `[a, b, c, d, e, f]`.
    pub fn from_elements(elements: [f64; 6]) -> Self {
        Self(Affine::new(elements))
    }

    pub fn make_scale(sx: f64, sy: f64) -> Self {
        Self(Affine::scale_non_uniform(sx, sy))
    }

    pub fn make_translation(x: f64, y: f64) -> Self {
        Self(Affine::translate(Vec2::new(x, y)))
    }

    pub fn make_rotation(theta: f64) -> Self {
        Self(Affine::rotate(theta))
    }

    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.premultiply(Self::make_scale(sx, sy))
    }

    pub fn rotate(self, theta: f64) -> Self {
        self.premultiply(Self::make_rotation(theta))
    }

    pub fn translate(self, x: f64, y: f64) -> Self {
        self.premultiply(Self::make_translation(x, y))
    }

    /// `self * other`: `other` is applied to points first.
    pub fn multiply(self, other: Matrix3) -> Self {
        Self(self.0 * other.0)
    }

    /// `other * self`: `other` is applied to points last.
    pub fn premultiply(self, other: Matrix3) -> Self {
        Self(other.0 * self.0)
    }

    pub fn multiply_matrices(a: Matrix3, b: Matrix3) -> Self {
        a.multiply(b)
    }

    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Exact algebraic inverse. A singular matrix yields the zero matrix.
    pub fn invert(self) -> Self {
        if self.determinant() == 0.0 {
            return Self(Affine::new([0.0; 6]));
        }
        Self(self.0.inverse())
    }

    /// Coefficients `[a, b, c, d, e, f]` mapping `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`.
    pub fn elements(&self) -> [f64; 6] {
        self.0.as_coeffs()
    }

    pub fn to_affine(self) -> Affine {
        self.0
    }

    pub fn approx_eq(&self, other: &Matrix3, eps: f64) -> bool {
        self.elements()
            .iter()
            .zip(other.elements().iter())
            .all(|(l, r)| (l - r).abs() <= eps)
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        self.multiply(rhs)
    }
}

impl From<Affine> for Matrix3 {
    fn from(a: Affine) -> Self {
        Self(a)
    }
}

impl From<Matrix3> for Affine {
    fn from(m: Matrix3) -> Self {
        m.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/math/matrix3.rs"]
mod tests;
