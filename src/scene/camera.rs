use crate::{math::matrix3::Matrix3, math::vector2::Vector2, surface::context::Surface};

/// Pan position and zoom of a scene.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vector2,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            zoom,
        }
    }

    /// Scale by zoom, then translate by position.
    pub fn matrix(&self) -> Matrix3 {
        let Vector2 { x, y } = self.position;
        Matrix3::make_scale(self.zoom, self.zoom).translate(x, y)
    }

    pub fn matrix_invert(&self) -> Matrix3 {
        self.matrix().invert()
    }

    /// Apply [`Camera::matrix_invert`] to a surface as two calls.
    ///
    /// The scale must come before the translate for the surface transform to equal the matrix.
    pub fn transform_invert(&self, surface: &mut dyn Surface) {
        let Vector2 { x, y } = self.position;
        surface.scale(1.0 / self.zoom, 1.0 / self.zoom);
        surface.translate(-x, -y);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
