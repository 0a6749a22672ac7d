pub mod mouse_shape;
pub mod orbit;

pub use mouse_shape::{CursorGlyph, MouseShape};
pub use orbit::{
    OrbitController, OrbitEvent, OrbitEventKind, OrbitListener, OrbitOptions, OrbitState,
};
