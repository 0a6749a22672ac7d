pub mod config;
pub mod controller;
#[allow(clippy::module_inception)]
pub mod editor;
pub mod input;

pub use config::{EditorConfig, EffectLayer, EffectSource};
pub use controller::{
    ControlEvent, ControlEventKind, ControlListener, GlyphAnchor, LayerController, NullController,
};
pub use editor::{Editor, EditorSurfaces};
pub use input::{Cursor, KeyInput, PointerInput, WheelInput};
