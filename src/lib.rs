//! Stamp is a 2D scene graph and compositing engine for product mockup previews.
//!
//! The crate is organized around one arena:
//!
//! - Build a [`SceneGraph`] of groups, images and scenes
//! - Render scenes to a [`Surface`] ([`CpuSurface`] rasterizes, [`RecordingSurface`] logs)
//! - Drive an [`Editor`] that mirrors editable layers into result and effect scenes
#![forbid(unsafe_code)]

pub mod assets;
/// Camera and cursor controllers.
pub mod control;
/// Layer editor and its sync protocol.
pub mod editor;
pub mod events;
pub mod foundation;
pub mod math;
/// Scene graph: nodes, groups, images, scenes and cameras.
pub mod scene;
/// Drawing contexts and CPU compositing.
pub mod surface;

pub use crate::foundation::core::{Affine, BezPath, Color, Point, Rect, Vec2};
pub use crate::foundation::error::{StampError, StampResult};

pub use crate::assets::image::{Bitmap, ImageResource, LoadState};
pub use crate::assets::loader::AssetLoader;
pub use crate::control::{CursorGlyph, MouseShape, OrbitController, OrbitOptions};
pub use crate::editor::{
    ControlEvent, Cursor, Editor, EditorConfig, EditorSurfaces, KeyInput, LayerController,
    NullController, PointerInput, WheelInput,
};
pub use crate::events::dispatcher::{Event, EventDispatcher, Listener, listener};
pub use crate::math::{matrix3::Matrix3, vector2::Vector2};
pub use crate::scene::{Camera, GroupEvent, Img, Node, NodeId, SceneData, SceneGraph};
pub use crate::surface::{CompositeOperation, CpuSurface, RecordingSurface, Surface};
