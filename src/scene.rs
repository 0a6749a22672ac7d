pub mod camera;
pub mod graph;
mod group;
pub mod img;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;

pub use camera::Camera;
pub use graph::{GroupListener, SceneGraph};
pub use img::Img;
pub use node::{GroupChange, GroupEvent, GroupEventKind, Node, NodeId, NodeKind, NodeProperty};
pub use scene::SceneData;
