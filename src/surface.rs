pub(crate) mod blur;
pub(crate) mod composite;
pub mod context;
pub mod cpu;
pub mod recording;
mod state;

pub use context::{CompositeOperation, Shadow, Surface, View};
pub use cpu::CpuSurface;
pub use recording::{RecordingSurface, SurfaceOp};
