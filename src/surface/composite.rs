use vello_cpu::peniko::{BlendMode, Compose, Mix};

use crate::surface::context::CompositeOperation;

/// The `vello_cpu` layer blend that reproduces a canvas composite operation.
pub(crate) fn blend_mode(op: CompositeOperation) -> BlendMode {
    use CompositeOperation as Op;

    let compose = |c: Compose| BlendMode::new(Mix::Normal, c);
    match op {
        Op::SourceOver => compose(Compose::SrcOver),
        Op::SourceIn => compose(Compose::SrcIn),
        Op::SourceOut => compose(Compose::SrcOut),
        Op::SourceAtop => compose(Compose::SrcAtop),
        Op::DestinationOver => compose(Compose::DestOver),
        Op::DestinationIn => compose(Compose::DestIn),
        Op::DestinationOut => compose(Compose::DestOut),
        Op::DestinationAtop => compose(Compose::DestAtop),
        Op::Lighter => compose(Compose::Plus),
        Op::Copy => compose(Compose::Copy),
        Op::Xor => compose(Compose::Xor),
        Op::Multiply => BlendMode::new(Mix::Multiply, Compose::SrcOver),
        Op::Screen => BlendMode::new(Mix::Screen, Compose::SrcOver),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/composite.rs"]
mod tests;
