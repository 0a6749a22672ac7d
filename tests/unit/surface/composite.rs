use super::*;

#[test]
fn porter_duff_operators_map_to_compose_modes() {
    let cases = [
        (CompositeOperation::SourceOver, Compose::SrcOver),
        (CompositeOperation::SourceIn, Compose::SrcIn),
        (CompositeOperation::DestinationIn, Compose::DestIn),
        (CompositeOperation::DestinationOver, Compose::DestOver),
        (CompositeOperation::Lighter, Compose::Plus),
        (CompositeOperation::Copy, Compose::Copy),
        (CompositeOperation::Xor, Compose::Xor),
    ];
    for (op, expected) in cases {
        let mode = blend_mode(op);
        assert_eq!(mode.compose, expected, "{op:?}");
        assert_eq!(mode.mix, Mix::Normal, "{op:?}");
    }
}

#[test]
fn separable_blends_composite_source_over() {
    let multiply = blend_mode(CompositeOperation::Multiply);
    assert_eq!((multiply.mix, multiply.compose), (Mix::Multiply, Compose::SrcOver));
    let screen = blend_mode(CompositeOperation::Screen);
    assert_eq!((screen.mix, screen.compose), (Mix::Screen, Compose::SrcOver));
}
