use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StampError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StampError::graph("x").to_string().contains("graph error:"));
    assert!(StampError::asset("x").to_string().contains("asset error:"));
    assert!(StampError::render("x").to_string().contains("render error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StampError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_converts_with_question_mark() {
    fn fails() -> StampResult<()> {
        Err(anyhow::anyhow!("listener failed"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err, StampError::Other(_)));
    assert!(err.to_string().contains("listener failed"));
}
