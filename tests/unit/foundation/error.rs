use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuadblitError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QuadblitError::unsupported_format("x")
            .to_string()
            .contains("unsupported raster format:")
    );
    assert!(
        QuadblitError::context_disposed("x")
            .to_string()
            .contains("context disposed:")
    );
    assert!(
        QuadblitError::degenerate_transform("x")
            .to_string()
            .contains("degenerate transform:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuadblitError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
