use larder::{LarderError, MealSlot, Result};

#[test]
fn test_error_display() {
    let err = LarderError::UnknownMealSlot("brunch".to_string());
    assert!(err.to_string().contains("brunch"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(LarderError::Storage("down".into()))
    }
    assert!(returns_error().is_err());
}

#[test]
fn json_errors_convert() {
    fn parse() -> Result<MealSlot> {
        Ok(serde_json::from_str("\"brunch\"")?)
    }
    assert!(matches!(parse(), Err(LarderError::Json(_))));
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(LarderError::Storage("timeout".into()).is_transient());
    assert!(
        LarderError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow")).is_transient()
    );
}

#[test]
fn non_transient_errors() {
    assert!(!LarderError::UnknownMealSlot("brunch".into()).is_transient());
    assert!(!LarderError::Configuration("bad".into()).is_transient());
    assert!(!LarderError::Generation("nope".into()).is_transient());
    assert!(!LarderError::InvalidInput("x".into()).is_transient());
}
