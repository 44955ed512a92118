pub type Result<T> = std::result::Result<T, LayoutError>;

/// Failures surfaced by the layout adapter.
///
/// Layout failure is recoverable: callers keep the previously applied
/// arrangement and report the error upward. It is never fatal to the
/// hosting session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LayoutError {
    #[error("layout engine failed: {message}")]
    Engine { message: String },

    #[error("layout result is missing a position for node `{id}`")]
    MissingPosition { id: String },

    #[error("layout produced a non-finite coordinate for node `{id}`")]
    NonFiniteCoordinate { id: String },
}
