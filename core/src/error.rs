//! Error types for height-field generation and region classification.

/// Everything that can go wrong while generating or classifying terrain.
///
/// All variants are deterministic functions of the input: retrying the same
/// call with the same arguments produces the same error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// Grid width or height is zero.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// `width * height` cells of `f64` cannot be allocated.
    #[error("grid of {width}x{height} cells is too large")]
    GridTooLarge { width: usize, height: usize },

    /// A raw field's buffer length does not match its declared dimensions.
    #[error("field declared as {width}x{height} holds {len} values")]
    FieldShapeMismatch {
        width: usize,
        height: usize,
        len: usize,
    },

    /// A real-valued parameter was NaN or infinite.
    #[error("parameter `{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// Falloff shaping exponent must be strictly positive.
    #[error("falloff exponent must be positive, got {0}")]
    InvalidFalloffExponent(f64),

    /// A region table without entries cannot classify anything.
    #[error("region table is empty")]
    EmptyRegionTable,

    /// Two regions in one table share a name.
    #[error("region name `{0}` appears more than once")]
    DuplicateRegion(String),

    /// Region threshold is outside [0, 1] or not a number.
    #[error("region `{name}` has threshold {threshold} outside [0, 1]")]
    ThresholdOutOfRange { name: String, threshold: f64 },

    /// No region threshold reaches the queried height.
    #[error("no region covers height {height}")]
    UnmatchedRegion { height: f64 },

    /// Generation was stopped through a [`crate::Cancellation`] handle.
    #[error("generation cancelled")]
    Cancelled,
}

impl TerrainError {
    /// True for misuse reported before any sampling or classification starts.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TerrainError::InvalidDimensions { .. }
                | TerrainError::GridTooLarge { .. }
                | TerrainError::FieldShapeMismatch { .. }
                | TerrainError::NonFinite { .. }
                | TerrainError::InvalidFalloffExponent(_)
                | TerrainError::EmptyRegionTable
                | TerrainError::DuplicateRegion(_)
                | TerrainError::ThresholdOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;
