//! Shared types for the linework simplification crate.

use serde::{Deserialize, Serialize};

/// Errors that can occur during simplification.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SimplifyError {
    /// The distance tolerance was negative.
    ///
    /// Zero is valid (it removes only exactly-redundant vertices); a
    /// negative deviation bound has no meaning.
    #[error("distance tolerance must be non-negative, got {0}")]
    NegativeTolerance(f64),
}

/// Configuration for the distance and area geometry drivers.
///
/// The topology-preserving driver takes a tolerance only; it has no
/// repair step because its output is crossing-free by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplifyConfig {
    /// Maximum allowed perpendicular deviation of the simplified line
    /// from the original, in coordinate units. For the area driver this
    /// is squared internally and compared against effective triangle
    /// areas.
    pub tolerance: f64,

    /// Whether to repair polygonal output whose rings became
    /// self-intersecting during simplification. The repair dissolves
    /// crossings by re-noding the polygon against itself; it can split
    /// one polygon into several.
    pub ensure_valid: bool,
}

impl SimplifyConfig {
    /// Create a configuration with the given tolerance and repair
    /// enabled.
    #[must_use]
    pub const fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            ensure_valid: true,
        }
    }
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Reject a negative tolerance before any processing starts.
pub(crate) fn check_tolerance(tolerance: f64) -> Result<(), SimplifyError> {
    if tolerance < 0.0 {
        return Err(SimplifyError::NegativeTolerance(tolerance));
    }
    Ok(())
}
