//! Parameter types configuring the reconstruction stages.
//!
//! Defaults reproduce the behaviour expected of AMR-like source data at
//! common scales. For tuning, start with the face precision (too coarse and
//! distinct roots fuse, too fine and real neighbors stop matching) and the
//! confirmation threshold.

use serde::Deserialize;

/// Engine-wide parameters controlling the multi-stage pipeline.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ReconstructOptions {
    /// Indicator maximum a cross-mesh evaluation must exceed before a
    /// curvilinear candidate overlap counts as confirmed.
    pub confirm_threshold: f64,
    /// Decimal places kept when quantizing face corners for root adjacency
    /// matching; absorbs floating-point noise from the source format.
    pub face_precision_decimals: u32,
    /// Fraction of a parent cell used to pull extent probes off patch
    /// boundaries before point location.
    pub interior_clamp: f64,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            confirm_threshold: 0.5,
            face_precision_decimals: 6,
            interior_clamp: 0.25,
        }
    }
}
