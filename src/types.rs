use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Highest spatial dimensionality handled by the engine. Two-dimensional
/// meshes collapse the third axis to a single zone and a degenerate extent.
pub const MAX_DIMS: usize = 3;

/// Identifier assigned to a patch by the mesh query backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(pub u32);

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "domain#{}", self.0)
    }
}

/// Structured-grid flavour reported by the backend for each patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshKind {
    Rectilinear,
    Curvilinear,
}

/// Axis-aligned spatial bounding box. Axes beyond the mesh dimensionality
/// carry a degenerate `[0, 0]` interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialBounds {
    pub min: [f64; MAX_DIMS],
    pub max: [f64; MAX_DIMS],
}

impl SpatialBounds {
    pub fn span(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    /// Product of spans over the first `dims` axes.
    pub fn measure(&self, dims: usize) -> f64 {
        (0..dims).map(|a| self.span(a)).product()
    }

    /// Strict-interior intersection test: boxes that only touch at a
    /// boundary do not overlap.
    pub fn strictly_overlaps(&self, other: &SpatialBounds, dims: usize) -> bool {
        (0..dims).all(|a| self.min[a] < other.max[a] && other.min[a] < self.max[a])
    }

    /// Component-wise intersection, `None` when the interiors are disjoint.
    pub fn intersection(&self, other: &SpatialBounds, dims: usize) -> Option<SpatialBounds> {
        if !self.strictly_overlaps(other, dims) {
            return None;
        }
        let mut min = [0.0; MAX_DIMS];
        let mut max = [0.0; MAX_DIMS];
        for a in 0..dims {
            min[a] = self.min[a].max(other.min[a]);
            max[a] = self.max[a].min(other.max[a]);
        }
        Some(SpatialBounds { min, max })
    }

    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        )
    }

    pub fn min_corner(&self) -> Point3<f64> {
        Point3::new(self.min[0], self.min[1], self.min[2])
    }

    pub fn max_corner(&self) -> Point3<f64> {
        Point3::new(self.max[0], self.max[1], self.max[2])
    }

    pub fn contains(&self, p: &Point3<f64>, dims: usize) -> bool {
        (0..dims).all(|a| self.min[a] <= p[a] && p[a] <= self.max[a])
    }
}

/// Inclusive per-axis index range a patch occupies in its level's shared
/// logical frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalExtent {
    pub lo: [i64; MAX_DIMS],
    pub hi: [i64; MAX_DIMS],
}

impl LogicalExtent {
    /// Extent of a patch anchored at the frame origin.
    pub fn from_size(zones: [u32; MAX_DIMS]) -> Self {
        Self {
            lo: [0; MAX_DIMS],
            hi: [
                i64::from(zones[0]) - 1,
                i64::from(zones[1]) - 1,
                i64::from(zones[2]) - 1,
            ],
        }
    }

    pub fn zones(&self, axis: usize) -> i64 {
        self.hi[axis] - self.lo[axis] + 1
    }
}

/// Per-axis integer refinement ratio between two consecutive levels.
pub type RefinementRatio = [u32; MAX_DIMS];

/// Ratio of a level against itself, reported for the coarsest level.
pub const IDENTITY_RATIO: RefinementRatio = [1, 1, 1];
