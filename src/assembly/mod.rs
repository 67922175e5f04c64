//! Shared coarse-level index space for multi-root meshes.
//!
//! When several patches attain the maximum height there is no single parent
//! frame to anchor logical extents in, so one is rebuilt from geometry:
//!
//! - `faces` quantizes each root's face corner point-sets so adjacency can
//!   be decided by exact equality despite floating-point noise.
//! - `walk` turns the face-adjacency graph into per-root logical offsets:
//!   it walks to the west/south/back-most root, then sweeps outward
//!   accumulating zone counts, and validates that the placed roots tile one
//!   box with no gaps or overlaps.
//!
//! Imperfect tilings and roots the walk cannot reach degrade to warnings and
//! best-effort extents; only the diagnostics record the defect.

mod faces;
mod walk;

use crate::catalog::DomainCatalog;
use crate::types::LogicalExtent;
use log::{debug, warn};

/// Logical placement of every coarsest-level root.
#[derive(Clone, Debug)]
pub struct RootLayout {
    /// Extents keyed by catalog position, parallel to `roots`.
    pub extents: Vec<(usize, LogicalExtent)>,
    /// Catalog position of the index-space origin root.
    pub origin: usize,
    /// Number of shared faces detected among the roots.
    pub adjacency_count: usize,
    /// Whether the placed roots tile one box exactly.
    pub tiling_ok: bool,
    /// Roots disconnected from the origin's component, placed at the frame
    /// origin as a fallback.
    pub unplaced: Vec<usize>,
}

impl RootLayout {
    pub fn extent_of(&self, position: usize) -> Option<&LogicalExtent> {
        self.extents
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, e)| e)
    }
}

/// Reconstruct the shared coarse index space from pairwise face adjacency.
///
/// `roots` are catalog positions in catalog order; `precision_decimals`
/// controls the corner quantization used for face matching.
pub fn assemble_global_index(
    catalog: &DomainCatalog,
    roots: &[usize],
    precision_decimals: u32,
) -> RootLayout {
    let dims = catalog.dims();
    let (neighbors, adjacency_count) =
        walk::face_adjacency(catalog, roots, dims, precision_decimals);
    let origin_local = walk::find_origin(&neighbors, dims);
    let placement = walk::accumulate_offsets(catalog, roots, &neighbors, origin_local, dims);

    let mut extents = Vec::with_capacity(roots.len());
    let mut unplaced = Vec::new();
    for (local, &position) in roots.iter().enumerate() {
        let zones = catalog.domain(position).zones;
        match placement.offsets[local] {
            Some(offset) => {
                let mut extent = LogicalExtent::from_size(zones);
                for axis in 0..dims {
                    extent.lo[axis] = offset[axis];
                    extent.hi[axis] = offset[axis] + i64::from(zones[axis]) - 1;
                }
                extents.push((position, extent));
            }
            None => {
                warn!(
                    "assembly: {} shares no face chain with the origin root",
                    catalog.domain(position).id
                );
                unplaced.push(position);
                extents.push((position, LogicalExtent::from_size(zones)));
            }
        }
    }

    let tiling_ok =
        unplaced.is_empty() && !placement.conflicted && walk::tiles_exactly(&extents, dims);
    if !tiling_ok {
        warn!(
            "assembly: root placement does not tile exactly (roots={} unplaced={})",
            roots.len(),
            unplaced.len()
        );
    }
    debug!(
        "assembly: roots={} shared_faces={} origin={} tiling_ok={}",
        roots.len(),
        adjacency_count,
        catalog.domain(roots[origin_local]).id,
        tiling_ok
    );

    RootLayout {
        extents,
        origin: roots[origin_local],
        adjacency_count,
        tiling_ok,
        unplaced,
    }
}
