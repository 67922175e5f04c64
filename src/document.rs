//! Final hierarchy document model.
//!
//! Everything a consumer needs to rebuild the mesh's AMR structure: the
//! level table with refinement ratios and patch membership, and one entry
//! per patch with its level, rank, logical placement and immediate children.
//! Per-axis data is trimmed to the mesh dimensionality. All orderings follow
//! the catalog, so two passes over the same input serialize identically.

use crate::catalog::DomainCatalog;
use crate::extents::ExtentMap;
use crate::forest::Forest;
use crate::levels::LevelAssignment;
use crate::ratios::RatioTable;
use crate::types::DomainId;
use serde::Serialize;

/// One refinement level: its ratio against the level above (identity at the
/// coarsest level) and its member patches in catalog order.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelEntry {
    pub index: u32,
    pub ratio: Vec<u32>,
    pub patches: Vec<usize>,
}

/// One patch of the reconstructed hierarchy.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchEntry {
    /// Position in the document's patch list.
    pub index: usize,
    /// Identifier the backend knows this patch by.
    pub domain: DomainId,
    pub level: u32,
    pub rank: f64,
    pub logical_size: Vec<u32>,
    /// Inclusive per-axis `[lo, hi]` in the level's shared frame; absent
    /// when propagation could not determine it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_extent: Option<Vec<[i64; 2]>>,
    pub spatial_extent: Vec<[f64; 2]>,
    /// Immediate children as patch indices.
    pub children: Vec<usize>,
}

/// The reconstructed hierarchy for one mesh snapshot.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyDocument {
    pub mesh_name: String,
    pub dims: usize,
    pub level_count: usize,
    pub patch_count: usize,
    pub levels: Vec<LevelEntry>,
    pub patches: Vec<PatchEntry>,
}

impl HierarchyDocument {
    /// Deterministic JSON rendering; handy for exporters and comparisons.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Assemble the document from the finished stage outputs.
pub(crate) fn build_document(
    mesh_name: &str,
    catalog: &DomainCatalog,
    forest: &Forest,
    assignment: &LevelAssignment,
    ratios: &RatioTable,
    extents: &ExtentMap,
) -> HierarchyDocument {
    let dims = catalog.dims();
    let n = catalog.len();

    let levels = (0..assignment.level_count() as u32)
        .map(|level| LevelEntry {
            index: level,
            ratio: ratios.level_ratio(level)[..dims].to_vec(),
            patches: (0..n).filter(|&d| assignment.levels[d] == level).collect(),
        })
        .collect();

    let patches = (0..n)
        .map(|d| {
            let domain = catalog.domain(d);
            let logical_extent = extents.extents[d].map(|extent| {
                (0..dims)
                    .map(|axis| [extent.lo[axis], extent.hi[axis]])
                    .collect()
            });
            PatchEntry {
                index: d,
                domain: domain.id,
                level: assignment.levels[d],
                rank: domain.rank,
                logical_size: domain.zones[..dims].to_vec(),
                logical_extent,
                spatial_extent: (0..dims)
                    .map(|axis| [domain.bounds.min[axis], domain.bounds.max[axis]])
                    .collect(),
                children: forest.children[d].clone(),
            }
        })
        .collect();

    HierarchyDocument {
        mesh_name: mesh_name.to_string(),
        dims,
        level_count: assignment.level_count(),
        patch_count: n,
        levels,
        patches,
    }
}
