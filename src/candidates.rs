//! Candidate parent/child edges from bounding-box interiors.
//!
//! Scans the catalog in rank order: each domain proposes every
//! subsequently-ordered (smaller-rank) domain whose bounding box shares
//! interior volume as a candidate descendant. Boxes touching only at a
//! boundary never count; abutting siblings must not become candidates. The
//! scan is O(n²) over the patch count and runs once per reconstruction.

use crate::catalog::DomainCatalog;
use log::debug;

/// Candidate descendant lists per catalog position. `candidates[i]` holds
/// positions `j > i` in ascending order, so every proposed edge points from
/// a coarser patch to a finer one.
pub fn propose_candidates(catalog: &DomainCatalog) -> Vec<Vec<usize>> {
    let dims = catalog.dims();
    let domains = catalog.domains();
    let mut candidates: Vec<Vec<usize>> = vec![Vec::new(); domains.len()];

    for (i, coarse) in domains.iter().enumerate() {
        for (j, fine) in domains.iter().enumerate().skip(i + 1) {
            if coarse.bounds.strictly_overlaps(&fine.bounds, dims) {
                candidates[i].push(j);
            }
        }
    }

    let total: usize = candidates.iter().map(Vec::len).sum();
    debug!(
        "candidates: domains={} edges={} dims={}",
        domains.len(),
        total,
        dims
    );
    candidates
}
