//! Overlap confirmation for candidate edges.
//!
//! Rectilinear pairs need no confirmation: their bounding boxes are exact,
//! so the candidate test is already definitive. As soon as either patch is
//! curvilinear the box is only a hull, and the engine asks the backend to
//! settle it: an indicator field worth one everywhere on the candidate child
//! is mapped onto the candidate parent's geometry (restricted to the parent
//! via the active-domain control); a maximum above the threshold proves the
//! patches truly share volume. Candidates the backend cannot confirm are
//! dropped, never escalated.

use crate::backend::MeshQueryBackend;
use crate::catalog::DomainCatalog;
use log::{debug, warn};

/// Confirmed descendant adjacency plus counters for diagnostics.
#[derive(Clone, Debug, Default)]
pub struct OverlapSummary {
    /// Confirmed descendants per catalog position, ascending.
    pub confirmed: Vec<Vec<usize>>,
    pub oracle_calls: usize,
    /// Candidates the oracle evaluated below the threshold.
    pub rejected: usize,
    /// Candidates dropped because a backend query failed.
    pub query_failures: usize,
}

/// Evaluate every candidate edge, keeping those with proven overlap.
pub fn confirm_overlaps(
    catalog: &DomainCatalog,
    candidates: &[Vec<usize>],
    backend: &mut dyn MeshQueryBackend,
    confirm_threshold: f64,
) -> OverlapSummary {
    let mut summary = OverlapSummary {
        confirmed: vec![Vec::new(); candidates.len()],
        ..Default::default()
    };

    for (parent, descendants) in candidates.iter().enumerate() {
        for &child in descendants {
            let analytic = catalog.domain(parent).geometry.is_rectilinear()
                && catalog.domain(child).geometry.is_rectilinear();
            if analytic {
                summary.confirmed[parent].push(child);
                continue;
            }
            match confirm_one(catalog, parent, child, backend, confirm_threshold) {
                Ok(true) => summary.confirmed[parent].push(child),
                Ok(false) => summary.rejected += 1,
                Err(()) => summary.query_failures += 1,
            }
            summary.oracle_calls += 1;
        }
    }

    // Best effort: leave the session unrestricted for whoever queries next.
    if backend.set_active_domains(None).is_err() {
        warn!("overlap oracle could not restore the active-domain set");
    }

    let kept: usize = summary.confirmed.iter().map(Vec::len).sum();
    debug!(
        "overlap: confirmed={} rejected={} failures={} oracle_calls={}",
        kept, summary.rejected, summary.query_failures, summary.oracle_calls
    );
    summary
}

fn confirm_one(
    catalog: &DomainCatalog,
    parent: usize,
    child: usize,
    backend: &mut dyn MeshQueryBackend,
    confirm_threshold: f64,
) -> Result<bool, ()> {
    let parent_id = catalog.domain(parent).id;
    let child_id = catalog.domain(child).id;

    let restricted = [parent_id];
    if let Err(err) = backend.set_active_domains(Some(&restricted)) {
        warn!("overlap oracle: restricting to {parent_id} failed: {err}");
        return Err(());
    }
    match backend.indicator_maximum(child_id) {
        Ok(maximum) => Ok(maximum > confirm_threshold),
        Err(err) => {
            warn!("overlap oracle: indicator on {parent_id} from {child_id} failed: {err}");
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{PickMiss, QueryError, ZonePick};
    use crate::catalog::RawDomain;
    use crate::types::{DomainId, MeshKind};
    use nalgebra::Point3;

    /// Scripted oracle: answers indicator queries from a fixed table.
    struct ScriptedBackend {
        answers: Vec<((DomainId, DomainId), f64)>,
        active: Option<Vec<DomainId>>,
    }

    impl MeshQueryBackend for ScriptedBackend {
        fn node_position(
            &self,
            _domain: DomainId,
            _node: [u32; 3],
        ) -> Result<Point3<f64>, QueryError> {
            Err(QueryError::Backend("not scripted".into()))
        }

        fn pick_zone(
            &self,
            domain: DomainId,
            position: &Point3<f64>,
        ) -> Result<ZonePick, PickMiss> {
            Err(PickMiss {
                domain,
                position: *position,
            })
        }

        fn set_active_domains(&mut self, active: Option<&[DomainId]>) -> Result<(), QueryError> {
            self.active = active.map(<[DomainId]>::to_vec);
            Ok(())
        }

        fn indicator_maximum(&mut self, donor: DomainId) -> Result<f64, QueryError> {
            let parent = self.active.as_ref().and_then(|a| a.first().copied());
            let parent = parent.ok_or_else(|| QueryError::Backend("no restriction".into()))?;
            self.answers
                .iter()
                .find(|((p, c), _)| *p == parent && *c == donor)
                .map(|(_, v)| *v)
                .ok_or(QueryError::UnknownDomain(donor))
        }
    }

    fn raw(id: u32, extents: &[[f64; 2]], sizes: &[u32], kind: MeshKind) -> RawDomain {
        RawDomain {
            id: DomainId(id),
            spatial_extents: Some(extents.to_vec()),
            logical_size: Some(sizes.to_vec()),
            mesh_kind: kind,
        }
    }

    #[test]
    fn rectilinear_pairs_skip_the_oracle() {
        let catalog = DomainCatalog::ingest(&[
            raw(0, &[[0.0, 8.0], [0.0, 8.0]], &[8, 8], MeshKind::Rectilinear),
            raw(1, &[[1.0, 3.0], [1.0, 3.0]], &[8, 8], MeshKind::Rectilinear),
        ])
        .unwrap();
        let candidates = vec![vec![1], vec![]];
        let mut backend = ScriptedBackend {
            answers: Vec::new(),
            active: None,
        };
        let summary = confirm_overlaps(&catalog, &candidates, &mut backend, 0.5);
        assert_eq!(summary.confirmed[0], vec![1]);
        assert_eq!(summary.oracle_calls, 0);
    }

    #[test]
    fn curvilinear_candidate_rejected_below_threshold() {
        let catalog = DomainCatalog::ingest(&[
            raw(0, &[[0.0, 8.0], [0.0, 8.0]], &[8, 8], MeshKind::Curvilinear),
            raw(1, &[[1.0, 3.0], [1.0, 3.0]], &[8, 8], MeshKind::Curvilinear),
        ])
        .unwrap();
        let candidates = vec![vec![1], vec![]];
        let mut backend = ScriptedBackend {
            answers: vec![((DomainId(0), DomainId(1)), 0.0)],
            active: None,
        };
        let summary = confirm_overlaps(&catalog, &candidates, &mut backend, 0.5);
        assert!(summary.confirmed[0].is_empty());
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.oracle_calls, 1);
    }

    #[test]
    fn failed_queries_drop_the_edge_quietly() {
        let catalog = DomainCatalog::ingest(&[
            raw(0, &[[0.0, 8.0], [0.0, 8.0]], &[8, 8], MeshKind::Curvilinear),
            raw(1, &[[1.0, 3.0], [1.0, 3.0]], &[8, 8], MeshKind::Rectilinear),
        ])
        .unwrap();
        let candidates = vec![vec![1], vec![]];
        let mut backend = ScriptedBackend {
            answers: Vec::new(),
            active: None,
        };
        let summary = confirm_overlaps(&catalog, &candidates, &mut backend, 0.5);
        assert!(summary.confirmed[0].is_empty());
        assert_eq!(summary.query_failures, 1);
    }
}
