//! Patch ingestion and deterministic ordering.
//!
//! The catalog turns raw per-patch descriptors into immutable [`Domain`]
//! records, computes each patch's rank (average cell measure, the engine's
//! coarseness proxy) and fixes the ordering every later stage relies on:
//! rank descending, ties broken by backend id. Descriptors missing spatial
//! extents or logical sizes are the engine's only hard failure.

use crate::types::{DomainId, MeshKind, SpatialBounds, MAX_DIMS};
use serde::{Deserialize, Serialize};

/// Per-patch metadata as reported by the mesh query backend. Optional fields
/// reflect source formats that may omit them; the catalog rejects such
/// descriptors outright.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawDomain {
    pub id: DomainId,
    /// Per-axis `[min, max]` pairs; length sets the mesh dimensionality.
    pub spatial_extents: Option<Vec<[f64; 2]>>,
    /// Per-axis zone counts.
    pub logical_size: Option<Vec<u32>>,
    pub mesh_kind: MeshKind,
}

/// Cell geometry resolved at ingest. Rectilinear patches carry their
/// analytic cell size so no later stage needs a backend query for them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellGeometry {
    Rectilinear { cell_size: [f64; MAX_DIMS] },
    Curvilinear,
}

impl CellGeometry {
    pub fn is_rectilinear(&self) -> bool {
        matches!(self, CellGeometry::Rectilinear { .. })
    }
}

/// One ingested patch. Immutable for the lifetime of a reconstruction pass.
#[derive(Clone, Debug)]
pub struct Domain {
    pub id: DomainId,
    pub bounds: SpatialBounds,
    pub zones: [u32; MAX_DIMS],
    pub geometry: CellGeometry,
    /// Average cell measure: bounding-box measure divided by zone count.
    pub rank: f64,
}

impl Domain {
    /// Total zone count across the first `dims` axes.
    pub fn zone_count(&self, dims: usize) -> u64 {
        (0..dims).map(|a| u64::from(self.zones[a])).product()
    }

    /// Structured index of the last grid node along each axis.
    pub fn last_node(&self) -> [u32; MAX_DIMS] {
        self.zones
    }
}

/// Reasons ingestion aborts the whole pass.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogError {
    EmptyInput,
    MissingExtents { id: DomainId },
    MissingLogicalSize { id: DomainId },
    DimensionMismatch { id: DomainId, expected: usize, actual: usize },
    UnsupportedDimension { id: DomainId, dims: usize },
    ZeroZones { id: DomainId, axis: usize },
    InvertedExtent { id: DomainId, axis: usize },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::EmptyInput => write!(f, "no patch descriptors supplied"),
            CatalogError::MissingExtents { id } => {
                write!(f, "{id} has no spatial extents")
            }
            CatalogError::MissingLogicalSize { id } => {
                write!(f, "{id} has no logical size")
            }
            CatalogError::DimensionMismatch { id, expected, actual } => write!(
                f,
                "{id} reports {actual} axes, catalog dimensionality is {expected}"
            ),
            CatalogError::UnsupportedDimension { id, dims } => {
                write!(f, "{id} reports {dims} axes, supported range is 1..=3")
            }
            CatalogError::ZeroZones { id, axis } => {
                write!(f, "{id} has zero zones on axis {axis}")
            }
            CatalogError::InvertedExtent { id, axis } => {
                write!(f, "{id} has an inverted extent on axis {axis}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// The full patch collection in reconstruction order.
#[derive(Clone, Debug)]
pub struct DomainCatalog {
    dims: usize,
    domains: Vec<Domain>,
}

impl DomainCatalog {
    /// Validate raw descriptors, compute ranks and fix the ordering.
    pub fn ingest(raw: &[RawDomain]) -> Result<Self, CatalogError> {
        if raw.is_empty() {
            return Err(CatalogError::EmptyInput);
        }

        let mut dims = 0usize;
        let mut domains = Vec::with_capacity(raw.len());
        for desc in raw {
            let extents = desc
                .spatial_extents
                .as_ref()
                .ok_or(CatalogError::MissingExtents { id: desc.id })?;
            let sizes = desc
                .logical_size
                .as_ref()
                .ok_or(CatalogError::MissingLogicalSize { id: desc.id })?;

            if extents.is_empty() || extents.len() > MAX_DIMS {
                return Err(CatalogError::UnsupportedDimension {
                    id: desc.id,
                    dims: extents.len(),
                });
            }
            if dims == 0 {
                dims = extents.len();
            }
            if extents.len() != dims {
                return Err(CatalogError::DimensionMismatch {
                    id: desc.id,
                    expected: dims,
                    actual: extents.len(),
                });
            }
            if sizes.len() != dims {
                return Err(CatalogError::DimensionMismatch {
                    id: desc.id,
                    expected: dims,
                    actual: sizes.len(),
                });
            }

            let mut bounds = SpatialBounds {
                min: [0.0; MAX_DIMS],
                max: [0.0; MAX_DIMS],
            };
            let mut zones = [1u32; MAX_DIMS];
            for (axis, (ext, &count)) in extents.iter().zip(sizes.iter()).enumerate() {
                if count == 0 {
                    return Err(CatalogError::ZeroZones { id: desc.id, axis });
                }
                if ext[1] < ext[0] {
                    return Err(CatalogError::InvertedExtent { id: desc.id, axis });
                }
                bounds.min[axis] = ext[0];
                bounds.max[axis] = ext[1];
                zones[axis] = count;
            }

            let measure = bounds.measure(dims);
            let rank = measure / zone_total(&zones, dims) as f64;
            let geometry = match desc.mesh_kind {
                MeshKind::Rectilinear => {
                    let mut cell_size = [0.0; MAX_DIMS];
                    for axis in 0..dims {
                        cell_size[axis] = bounds.span(axis) / f64::from(zones[axis]);
                    }
                    CellGeometry::Rectilinear { cell_size }
                }
                MeshKind::Curvilinear => CellGeometry::Curvilinear,
            };

            domains.push(Domain {
                id: desc.id,
                bounds,
                zones,
                geometry,
                rank,
            });
        }

        // Coarsest first; equal ranks fall back to the stable backend id so
        // repeated passes see the same order.
        domains.sort_by(|a, b| {
            b.rank
                .partial_cmp(&a.rank)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });

        Ok(Self { dims, domains })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn domain(&self, position: usize) -> &Domain {
        &self.domains[position]
    }
}

fn zone_total(zones: &[u32; MAX_DIMS], dims: usize) -> u64 {
    (0..dims).map(|a| u64::from(zones[a])).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: u32, extents: &[[f64; 2]], sizes: &[u32]) -> RawDomain {
        RawDomain {
            id: DomainId(id),
            spatial_extents: Some(extents.to_vec()),
            logical_size: Some(sizes.to_vec()),
            mesh_kind: MeshKind::Rectilinear,
        }
    }

    #[test]
    fn ranks_follow_average_cell_measure() {
        let catalog = DomainCatalog::ingest(&[
            raw(0, &[[0.0, 10.0], [0.0, 10.0]], &[10, 10]),
            raw(1, &[[0.0, 5.0], [0.0, 5.0]], &[20, 20]),
        ])
        .unwrap();
        assert_eq!(catalog.dims(), 2);
        assert!((catalog.domain(0).rank - 1.0).abs() < 1e-12);
        assert!((catalog.domain(1).rank - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn coarsest_domain_orders_first() {
        let catalog = DomainCatalog::ingest(&[
            raw(7, &[[0.0, 1.0], [0.0, 1.0]], &[100, 100]),
            raw(3, &[[0.0, 10.0], [0.0, 10.0]], &[10, 10]),
        ])
        .unwrap();
        assert_eq!(catalog.domain(0).id, DomainId(3));
        assert_eq!(catalog.domain(1).id, DomainId(7));
    }

    #[test]
    fn equal_ranks_break_ties_by_id() {
        let catalog = DomainCatalog::ingest(&[
            raw(9, &[[0.0, 1.0]], &[4]),
            raw(2, &[[5.0, 6.0]], &[4]),
        ])
        .unwrap();
        assert_eq!(catalog.domain(0).id, DomainId(2));
        assert_eq!(catalog.domain(1).id, DomainId(9));
    }

    #[test]
    fn missing_extents_is_a_hard_failure() {
        let err = DomainCatalog::ingest(&[RawDomain {
            id: DomainId(4),
            spatial_extents: None,
            logical_size: Some(vec![8, 8]),
            mesh_kind: MeshKind::Rectilinear,
        }])
        .unwrap_err();
        assert_eq!(err, CatalogError::MissingExtents { id: DomainId(4) });
    }

    #[test]
    fn missing_logical_size_is_a_hard_failure() {
        let err = DomainCatalog::ingest(&[RawDomain {
            id: DomainId(5),
            spatial_extents: Some(vec![[0.0, 1.0], [0.0, 1.0]]),
            logical_size: None,
            mesh_kind: MeshKind::Curvilinear,
        }])
        .unwrap_err();
        assert_eq!(err, CatalogError::MissingLogicalSize { id: DomainId(5) });
    }

    #[test]
    fn rectilinear_cell_size_is_analytic() {
        let catalog =
            DomainCatalog::ingest(&[raw(0, &[[0.0, 10.0], [0.0, 4.0]], &[10, 8])]).unwrap();
        match catalog.domain(0).geometry {
            CellGeometry::Rectilinear { cell_size } => {
                assert!((cell_size[0] - 1.0).abs() < 1e-12);
                assert!((cell_size[1] - 0.5).abs() < 1e-12);
            }
            CellGeometry::Curvilinear => panic!("expected rectilinear geometry"),
        }
    }
}
