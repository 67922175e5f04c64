//! Synchronous query interface onto the live mesh session.
//!
//! The engine never touches mesh geometry directly; everything beyond the
//! per-patch metadata flows through [`MeshQueryBackend`]. Implementations
//! wrap whatever session or file reader actually holds the mesh. All calls
//! are blocking request/response with no retry; a failed query is reported
//! to the caller, which skips the owning measurement and continues.

use crate::types::DomainId;
use nalgebra::Point3;

/// Result of a zone pick: the structured index of the zone containing the
/// probed position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZonePick {
    pub zone: [u32; 3],
}

/// A point-location query that did not land on the target patch.
///
/// Misses are expected during reconstruction (probes clamped near patch
/// boundaries, curvilinear geometry that the bounding box over-approximates)
/// and are never fatal: the dependent measurement is skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct PickMiss {
    pub domain: DomainId,
    pub position: Point3<f64>,
}

impl std::fmt::Display for PickMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pick missed {} at ({:.6}, {:.6}, {:.6})",
            self.domain, self.position.x, self.position.y, self.position.z
        )
    }
}

impl std::error::Error for PickMiss {}

/// Failure modes of the non-pick backend capabilities.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryError {
    /// The backend has no patch under this identifier.
    UnknownDomain(DomainId),
    /// The requested node index lies outside the patch's logical grid.
    NodeOutOfRange { domain: DomainId, node: [u32; 3] },
    /// Any other backend-side failure, carried verbatim.
    Backend(String),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::UnknownDomain(id) => write!(f, "unknown {id}"),
            QueryError::NodeOutOfRange { domain, node } => {
                write!(
                    f,
                    "node ({}, {}, {}) out of range on {domain}",
                    node[0], node[1], node[2]
                )
            }
            QueryError::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Capabilities the reconstruction engine requires from the mesh session.
pub trait MeshQueryBackend {
    /// Physical coordinates of a grid node addressed by its structured index.
    fn node_position(&self, domain: DomainId, node: [u32; 3]) -> Result<Point3<f64>, QueryError>;

    /// Locate the zone of `domain` containing `position`. An explicit
    /// [`PickMiss`] is returned when the position falls outside the patch.
    fn pick_zone(&self, domain: DomainId, position: &Point3<f64>)
        -> Result<ZonePick, PickMiss>;

    /// Restrict subsequent queries to the given patches; `None` restores the
    /// full mesh.
    fn set_active_domains(&mut self, active: Option<&[DomainId]>) -> Result<(), QueryError>;

    /// Maximum, over the currently active patches, of an indicator field
    /// that equals one everywhere on `donor` and zero elsewhere, evaluated
    /// through a position-based cross-mesh mapping.
    fn indicator_maximum(&mut self, donor: DomainId) -> Result<f64, QueryError>;
}
