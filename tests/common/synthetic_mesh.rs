//! Synthetic patch collections and an in-memory mesh query backend.
//!
//! `BoxWorld` answers every backend capability from axis-aligned box
//! geometry: node positions interpolate the box, zone picks invert them,
//! and the indicator maximum reports whether the donor box shares interior
//! volume with any active patch. Individual patches can be scripted to miss
//! picks, which is enough to exercise the engine's partial-information
//! paths.

use amr_stitcher::backend::{MeshQueryBackend, PickMiss, QueryError, ZonePick};
use amr_stitcher::catalog::RawDomain;
use amr_stitcher::types::{DomainId, MeshKind};
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};

pub fn rect_domain(id: u32, extents: &[[f64; 2]], sizes: &[u32]) -> RawDomain {
    RawDomain {
        id: DomainId(id),
        spatial_extents: Some(extents.to_vec()),
        logical_size: Some(sizes.to_vec()),
        mesh_kind: MeshKind::Rectilinear,
    }
}

pub fn curv_domain(id: u32, extents: &[[f64; 2]], sizes: &[u32]) -> RawDomain {
    RawDomain {
        id: DomainId(id),
        spatial_extents: Some(extents.to_vec()),
        logical_size: Some(sizes.to_vec()),
        mesh_kind: MeshKind::Curvilinear,
    }
}

struct WorldPatch {
    min: [f64; 3],
    max: [f64; 3],
    zones: [u32; 3],
    dims: usize,
}

impl WorldPatch {
    fn cell(&self, axis: usize) -> f64 {
        (self.max[axis] - self.min[axis]) / f64::from(self.zones[axis])
    }

    fn overlaps(&self, other: &WorldPatch) -> bool {
        (0..self.dims).all(|a| self.min[a] < other.max[a] && other.min[a] < self.max[a])
    }
}

/// Geometric mock backend over axis-aligned boxes.
pub struct BoxWorld {
    patches: HashMap<DomainId, WorldPatch>,
    active: Option<Vec<DomainId>>,
    forced_miss: HashSet<DomainId>,
}

impl BoxWorld {
    pub fn from_raw(raw: &[RawDomain]) -> Self {
        let mut patches = HashMap::new();
        for desc in raw {
            let extents = desc.spatial_extents.as_ref().expect("synthetic extents");
            let sizes = desc.logical_size.as_ref().expect("synthetic sizes");
            let mut min = [0.0; 3];
            let mut max = [0.0; 3];
            let mut zones = [1u32; 3];
            for (axis, (ext, &count)) in extents.iter().zip(sizes.iter()).enumerate() {
                min[axis] = ext[0];
                max[axis] = ext[1];
                zones[axis] = count;
            }
            patches.insert(
                desc.id,
                WorldPatch {
                    min,
                    max,
                    zones,
                    dims: extents.len(),
                },
            );
        }
        Self {
            patches,
            active: None,
            forced_miss: HashSet::new(),
        }
    }

    /// Make every pick against `id` report a miss.
    pub fn force_pick_miss(&mut self, id: DomainId) {
        self.forced_miss.insert(id);
    }

    fn patch(&self, id: DomainId) -> Result<&WorldPatch, QueryError> {
        self.patches.get(&id).ok_or(QueryError::UnknownDomain(id))
    }
}

impl MeshQueryBackend for BoxWorld {
    fn node_position(&self, domain: DomainId, node: [u32; 3]) -> Result<Point3<f64>, QueryError> {
        let patch = self.patch(domain)?;
        let mut position = [0.0; 3];
        for axis in 0..patch.dims {
            if node[axis] > patch.zones[axis] {
                return Err(QueryError::NodeOutOfRange { domain, node });
            }
            position[axis] = patch.min[axis] + f64::from(node[axis]) * patch.cell(axis);
        }
        Ok(Point3::new(position[0], position[1], position[2]))
    }

    fn pick_zone(&self, domain: DomainId, position: &Point3<f64>) -> Result<ZonePick, PickMiss> {
        let miss = PickMiss {
            domain,
            position: *position,
        };
        let patch = match self.patch(domain) {
            Ok(patch) => patch,
            Err(_) => return Err(miss),
        };
        if self.forced_miss.contains(&domain) {
            return Err(miss);
        }
        let mut zone = [0u32; 3];
        for axis in 0..patch.dims {
            if position[axis] < patch.min[axis] || position[axis] > patch.max[axis] {
                return Err(miss);
            }
            let offset = (position[axis] - patch.min[axis]) / patch.cell(axis);
            zone[axis] = (offset.floor() as u32).min(patch.zones[axis] - 1);
        }
        Ok(ZonePick { zone })
    }

    fn set_active_domains(&mut self, active: Option<&[DomainId]>) -> Result<(), QueryError> {
        self.active = active.map(<[DomainId]>::to_vec);
        Ok(())
    }

    fn indicator_maximum(&mut self, donor: DomainId) -> Result<f64, QueryError> {
        let donor_patch = self.patch(donor)?;
        let active = match &self.active {
            Some(ids) => ids.clone(),
            None => self.patches.keys().copied().collect(),
        };
        for id in active {
            let target = self.patch(id)?;
            if donor_patch.overlaps(target) {
                return Ok(1.0);
            }
        }
        Ok(0.0)
    }
}
