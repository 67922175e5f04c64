//! Quantized face corner point-sets.
//!
//! Two roots share a face exactly when the corner points of the facing
//! sides coincide. Corners are quantized to a fixed decimal precision
//! before comparison so floating-point noise from the source format cannot
//! break the equality.

use crate::types::{SpatialBounds, MAX_DIMS};

/// Which side of the axis a face sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Lo,
    Hi,
}

/// Corner point-set of one face, quantized and sorted for exact comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FacePointSet {
    points: Vec<[i64; MAX_DIMS]>,
}

/// Corner points of the face of `bounds` on `side` of `axis`.
///
/// A 3D face has four corners, a 2D edge two; unused axes quantize to zero.
pub(crate) fn face_point_set(
    bounds: &SpatialBounds,
    dims: usize,
    axis: usize,
    side: Side,
    precision_decimals: u32,
) -> FacePointSet {
    let scale = 10f64.powi(precision_decimals as i32);
    let fixed = match side {
        Side::Lo => bounds.min[axis],
        Side::Hi => bounds.max[axis],
    };

    let free: Vec<usize> = (0..dims).filter(|&a| a != axis).collect();
    let corner_count = 1usize << free.len();
    let mut points = Vec::with_capacity(corner_count);
    for mask in 0..corner_count {
        let mut corner = [0i64; MAX_DIMS];
        corner[axis] = quantize(fixed, scale);
        for (bit, &a) in free.iter().enumerate() {
            let value = if mask & (1 << bit) == 0 {
                bounds.min[a]
            } else {
                bounds.max[a]
            };
            corner[a] = quantize(value, scale);
        }
        points.push(corner);
    }
    points.sort_unstable();
    FacePointSet { points }
}

fn quantize(value: f64, scale: f64) -> i64 {
    (value * scale).round() as i64
}
