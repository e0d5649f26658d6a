//! Batch intersection - the pipeline's only parallel region.
//!
//! N independent ray queries are fanned out across the rayon pool and
//! joined before returning; the caller blocks and never observes partial
//! results. Output is positional - `results[i]` always belongs to
//! `directions[i]` - so work stealing can never reorder anything.

use echoloc_shared::{LayerMask, Vec3};
use rayon::prelude::*;

use crate::world::{CollisionWorld, SurfaceHit};

/// One scan's immutable query parameters.
#[derive(Clone, Copy, Debug)]
pub struct ScanRequest {
    /// Probe origin all rays share.
    pub origin: Vec3,
    /// Number of rays to fire.
    pub ray_count: usize,
    /// Maximum distance a ray travels.
    pub max_distance: f32,
    /// Categories the scan is allowed to hit.
    pub mask: LayerMask,
}

/// Result of one ray, index-aligned with its direction.
///
/// A miss is a value, not an error; the compactor drops them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastResult {
    /// Whether the ray struck a qualifying surface.
    pub hit: bool,
    /// Hit point (zero for misses).
    pub point: Vec3,
    /// Surface normal at the hit (zero for misses).
    pub normal: Vec3,
    /// Distance to the hit (infinite for misses).
    pub distance: f32,
}

impl RaycastResult {
    /// The canonical miss value.
    pub const MISS: Self = Self {
        hit: false,
        point: Vec3::ZERO,
        normal: Vec3::ZERO,
        distance: f32::INFINITY,
    };

    /// Wraps a world hit.
    #[must_use]
    pub const fn from_hit(hit: &SurfaceHit) -> Self {
        Self {
            hit: true,
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
        }
    }
}

/// Casts every direction of a scan against `world` in parallel.
///
/// `results` is cleared and refilled in direction order; its allocation is
/// reused, so a scratch vector sized at the maximum ray count makes this
/// allocation-free. The call returns only after every ray has resolved.
pub fn intersect_batch<W: CollisionWorld>(
    world: &W,
    request: &ScanRequest,
    directions: &[Vec3],
    results: &mut Vec<RaycastResult>,
) {
    directions
        .par_iter()
        .map(|&direction| {
            world
                .intersect(request.origin, direction, request.max_distance, request.mask)
                .map_or(RaycastResult::MISS, |hit| RaycastResult::from_hit(&hit))
        })
        .collect_into_vec(results);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_directions_into;
    use crate::world::{EmptyWorld, GroundPlaneWorld, SphereShellWorld};

    fn request(ray_count: usize) -> ScanRequest {
        ScanRequest {
            origin: Vec3::new(0.0, 5.0, 0.0),
            ray_count,
            max_distance: 50.0,
            mask: LayerMask::ALL,
        }
    }

    #[test]
    fn test_results_align_with_directions() {
        // Parallel output must equal a sequential pass, element for element.
        let world = GroundPlaneWorld::new(0.0, LayerMask::GEOMETRY);
        let req = request(512);
        let mut directions = Vec::new();
        sample_directions_into(req.ray_count, &mut directions);

        let mut parallel = Vec::new();
        intersect_batch(&world, &req, &directions, &mut parallel);

        for (i, direction) in directions.iter().enumerate() {
            let serial = world
                .intersect(req.origin, *direction, req.max_distance, req.mask)
                .map_or(RaycastResult::MISS, |hit| RaycastResult::from_hit(&hit));
            assert_eq!(parallel[i], serial, "ray {i} out of order");
        }
    }

    #[test]
    fn test_batch_length_matches_request() {
        let world = EmptyWorld;
        let req = request(100);
        let mut directions = Vec::new();
        sample_directions_into(req.ray_count, &mut directions);

        let mut results = Vec::new();
        intersect_batch(&world, &req, &directions, &mut results);

        assert_eq!(results.len(), 100);
        assert!(results.iter().all(|r| !r.hit));
    }

    #[test]
    fn test_sphere_shell_all_hit_at_radius() {
        let radius = 12.0;
        let world = SphereShellWorld::new(Vec3::ZERO, radius, LayerMask::GEOMETRY);
        let req = ScanRequest {
            origin: Vec3::ZERO,
            ray_count: 8,
            max_distance: 50.0,
            mask: LayerMask::ALL,
        };
        let mut directions = Vec::new();
        sample_directions_into(req.ray_count, &mut directions);

        let mut results = Vec::new();
        intersect_batch(&world, &req, &directions, &mut results);

        assert_eq!(results.len(), 8);
        for (i, result) in results.iter().enumerate() {
            assert!(result.hit, "ray {i} missed the shell");
            assert!(
                (result.distance - radius).abs() < 1e-3,
                "ray {i} hit at {}",
                result.distance
            );
        }
    }

    #[test]
    fn test_batch_reuses_result_allocation() {
        let world = EmptyWorld;
        let mut directions = Vec::new();
        sample_directions_into(256, &mut directions);

        let mut results = Vec::with_capacity(256);
        let capacity = results.capacity();
        intersect_batch(&world, &request(256), &directions, &mut results);
        intersect_batch(&world, &request(256), &directions, &mut results);
        assert_eq!(results.capacity(), capacity);
    }
}
