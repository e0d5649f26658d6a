//! Per-scan scratch storage.
//!
//! Allocating and freeing the direction and result arrays on every scan
//! would churn the allocator for nothing: a scan's working set is bounded
//! by the maximum ray count. The arrays are acquired once, sized for that
//! maximum, and reused - clearing keeps the capacity, and every exit path
//! (including the zero-hit early-out) leaves the scratch ready for the
//! next scan.

use echoloc_shared::{Transform, Vec3};

use crate::intersect::RaycastResult;

/// Reusable working storage for one scan engine.
#[derive(Debug)]
pub struct ScanScratch {
    /// Sampled ray directions.
    directions: Vec<Vec3>,
    /// Index-aligned intersection results.
    results: Vec<RaycastResult>,
    /// Compacted decal transforms.
    transforms: Vec<Transform>,
}

impl ScanScratch {
    /// Allocates scratch for scans of up to `max_ray_count` rays.
    ///
    /// This is the only allocation this type ever performs.
    #[must_use]
    pub fn with_capacity(max_ray_count: usize) -> Self {
        Self {
            directions: Vec::with_capacity(max_ray_count),
            results: Vec::with_capacity(max_ray_count),
            transforms: Vec::with_capacity(max_ray_count),
        }
    }

    /// Borrows the three stages simultaneously.
    ///
    /// Returned as disjoint mutable borrows so a pipeline pass can sample
    /// into one while reading another.
    pub fn split(
        &mut self,
    ) -> (&mut Vec<Vec3>, &mut Vec<RaycastResult>, &mut Vec<Transform>) {
        (&mut self.directions, &mut self.results, &mut self.transforms)
    }

    /// Number of rays this scratch can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.directions.capacity()
    }

    /// Clears all stages, keeping their allocations.
    pub fn reset(&mut self) {
        self.directions.clear();
        self.results.clear();
        self.transforms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_directions_into;

    #[test]
    fn test_capacity_survives_reset() {
        let mut scratch = ScanScratch::with_capacity(128);
        let (dirs, _, _) = scratch.split();
        sample_directions_into(128, dirs);
        scratch.reset();
        assert_eq!(scratch.capacity(), 128);
        let (dirs, results, transforms) = scratch.split();
        assert!(dirs.is_empty());
        assert!(results.is_empty());
        assert!(transforms.is_empty());
    }
}
