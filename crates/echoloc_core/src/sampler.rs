//! Direction sampling - Fibonacci sphere.
//!
//! A scan fires thousands of rays; their directions must cover the sphere
//! nearly uniformly or the decal density visibly bunches at the poles. The
//! golden-ratio spiral gives a low-discrepancy covering from nothing but
//! `(index, total)` - deterministic, reproducible, no RNG.

use echoloc_shared::Vec3;

/// The golden ratio, (1 + sqrt(5)) / 2.
const GOLDEN_RATIO: f32 = 1.618_034;

/// Azimuth step between consecutive sample indices, 2π * φ.
const AZIMUTH_STEP: f32 = std::f32::consts::TAU * GOLDEN_RATIO;

/// Returns the unit direction for sample `index` of a `total`-ray scan.
///
/// Normalized height `t = index / total` maps to the polar inclination
/// `acos(1 - 2t)`, so equal index ranges subtend equal sphere area; the
/// azimuth advances by the golden angle per index, which never resonates
/// into visible seams.
///
/// # Panics
///
/// Panics if `total` is zero or `index >= total`.
#[must_use]
pub fn fibonacci_direction(index: usize, total: usize) -> Vec3 {
    assert!(total > 0, "direction sample from an empty set");
    assert!(index < total, "sample index {index} out of range 0..{total}");

    #[allow(clippy::cast_precision_loss)]
    let t = index as f32 / total as f32;
    #[allow(clippy::cast_precision_loss)]
    let azimuth = AZIMUTH_STEP * index as f32;
    let inclination = (1.0 - 2.0 * t).acos();

    let (sin_inc, cos_inc) = inclination.sin_cos();
    let (sin_az, cos_az) = azimuth.sin_cos();
    Vec3::new(sin_inc * cos_az, sin_inc * sin_az, cos_inc)
}

/// Fills `out` with the full direction set for a `total`-ray scan.
///
/// Clears and reuses `out`; with a pre-sized scratch vector this performs
/// no allocation.
///
/// # Panics
///
/// Panics if `total` is zero.
pub fn sample_directions_into(total: usize, out: &mut Vec<Vec3>) {
    out.clear();
    out.extend((0..total).map(|i| fibonacci_direction(i, total)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_are_unit_length() {
        for total in [1, 2, 8, 500] {
            for i in 0..total {
                let d = fibonacci_direction(i, total);
                assert!(
                    (d.length() - 1.0).abs() < 1e-4,
                    "index {i}/{total} has length {}",
                    d.length()
                );
            }
        }
    }

    #[test]
    fn test_directions_are_distinct() {
        let total = 500;
        let mut dirs = Vec::new();
        sample_directions_into(total, &mut dirs);
        for i in 0..total {
            for j in (i + 1)..total {
                assert!(
                    dirs[i].distance(dirs[j]) > 1e-3,
                    "directions {i} and {j} coincide"
                );
            }
        }
    }

    #[test]
    fn test_inclination_is_approximately_uniform() {
        // Uniform sphere coverage means z = cos(inclination) is uniform
        // on [-1, 1]. Bucket z and check no bin deviates badly.
        let total = 4000;
        const BINS: usize = 8;
        let mut histogram = [0usize; BINS];
        for i in 0..total {
            let z = fibonacci_direction(i, total).z;
            let bin = (((z + 1.0) / 2.0) * BINS as f32) as usize;
            histogram[bin.min(BINS - 1)] += 1;
        }
        let expected = total / BINS;
        for (bin, &count) in histogram.iter().enumerate() {
            let deviation = count.abs_diff(expected);
            assert!(
                deviation < expected / 5,
                "bin {bin} holds {count}, expected ~{expected}"
            );
        }
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let a = fibonacci_direction(137, 4000);
        let b = fibonacci_direction(137, 4000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_into_reuses_allocation() {
        let mut out = Vec::with_capacity(64);
        let base = out.capacity();
        sample_directions_into(64, &mut out);
        sample_directions_into(8, &mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(out.capacity(), base);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let _ = fibonacci_direction(4, 4);
    }
}
