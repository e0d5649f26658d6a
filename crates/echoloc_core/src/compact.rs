//! Hit compaction - dense decal transforms from sparse ray results.
//!
//! One O(N) pass over the index-aligned results drops the misses and turns
//! each hit into a placed decal. Hits keep their ray-index order; the dense
//! index is sequential from zero, which is exactly the instance index the
//! indirect draw will use.

use echoloc_shared::{Quat, Transform};

use crate::intersect::RaycastResult;

/// Compacts `results` into dense decal transforms, returning the count.
///
/// For each hit:
/// - position = hit point pushed `standoff` along the surface normal, so
///   the decal never z-fights the surface it marks. On strongly concave
///   geometry the pushed point can end up past a nearby opposing wall;
///   this is a known approximation - bounding it would cost a second ray
///   per hit - and `standoff` is kept small relative to the scan radius.
/// - rotation orients the decal's forward axis opposite the normal, laying
///   the quad flush against the surface, face outward.
/// - `scale` is the in-plane quad size for the active visual mode.
///
/// `out` is cleared and refilled; a scratch vector sized at the maximum
/// ray count makes this allocation-free.
pub fn compact_into(
    results: &[RaycastResult],
    standoff: f32,
    scale: f32,
    out: &mut Vec<Transform>,
) -> usize {
    out.clear();
    for result in results {
        if !result.hit {
            continue;
        }
        let position = result.point + result.normal * standoff;
        let rotation = Quat::look_rotation(-result.normal);
        out.push(Transform::new(position, rotation, scale));
    }
    out.len()
}
