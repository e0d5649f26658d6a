//! The collision-world interface and analytic reference worlds.
//!
//! The scan pipeline does not own a collision structure; it queries whatever
//! world the host provides through [`CollisionWorld`]. The analytic worlds
//! here implement the same contract in closed form - the demo binary scans
//! them and the test suites measure against them.

use echoloc_shared::{LayerMask, Vec3};

/// A single surface intersection returned by a collision world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// Point of intersection in world space.
    pub point: Vec3,
    /// Surface normal at the hit, unit length, facing the ray origin.
    pub normal: Vec3,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
}

/// Read-only ray-query interface onto the host's collision structure.
///
/// Contract for implementors:
/// - back-face hits are excluded: a surface whose normal points away from
///   the ray is not reported
/// - surfaces whose layers do not intersect `mask` are not reported
/// - queries have no side effects and are safe to issue concurrently,
///   which the `Sync` bound encodes
pub trait CollisionWorld: Sync {
    /// Casts one ray and returns the nearest qualifying hit, if any.
    fn intersect(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;
}

/// A world with nothing in it. Every ray misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyWorld;

impl CollisionWorld for EmptyWorld {
    fn intersect(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        _max_distance: f32,
        _mask: LayerMask,
    ) -> Option<SurfaceHit> {
        None
    }
}

/// A hollow sphere shell scanned from inside - the "cave chamber" fixture.
///
/// Normals face inward (toward the scanner), so rays cast from inside the
/// shell always strike a front face and rays from outside are back-face
/// rejected.
#[derive(Clone, Copy, Debug)]
pub struct SphereShellWorld {
    /// Shell center.
    pub center: Vec3,
    /// Shell radius.
    pub radius: f32,
    /// Layers the shell belongs to.
    pub layers: LayerMask,
}

impl SphereShellWorld {
    /// Creates a shell on the given layers.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32, layers: LayerMask) -> Self {
        Self { center, radius, layers }
    }
}

impl CollisionWorld for SphereShellWorld {
    fn intersect(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        if !mask.intersects(self.layers) {
            return None;
        }
        // |o + t*d - c|^2 = r^2, unit d: t^2 + 2*t*(o-c)·d + |o-c|^2 - r^2 = 0
        let to_origin = origin - self.center;
        let half_b = to_origin.dot(direction);
        let c = to_origin.length_squared() - self.radius * self.radius;
        let discriminant = half_b * half_b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        // Nearest positive root within range
        let distance = [-half_b - sqrt_d, -half_b + sqrt_d]
            .into_iter()
            .find(|&t| t > f32::EPSILON && t <= max_distance)?;
        let point = origin + direction * distance;
        let normal = (self.center - point).normalized();
        // Back-face rejection: the inward normal must oppose the ray
        if direction.dot(normal) >= 0.0 {
            return None;
        }
        Some(SurfaceHit { point, normal, distance })
    }
}

/// An infinite horizontal ground plane - the "open terrain" fixture.
///
/// The plane's normal is +Y; rays arriving from below hit its back face and
/// are rejected.
#[derive(Clone, Copy, Debug)]
pub struct GroundPlaneWorld {
    /// World-space height (Y) of the plane.
    pub height: f32,
    /// Layers the plane belongs to.
    pub layers: LayerMask,
}

impl GroundPlaneWorld {
    /// Creates a plane at `height` on the given layers.
    #[must_use]
    pub const fn new(height: f32, layers: LayerMask) -> Self {
        Self { height, layers }
    }
}

impl CollisionWorld for GroundPlaneWorld {
    fn intersect(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        if !mask.intersects(self.layers) {
            return None;
        }
        // Front faces only: the ray must travel downward from above.
        if direction.y >= -f32::EPSILON || origin.y <= self.height {
            return None;
        }
        let distance = (self.height - origin.y) / direction.y;
        if distance <= f32::EPSILON || distance > max_distance {
            return None;
        }
        let point = origin + direction * distance;
        Some(SurfaceHit { point, normal: Vec3::Y, distance })
    }
}
