//! Mathematical types shared between the scan pipeline and the renderer.
//!
//! These are the canonical representations uploaded to the GPU, so every
//! type here is `Pod` with an explicit `repr(C)` layout.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, direction, surface normal
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (right-handed)
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Returns this vector scaled to unit length.
    ///
    /// A degenerate (near-zero) vector normalizes to `Vec3::ZERO` rather
    /// than producing NaN components.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            return Self::ZERO;
        }
        self * (1.0 / len)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Quaternion for decal orientation
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Quat {
    /// Creates a new quaternion
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Builds the rotation that points the local +Z axis along `forward`.
    ///
    /// This is what lays a decal quad flush against a surface: pass the
    /// negated surface normal and the quad faces outward. `forward` does not
    /// need to be unit length. A near-vertical forward falls back to +Z as
    /// the up reference so the basis never degenerates.
    #[must_use]
    pub fn look_rotation(forward: Vec3) -> Self {
        let f = forward.normalized();
        if f == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let up_ref = if f.y.abs() > 0.999 { Vec3::Z } else { Vec3::Y };
        let right = up_ref.cross(f).normalized();
        let up = f.cross(right);
        Self::from_axes(right, up, f)
    }

    /// Converts an orthonormal basis (the columns of a rotation matrix)
    /// into a quaternion. Shepperd's method: pick the numerically largest
    /// diagonal branch to avoid the small-divisor case.
    fn from_axes(x: Vec3, y: Vec3, z: Vec3) -> Self {
        let trace = x.x + y.y + z.z;
        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new(
                (y.z - z.y) / s,
                (z.x - x.z) / s,
                (x.y - y.x) / s,
                0.25 * s,
            )
        } else if x.x > y.y && x.x > z.z {
            let s = (1.0 + x.x - y.y - z.z).sqrt() * 2.0;
            Self::new(
                0.25 * s,
                (y.x + x.y) / s,
                (z.x + x.z) / s,
                (y.z - z.y) / s,
            )
        } else if y.y > z.z {
            let s = (1.0 + y.y - x.x - z.z).sqrt() * 2.0;
            Self::new(
                (y.x + x.y) / s,
                0.25 * s,
                (z.y + y.z) / s,
                (z.x - x.z) / s,
            )
        } else {
            let s = (1.0 + z.z - x.x - y.y).sqrt() * 2.0;
            Self::new(
                (z.x + x.z) / s,
                (z.y + y.z) / s,
                0.25 * s,
                (x.y - y.x) / s,
            )
        }
    }

    /// Rotates a vector by this quaternion.
    #[must_use]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Transform - position + rotation + in-plane scale of one decal
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Transform {
    /// Position
    pub position: Vec3,
    /// Scale applied to the two in-plane axes (the depth axis stays 1)
    pub scale: f32,
    /// Rotation
    pub rotation: Quat,
}

impl Transform {
    /// Creates a new transform
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat, scale: f32) -> Self {
        Self { position, scale, rotation }
    }

    /// Identity transform
    pub const IDENTITY: Self = Self::new(Vec3::ZERO, Quat::IDENTITY, 1.0);

    /// Expands to a column-major 4x4 model matrix.
    ///
    /// The scale is applied to the local X and Y axes only; a decal is flat,
    /// so scaling its depth axis would just skew the projection falloff.
    #[must_use]
    pub fn to_model_matrix(&self) -> [[f32; 4]; 4] {
        let x = self.rotation.rotate(Vec3::X) * self.scale;
        let y = self.rotation.rotate(Vec3::Y) * self.scale;
        let z = self.rotation.rotate(Vec3::Z);
        let p = self.position;
        [
            [x.x, x.y, x.z, 0.0],
            [y.x, y.y, y.z, 0.0],
            [z.x, z.y, z.z, 0.0],
            [p.x, p.y, p.z, 1.0],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < EPS
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0); // 1*4 + 2*5 + 3*6
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert!(approx((a * 2.0).normalized(), a.normalized()));
        assert_eq!(-Vec3::Y, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn test_look_rotation_points_z_along_forward() {
        for forward in [
            Vec3::X,
            -Vec3::X,
            Vec3::Z,
            -Vec3::Z,
            Vec3::new(0.3, -0.8, 0.5),
            Vec3::Y,  // vertical: exercises the fallback up reference
            -Vec3::Y,
        ] {
            let q = Quat::look_rotation(forward);
            assert!(
                approx(q.rotate(Vec3::Z), forward.normalized()),
                "forward {forward:?}"
            );
            // Rotation preserves length
            assert!((q.rotate(Vec3::X).length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_look_rotation_basis_is_orthonormal() {
        let q = Quat::look_rotation(Vec3::new(1.0, 2.0, -0.5));
        let x = q.rotate(Vec3::X);
        let y = q.rotate(Vec3::Y);
        let z = q.rotate(Vec3::Z);
        assert!(x.dot(y).abs() < EPS);
        assert!(y.dot(z).abs() < EPS);
        assert!(approx(x.cross(y), z)); // right-handed
    }

    #[test]
    fn test_model_matrix_layout() {
        let t = Transform::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, 2.0);
        let m = t.to_model_matrix();
        // Column-major: translation in the last column
        assert_eq!(m[3], [1.0, 2.0, 3.0, 1.0]);
        // In-plane axes scaled, depth axis untouched
        assert_eq!(m[0][0], 2.0);
        assert_eq!(m[1][1], 2.0);
        assert_eq!(m[2][2], 1.0);
    }

    #[test]
    fn test_vec3_bytemuck() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 12); // 3 * 4 bytes
    }

    #[test]
    fn test_transform_size() {
        // position (12) + scale (4) + rotation (16), no padding
        assert_eq!(std::mem::size_of::<Transform>(), 32);
    }
}
