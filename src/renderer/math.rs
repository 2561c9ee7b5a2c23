//! Vector and matrix math for the 3D pipeline
//!
//! Homogeneous vectors (w rides along for the perspective divide and
//! clip interpolation) and a row-major 4x4 matrix built only through
//! named constructors.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Degrees to radians
pub const RAD: f32 = std::f32::consts::PI / 180.0;

/// 3D vector with a homogeneous w component (defaults to 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Vec3 {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0, w: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// All three components set to the same value
    pub fn splat(xyz: f32) -> Self {
        Self::new(xyz, xyz, xyz)
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Zero-length input returns the zero vector, never divides by zero
    pub fn normalize(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        } else {
            Vec3::ZERO
        }
    }

    /// Perspective divide: x, y, z divided by w
    pub fn project_div(&mut self) {
        self.x /= self.w;
        self.y /= self.w;
        self.z /= self.w;
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul for Vec3 {
    type Output = Vec3;
    fn mul(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }
}

impl Div for Vec3 {
    type Output = Vec3;
    fn div(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x / other.x, self.y / other.y, self.z / other.z)
    }
}

impl Add<f32> for Vec3 {
    type Output = Vec3;
    fn add(self, f: f32) -> Vec3 {
        Vec3::new(self.x + f, self.y + f, self.z + f)
    }
}

impl Sub<f32> for Vec3 {
    type Output = Vec3;
    fn sub(self, f: f32) -> Vec3 {
        Vec3::new(self.x - f, self.y - f, self.z - f)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, f: f32) -> Vec3 {
        Vec3::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, f: f32) -> Vec3 {
        Vec3::new(self.x / f, self.y / f, self.z / f)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Vec3) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl MulAssign for Vec3 {
    fn mul_assign(&mut self, other: Vec3) {
        self.x *= other.x;
        self.y *= other.y;
        self.z *= other.z;
    }
}

impl DivAssign for Vec3 {
    fn div_assign(&mut self, other: Vec3) {
        self.x /= other.x;
        self.y /= other.y;
        self.z /= other.z;
    }
}

impl Mul<Mat4x4> for Vec3 {
    type Output = Vec3;

    /// Row-vector times matrix; produces a fresh w for the divide
    fn mul(self, mat: Mat4x4) -> Vec3 {
        let m = &mat.m;
        Vec3 {
            x: self.x * m[0][0] + self.y * m[1][0] + self.z * m[2][0] + self.w * m[3][0],
            y: self.x * m[0][1] + self.y * m[1][1] + self.z * m[2][1] + self.w * m[3][1],
            z: self.x * m[0][2] + self.y * m[1][2] + self.z * m[2][2] + self.w * m[3][2],
            w: self.x * m[0][3] + self.y * m[1][3] + self.z * m[2][3] + self.w * m[3][3],
        }
    }
}

/// Intersection of the line segment (start, end) with a plane.
///
/// Returns the intersection point and the parametric t along the
/// segment. The denominator is the difference of the two endpoint
/// projections onto the normal; callers must pass endpoints on
/// opposite sides of the plane (the clipper guarantees this), an edge
/// lying in the plane yields non-finite output.
pub fn intersect_plane(
    plane_point: Vec3,
    plane_normal: Vec3,
    line_start: Vec3,
    line_end: Vec3,
) -> (Vec3, f32) {
    let normal = plane_normal.normalize();
    let plane_d = -normal.dot(plane_point);
    let ad = line_start.dot(normal);
    let bd = line_end.dot(normal);
    let t = (-plane_d - ad) / (bd - ad);
    (line_start + (line_end - line_start) * t, t)
}

/// 2D texture coordinate with a homogeneous w component (defaults to 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub u: f32,
    pub v: f32,
    pub w: f32,
}

impl Default for Vec2 {
    fn default() -> Self {
        Self { u: 0.0, v: 0.0, w: 1.0 }
    }
}

impl Vec2 {
    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v, w: 1.0 }
    }

    /// Perspective divide for texture coordinates (by the vertex w)
    pub fn project_div(&mut self, w: f32) {
        self.u /= w;
        self.v /= w;
    }

    /// Linear interpolation of u, v and w (clip interpolation)
    pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        Vec2 {
            u: a.u + t * (b.u - a.u),
            v: a.v + t * (b.v - a.v),
            w: a.w + t * (b.w - a.w),
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.u + other.u, self.v + other.v)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.u - other.u, self.v - other.v)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, f: f32) -> Vec2 {
        Vec2::new(self.u * f, self.v * f)
    }
}

/// Row-major 4x4 transform matrix
///
/// Only built through the named constructors below; the raw array is
/// never hand-edited elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4x4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Mat4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4x4 {
    pub fn identity() -> Self {
        let mut m = [[0.0; 4]; 4];
        m[0][0] = 1.0;
        m[1][1] = 1.0;
        m[2][2] = 1.0;
        m[3][3] = 1.0;
        Self { m }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut mat = Self::identity();
        mat.m[3][0] = x;
        mat.m[3][1] = y;
        mat.m[3][2] = z;
        mat
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut mat = Self::identity();
        mat.m[0][0] = x;
        mat.m[1][1] = y;
        mat.m[2][2] = z;
        mat
    }

    /// Rotation around the X axis, angle in degrees
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = (angle * RAD).sin_cos();
        let mut mat = Self::identity();
        mat.m[1][1] = c;
        mat.m[1][2] = s;
        mat.m[2][1] = -s;
        mat.m[2][2] = c;
        mat
    }

    /// Rotation around the Y axis, angle in degrees
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = (angle * RAD).sin_cos();
        let mut mat = Self::identity();
        mat.m[0][0] = c;
        mat.m[0][2] = s;
        mat.m[2][0] = -s;
        mat.m[2][2] = c;
        mat
    }

    /// Rotation around the Z axis, angle in degrees
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = (angle * RAD).sin_cos();
        let mut mat = Self::identity();
        mat.m[0][0] = c;
        mat.m[0][1] = s;
        mat.m[1][0] = -s;
        mat.m[1][1] = c;
        mat
    }

    /// Symmetric perspective projection, fov in degrees
    ///
    /// Third row maps depth to far/(far-near), the fourth column
    /// copies z into w for the perspective divide.
    pub fn projection(near: f32, far: f32, fov: f32, aspect: f32) -> Self {
        let fov_rad = 1.0 / (fov * 0.5 * RAD).tan();
        let mut mat = Self { m: [[0.0; 4]; 4] };
        mat.m[0][0] = aspect * fov_rad;
        mat.m[1][1] = fov_rad;
        mat.m[2][2] = far / (far - near);
        mat.m[2][3] = 1.0;
        mat.m[3][2] = (-far * near) / (far - near);
        mat
    }

    /// Camera basis matrix: right/up/forward rows plus the eye position
    pub fn point_at(pos: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - pos).normalize();
        let new_up = (up - forward * up.dot(forward)).normalize();
        let right = new_up.cross(forward);

        let mut mat = Self::identity();
        mat.m[0] = [right.x, right.y, right.z, 0.0];
        mat.m[1] = [new_up.x, new_up.y, new_up.z, 0.0];
        mat.m[2] = [forward.x, forward.y, forward.z, 0.0];
        mat.m[3] = [pos.x, pos.y, pos.z, 1.0];
        mat
    }

    /// Closed-form inverse, valid only for rotation + translation
    /// matrices: transposes the 3x3 block and re-derives the
    /// translation row from its dots with the basis rows.
    pub fn inverse(mat: &Mat4x4) -> Self {
        let m = &mat.m;
        let mut inv = Self::identity();
        for i in 0..3 {
            for j in 0..3 {
                inv.m[i][j] = m[j][i];
            }
        }
        for j in 0..3 {
            inv.m[3][j] = -(m[3][0] * inv.m[0][j] + m[3][1] * inv.m[1][j] + m[3][2] * inv.m[2][j]);
        }
        inv
    }
}

impl Mul for Mat4x4 {
    type Output = Mat4x4;

    fn mul(self, other: Mat4x4) -> Mat4x4 {
        let mut result = Mat4x4 { m: [[0.0; 4]; 4] };
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result.m[i][j] += self.m[i][k] * other.m[k][j];
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.0001;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a.x - b.x).abs() < EPS, "x: {} vs {}", a.x, b.x);
        assert!((a.y - b.y).abs() < EPS, "y: {} vs {}", a.y, b.y);
        assert!((a.z - b.z).abs() < EPS, "z: {} vs {}", a.z, b.z);
    }

    #[test]
    fn test_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < EPS);
    }

    #[test]
    fn test_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        assert_vec_eq(a.cross(b), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = Vec3::new(3.0, -4.0, 12.0).normalize();
        assert!((v.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let v = Vec3::ZERO.normalize();
        assert_vec_eq(v, Vec3::ZERO);
    }

    #[test]
    fn test_project_div() {
        let mut v = Vec3::new(4.0, 8.0, 2.0);
        v.w = 2.0;
        v.project_div();
        assert_vec_eq(v, Vec3::new(2.0, 4.0, 1.0));
    }

    #[test]
    fn test_vec_mat_translation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let out = v * Mat4x4::translation(10.0, 20.0, 30.0);
        assert_vec_eq(out, Vec3::new(11.0, 22.0, 33.0));
        assert!((out.w - 1.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_degrees() {
        // 90 degrees around Y maps +X onto +Z (row-vector convention)
        let v = Vec3::new(1.0, 0.0, 0.0) * Mat4x4::rotation_y(90.0);
        assert_vec_eq(v, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_projection_writes_w() {
        let mat = Mat4x4::projection(0.1, 1000.0, 90.0, 1.0);
        let v = Vec3::new(0.0, 0.0, 5.0) * mat;
        // w picks up the view-space z
        assert!((v.w - 5.0).abs() < EPS);
        assert!(v.z > 0.0);
    }

    #[test]
    fn test_rotation_translation_inverse_round_trip() {
        let mat = Mat4x4::rotation_x(30.0) * Mat4x4::rotation_y(45.0)
            * Mat4x4::translation(1.0, -2.0, 3.0);
        let inv = Mat4x4::inverse(&mat);
        let v = Vec3::new(0.5, -1.5, 2.5);
        assert_vec_eq((v * mat) * inv, v);
    }

    #[test]
    fn test_point_at_inverse_is_view() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(1.0, 2.0, 4.0);
        let view = Mat4x4::inverse(&Mat4x4::point_at(eye, target, Vec3::UP));
        // The eye maps to the origin of camera space
        assert_vec_eq(eye * view, Vec3::ZERO);
    }

    #[test]
    fn test_intersect_plane_midpoint() {
        let (p, t) = intersect_plane(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        );
        assert!((t - 0.5).abs() < EPS);
        assert_vec_eq(p, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_vec2_lerp_carries_w() {
        let mut a = Vec2::new(0.0, 0.0);
        a.w = 1.0;
        let mut b = Vec2::new(1.0, 2.0);
        b.w = 3.0;
        let out = Vec2::lerp(a, b, 0.5);
        assert!((out.u - 0.5).abs() < EPS);
        assert!((out.v - 1.0).abs() < EPS);
        assert!((out.w - 2.0).abs() < EPS);
    }
}
