//! Triangle: clip-plane intersection, screen scaling, scanline raster
//!
//! The clip algorithm is used twice per frame: once against the near
//! view plane in camera space and once per screen edge in pixel space.

use std::ops::{Mul, MulAssign};

use super::depth::{DepthBuffer, DepthError};
use super::framebuffer::Framebuffer;
use super::math::{intersect_plane, Mat4x4, Vec2, Vec3};
use super::texture::{Color, Texture};

/// Triangle value type: three homogeneous positions, parallel texture
/// coordinates, a flat color and a per-frame illumination factor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Triangle {
    pub p: [Vec3; 3],
    pub t: [Vec2; 3],
    pub col: Color,
    pub illumination: f32,
}

/// Clip output: zero, one or two triangles, no heap
#[derive(Debug, Clone, Copy, Default)]
pub struct Clipped {
    tris: [Triangle; 2],
    len: usize,
}

impl Clipped {
    fn none() -> Self {
        Self::default()
    }

    fn one(tri: Triangle) -> Self {
        Self { tris: [tri, Triangle::default()], len: 1 }
    }

    fn two(a: Triangle, b: Triangle) -> Self {
        Self { tris: [a, b], len: 2 }
    }

    pub fn as_slice(&self) -> &[Triangle] {
        &self.tris[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Triangle {
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self { p: [p1, p2, p3], ..Default::default() }
    }

    pub fn set_texture_coords(&mut self, t1: Vec2, t2: Vec2, t3: Vec2) {
        self.t = [t1, t2, t3];
    }

    /// Normalized face normal from the two edges at p[0]
    pub fn normal(&self) -> Vec3 {
        let ab = self.p[1] - self.p[0];
        let ac = self.p[2] - self.p[0];
        ab.cross(ac).normalize()
    }

    /// Perspective divide for all three vertices. The texture
    /// coordinates are divided by the vertex w and each t[i].w becomes
    /// the reciprocal depth 1/w used by the depth test.
    pub fn project_div(&mut self) {
        for i in 0..3 {
            self.t[i].project_div(self.p[i].w);
            self.t[i].w = 1.0 / self.p[i].w;
            self.p[i].project_div();
        }
    }

    /// NDC to pixel space: negate X/Y, translate by +1, scale by half
    /// the viewport (Y-flip included)
    pub fn scale_to_display(&mut self, width: usize, height: usize) {
        for v in &mut self.p {
            v.x = (-v.x + 1.0) * 0.5 * width as f32;
            v.y = (-v.y + 1.0) * 0.5 * height as f32;
        }
    }

    /// Clip against the plane given by a point and a normal.
    ///
    /// Vertices with signed distance >= 0 are inside. Returns 0, 1 or
    /// 2 triangles; texture coordinates are interpolated with the same
    /// parametric t as the positions.
    pub fn clip_against_plane(plane_point: Vec3, plane_normal: Vec3, tri: &Triangle) -> Clipped {
        let normal = plane_normal.normalize();
        let dist = |point: Vec3| normal.dot(point) - normal.dot(plane_point);

        let mut inside: [(Vec3, Vec2); 3] = [(Vec3::ZERO, Vec2::default()); 3];
        let mut outside: [(Vec3, Vec2); 3] = [(Vec3::ZERO, Vec2::default()); 3];
        let mut inside_count = 0;
        let mut outside_count = 0;

        for i in 0..3 {
            if dist(tri.p[i]) >= 0.0 {
                inside[inside_count] = (tri.p[i], tri.t[i]);
                inside_count += 1;
            } else {
                outside[outside_count] = (tri.p[i], tri.t[i]);
                outside_count += 1;
            }
        }

        match inside_count {
            0 => Clipped::none(),
            3 => Clipped::one(*tri),
            1 => {
                // One vertex survives: the new triangle is the inside
                // vertex plus the two edge/plane intersections
                let mut out = *tri;
                out.p[0] = inside[0].0;
                out.t[0] = inside[0].1;

                let (p, t) = intersect_plane(plane_point, normal, inside[0].0, outside[0].0);
                out.p[1] = p;
                out.t[1] = Vec2::lerp(inside[0].1, outside[0].1, t);

                let (p, t) = intersect_plane(plane_point, normal, inside[0].0, outside[1].0);
                out.p[2] = p;
                out.t[2] = Vec2::lerp(inside[0].1, outside[1].1, t);

                Clipped::one(out)
            }
            _ => {
                // Two vertices survive: the clipped quad splits along
                // the diagonal from the first inside vertex's
                // intersection point
                let mut out1 = *tri;
                out1.p[0] = inside[0].0;
                out1.t[0] = inside[0].1;
                out1.p[1] = inside[1].0;
                out1.t[1] = inside[1].1;

                let (p, t) = intersect_plane(plane_point, normal, inside[0].0, outside[0].0);
                out1.p[2] = p;
                out1.t[2] = Vec2::lerp(inside[0].1, outside[0].1, t);

                let mut out2 = *tri;
                out2.p[0] = inside[1].0;
                out2.t[0] = inside[1].1;
                out2.p[1] = out1.p[2];
                out2.t[1] = out1.t[2];

                let (p, t) = intersect_plane(plane_point, normal, inside[1].0, outside[0].0);
                out2.p[2] = p;
                out2.t[2] = Vec2::lerp(inside[1].1, outside[0].1, t);

                Clipped::two(out1, out2)
            }
        }
    }

    /// Perspective-correct textured scanline fill.
    ///
    /// Expects screen-space positions and reciprocal depth in t[i].w.
    /// Streams points into the framebuffer where the depth test passes
    /// (strictly greater stored-w wins = nearer) and returns the number
    /// of pixels written. Untextured triangles use the flat color.
    pub fn fill_textured(
        &self,
        depth: &mut DepthBuffer,
        fb: &mut Framebuffer,
        texture: Option<&Texture>,
    ) -> Result<usize, DepthError> {
        let mut x1 = self.p[0].x as i32;
        let mut y1 = self.p[0].y as i32;
        let mut x2 = self.p[1].x as i32;
        let mut y2 = self.p[1].y as i32;
        let mut x3 = self.p[2].x as i32;
        let mut y3 = self.p[2].y as i32;

        let mut u1 = self.t[0].u;
        let mut v1 = self.t[0].v;
        let mut w1 = self.t[0].w;
        let mut u2 = self.t[1].u;
        let mut v2 = self.t[1].v;
        let mut w2 = self.t[1].w;
        let mut u3 = self.t[2].u;
        let mut v3 = self.t[2].v;
        let mut w3 = self.t[2].w;

        // Sort vertices top to bottom
        if y2 < y1 {
            std::mem::swap(&mut y1, &mut y2);
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut u1, &mut u2);
            std::mem::swap(&mut v1, &mut v2);
            std::mem::swap(&mut w1, &mut w2);
        }
        if y3 < y1 {
            std::mem::swap(&mut y1, &mut y3);
            std::mem::swap(&mut x1, &mut x3);
            std::mem::swap(&mut u1, &mut u3);
            std::mem::swap(&mut v1, &mut v3);
            std::mem::swap(&mut w1, &mut w3);
        }
        if y3 < y2 {
            std::mem::swap(&mut y2, &mut y3);
            std::mem::swap(&mut x2, &mut x3);
            std::mem::swap(&mut u2, &mut u3);
            std::mem::swap(&mut v2, &mut v3);
            std::mem::swap(&mut w2, &mut w3);
        }

        let mut dy1 = y2 - y1;
        let mut dx1 = x2 - x1;
        let mut du1 = u2 - u1;
        let mut dv1 = v2 - v1;
        let mut dw1 = w2 - w1;

        let dy2 = y3 - y1;
        let dx2 = x3 - x1;
        let du2 = u3 - u1;
        let dv2 = v3 - v1;
        let dw2 = w3 - w1;

        let mut dax_step = 0.0;
        let mut dbx_step = 0.0;
        let mut du1_step = 0.0;
        let mut dv1_step = 0.0;
        let mut dw1_step = 0.0;
        let mut du2_step = 0.0;
        let mut dv2_step = 0.0;
        let mut dw2_step = 0.0;

        if dy1 != 0 {
            dax_step = dx1 as f32 / dy1.abs() as f32;
            du1_step = du1 / dy1.abs() as f32;
            dv1_step = dv1 / dy1.abs() as f32;
            dw1_step = dw1 / dy1.abs() as f32;
        }
        if dy2 != 0 {
            dbx_step = dx2 as f32 / dy2.abs() as f32;
            du2_step = du2 / dy2.abs() as f32;
            dv2_step = dv2 / dy2.abs() as f32;
            dw2_step = dw2 / dy2.abs() as f32;
        }

        // Flat color used when no texture is bound
        let flat_col = self.col.shade(self.illumination);
        let mut written = 0;

        // Upper sub-triangle: y1 to y2
        if dy1 != 0 {
            for i in y1..=y2 {
                let ax = x1 + ((i - y1) as f32 * dax_step) as i32;
                let bx = x1 + ((i - y1) as f32 * dbx_step) as i32;

                let tex_su = u1 + (i - y1) as f32 * du1_step;
                let tex_sv = v1 + (i - y1) as f32 * dv1_step;
                let tex_sw = w1 + (i - y1) as f32 * dw1_step;

                let tex_eu = u1 + (i - y1) as f32 * du2_step;
                let tex_ev = v1 + (i - y1) as f32 * dv2_step;
                let tex_ew = w1 + (i - y1) as f32 * dw2_step;

                written += self.fill_row(
                    depth, fb, texture, flat_col, i,
                    (ax, tex_su, tex_sv, tex_sw),
                    (bx, tex_eu, tex_ev, tex_ew),
                )?;
            }
        }

        // Lower sub-triangle: y2 to y3, long edge interpolation
        // continues from the top vertex
        dy1 = y3 - y2;
        dx1 = x3 - x2;
        du1 = u3 - u2;
        dv1 = v3 - v2;
        dw1 = w3 - w2;

        if dy1 != 0 {
            dax_step = dx1 as f32 / dy1.abs() as f32;
            du1_step = du1 / dy1.abs() as f32;
            dv1_step = dv1 / dy1.abs() as f32;
            dw1_step = dw1 / dy1.abs() as f32;

            for i in y2..=y3 {
                let ax = x2 + ((i - y2) as f32 * dax_step) as i32;
                let bx = x1 + ((i - y1) as f32 * dbx_step) as i32;

                let tex_su = u2 + (i - y2) as f32 * du1_step;
                let tex_sv = v2 + (i - y2) as f32 * dv1_step;
                let tex_sw = w2 + (i - y2) as f32 * dw1_step;

                let tex_eu = u1 + (i - y1) as f32 * du2_step;
                let tex_ev = v1 + (i - y1) as f32 * dv2_step;
                let tex_ew = w1 + (i - y1) as f32 * dw2_step;

                written += self.fill_row(
                    depth, fb, texture, flat_col, i,
                    (ax, tex_su, tex_sv, tex_sw),
                    (bx, tex_eu, tex_ev, tex_ew),
                )?;
            }
        }

        Ok(written)
    }

    /// One scanline row between two interpolated edge points
    #[allow(clippy::too_many_arguments)]
    fn fill_row(
        &self,
        depth: &mut DepthBuffer,
        fb: &mut Framebuffer,
        texture: Option<&Texture>,
        flat_col: Color,
        row: i32,
        start: (i32, f32, f32, f32),
        end: (i32, f32, f32, f32),
    ) -> Result<usize, DepthError> {
        let (mut ax, mut su, mut sv, mut sw) = start;
        let (mut bx, mut eu, mut ev, mut ew) = end;

        if ax > bx {
            std::mem::swap(&mut ax, &mut bx);
            std::mem::swap(&mut su, &mut eu);
            std::mem::swap(&mut sv, &mut ev);
            std::mem::swap(&mut sw, &mut ew);
        }

        let t_step = 1.0 / (bx - ax) as f32;
        let mut t = 0.0;
        let mut written = 0;

        for j in ax..bx {
            let tex_u = (1.0 - t) * su + t * eu;
            let tex_v = (1.0 - t) * sv + t * ev;
            let tex_w = (1.0 - t) * sw + t * ew;

            let idx = row as usize * depth.width() + j as usize;
            if tex_w > depth.get(idx)? {
                let color = match texture {
                    Some(tex) => {
                        // Undo the perspective divide before fetching
                        let w_inv = 1.0 / tex_w;
                        let fetch_u = (tex_u * w_inv * tex.width as f32)
                            .clamp(0.0, tex.width as f32 - 1.0) as usize;
                        let fetch_v = (tex_v * w_inv * tex.height as f32)
                            .clamp(0.0, tex.height as f32 - 1.0) as usize;
                        tex.get_pixel(fetch_u, fetch_v).shade(self.illumination)
                    }
                    None => flat_col,
                };

                fb.set_pixel(j as usize, row as usize, color);
                depth.set(idx, tex_w)?;
                written += 1;
            }

            t += t_step;
        }

        Ok(written)
    }
}

impl Mul<Mat4x4> for Triangle {
    type Output = Triangle;

    fn mul(self, mat: Mat4x4) -> Triangle {
        let mut result = self;
        for i in 0..3 {
            result.p[i] = self.p[i] * mat;
        }
        result
    }
}

impl MulAssign<Mat4x4> for Triangle {
    fn mul_assign(&mut self, mat: Mat4x4) {
        for v in &mut self.p {
            *v = *v * mat;
        }
    }
}
