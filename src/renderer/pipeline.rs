//! Per-frame render pipeline
//!
//! Strictly ordered stages: matrix update, backface cull, lighting,
//! near-plane clip, projection, screen scaling, four-edge screen clip,
//! rasterization. One logical thread owns the whole frame.

use serde::{Deserialize, Serialize};

use super::depth::{DepthBuffer, DepthError};
use super::framebuffer::Framebuffer;
use super::math::{Mat4x4, Vec3};
use super::texture::Color;
use super::triangle::Triangle;
use crate::scene::{Camera, Light, Mesh};

/// Runtime render configuration (a RON document on disk)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub near: f32,
    pub far: f32,
    pub fov: f32,
    /// Sample mesh textures; flat triangle colors otherwise
    pub textured: bool,
    pub back_face_culling: bool,
    /// Painter's-algorithm mode: no depth test, flat fills and edges
    pub lite_mode: bool,
    /// Lite mode: fill faces
    pub face_overlay: bool,
    /// Lite mode: outline edges
    pub edge_overlay: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            near: 0.1,
            far: 1000.0,
            fov: 80.0,
            textured: true,
            back_face_culling: true,
            lite_mode: false,
            face_overlay: true,
            edge_overlay: false,
        }
    }
}

impl RenderConfig {
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        ron::from_str(&source).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    /// Load, falling back to defaults when the file is absent or broken
    pub fn load_or_default<P: AsRef<std::path::Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                println!("{}; using default render config", e);
                Self::default()
            }
        }
    }
}

/// Edge color for the lite-mode wireframe overlay
const EDGE_COLOR: Color = Color { r: 255, g: 128, b: 0 };

/// The render pipeline orchestrator
///
/// Owns the view/projection matrices and the depth buffer; borrows
/// meshes, camera and light per frame and never mutates them.
pub struct Renderer {
    config: RenderConfig,
    mat_view: Mat4x4,
    mat_proj: Mat4x4,
    depth: DepthBuffer,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Self, DepthError> {
        let depth = DepthBuffer::new(config.width, config.height)?;
        Ok(Self {
            config,
            mat_view: Mat4x4::identity(),
            mat_proj: Mat4x4::identity(),
            depth,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Recompute the view and projection matrices. Called once per
    /// frame before any mesh processing.
    pub fn update(&mut self, camera: &Camera) {
        let point_at = Mat4x4::point_at(camera.pos(), camera.pos() + camera.dir(), Vec3::UP);
        self.mat_view = Mat4x4::inverse(&point_at);
        self.mat_proj = Mat4x4::projection(
            self.config.near,
            self.config.far,
            self.config.fov,
            self.config.height as f32 / self.config.width as f32,
        );
    }

    /// Render all meshes into the framebuffer
    pub fn render(&mut self, meshes: &[Mesh], light: &Light, camera: &Camera, fb: &mut Framebuffer) {
        // 0.0 reads as infinitely far under the reciprocal-depth
        // convention
        self.depth.clear(0.0);

        let near_point = Vec3::new(0.0, 0.0, self.config.near);
        let near_normal = Vec3::new(0.0, 0.0, 1.0);

        for mesh in meshes {
            let mut projected: Vec<Triangle> = Vec::new();

            for triangle in mesh.transformed_triangles() {
                let normal = triangle.normal();

                // A zero-length normal (degenerate face) fails the cull
                // test and lights to the ambient floor; the frame never
                // aborts on bad geometry
                if self.config.back_face_culling
                    && normal.dot(triangle.p[0] - camera.pos()) >= 0.0
                {
                    continue;
                }

                let mut lit = triangle;
                lit.illumination = normal.dot(light.dir()).max(0.3);

                let viewed = lit * self.mat_view;

                for clipped in Triangle::clip_against_plane(near_point, near_normal, &viewed)
                    .as_slice()
                {
                    let mut proj = *clipped * self.mat_proj;
                    proj.project_div();
                    proj.scale_to_display(self.config.width, self.config.height);
                    projected.push(proj);
                }
            }

            // Painter's algorithm stands in for the depth test in lite
            // mode: back-to-front by average Z
            if self.config.lite_mode {
                projected.sort_by(|a, b| {
                    let za = (a.p[0].z + a.p[1].z + a.p[2].z) / 3.0;
                    let zb = (b.p[0].z + b.p[1].z + b.p[2].z) / 3.0;
                    zb.total_cmp(&za)
                });
            }

            let rendered = self.clip_to_screen(projected);

            if self.config.lite_mode {
                self.draw_lite(&rendered, fb);
            } else {
                let texture = if self.config.textured { mesh.texture() } else { None };
                for tri in &rendered {
                    // Screen clipping keeps coordinates inside the
                    // buffer; a triangle that still lands outside
                    // aborts by itself without taking the frame
                    let _ = tri.fill_textured(&mut self.depth, fb, texture);
                }
            }
        }
    }

    /// Clip projected triangles against the four screen edges.
    ///
    /// Two-buffer ping-pong: one edge's output is the next edge's
    /// input, each edge fully drained before the next starts.
    fn clip_to_screen(&self, projected: Vec<Triangle>) -> Vec<Triangle> {
        let width = self.config.width as f32;
        let height = self.config.height as f32;
        let edges = [
            (Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, height - 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
            (Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)),
            (Vec3::new(width - 1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
        ];

        let mut current = projected;
        let mut next = Vec::with_capacity(current.len());

        for (point, normal) in edges {
            for tri in current.drain(..) {
                next.extend_from_slice(Triangle::clip_against_plane(point, normal, &tri).as_slice());
            }
            std::mem::swap(&mut current, &mut next);
        }

        current
    }

    /// Lite-mode output: flat face fills and/or wireframe edges
    fn draw_lite(&self, triangles: &[Triangle], fb: &mut Framebuffer) {
        for tri in triangles {
            if self.config.face_overlay {
                let face_color = tri.col.shade(tri.illumination);
                fb.fill_triangle(tri.p[0], tri.p[1], tri.p[2], face_color);
            }

            if self.config.edge_overlay {
                let [a, b, c] = tri.p;
                fb.draw_line(a.x as i32, a.y as i32, b.x as i32, b.y as i32, EDGE_COLOR);
                fb.draw_line(b.x as i32, b.y as i32, c.x as i32, c.y as i32, EDGE_COLOR);
                fb.draw_line(c.x as i32, c.y as i32, a.x as i32, a.y as i32, EDGE_COLOR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::math::Vec3;

    fn test_config() -> RenderConfig {
        RenderConfig {
            width: 64,
            height: 64,
            near: 0.1,
            far: 1000.0,
            fov: 90.0,
            textured: false,
            back_face_culling: false,
            lite_mode: false,
            face_overlay: true,
            edge_overlay: false,
        }
    }

    fn scene() -> (Light, Camera) {
        (Light::new(Vec3::new(0.8, 1.0, -0.5)), Camera::new())
    }

    #[test]
    fn test_cube_in_frustum_writes_depth() {
        let mut renderer = Renderer::new(test_config()).unwrap();
        let mut fb = Framebuffer::new(64, 64);
        let (light, camera) = scene();

        let mut mesh = Mesh::cube();
        mesh.translate(Vec3::new(0.0, 0.0, 4.0));

        renderer.update(&camera);
        renderer.render(std::slice::from_ref(&mesh), &light, &camera, &mut fb);

        let lit = fb.lit_pixels();
        assert!(lit > 0, "cube in the frustum must cover pixels");

        // Every covered pixel carries a valid reciprocal depth > 0
        let depth = renderer.depth();
        let stored = (0..depth.len())
            .filter(|&i| depth.get(i).unwrap() > 0.0)
            .count();
        assert_eq!(stored, lit);
    }

    #[test]
    fn test_render_is_depth_stable_across_frames() {
        let mut renderer = Renderer::new(test_config()).unwrap();
        let (light, camera) = scene();

        let mut mesh = Mesh::cube();
        mesh.translate(Vec3::new(0.0, 0.0, 4.0));

        renderer.update(&camera);

        let mut first = Framebuffer::new(64, 64);
        renderer.render(std::slice::from_ref(&mesh), &light, &camera, &mut first);
        let mut second = Framebuffer::new(64, 64);
        renderer.render(std::slice::from_ref(&mesh), &light, &camera, &mut second);

        // Pixel-exact, flicker-free output frame to frame
        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn test_mesh_behind_camera_renders_nothing() {
        let mut renderer = Renderer::new(test_config()).unwrap();
        let mut fb = Framebuffer::new(64, 64);
        let (light, camera) = scene();

        let mut mesh = Mesh::cube();
        mesh.translate(Vec3::new(0.0, 0.0, -4.0));

        renderer.update(&camera);
        renderer.render(std::slice::from_ref(&mesh), &light, &camera, &mut fb);

        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn test_backface_culling_reduces_coverage() {
        let (light, camera) = scene();
        let mut mesh = Mesh::cube();
        mesh.translate(Vec3::new(0.0, 0.0, 4.0));

        let mut culled_writes = 0;
        let mut unculled_writes = 0;
        for (culling, writes) in [(true, &mut culled_writes), (false, &mut unculled_writes)] {
            let mut config = test_config();
            config.back_face_culling = culling;
            let mut renderer = Renderer::new(config).unwrap();
            let mut fb = Framebuffer::new(64, 64);
            renderer.update(&camera);
            renderer.render(std::slice::from_ref(&mesh), &light, &camera, &mut fb);
            *writes = fb.lit_pixels();
        }

        // Back faces project inside the front silhouette, so coverage
        // never shrinks with culling off
        assert!(culled_writes > 0);
        assert!(unculled_writes >= culled_writes);
    }

    #[test]
    fn test_lite_mode_skips_depth_buffer() {
        let mut config = test_config();
        config.lite_mode = true;
        let mut renderer = Renderer::new(config).unwrap();
        let mut fb = Framebuffer::new(64, 64);
        let (light, camera) = scene();

        let mut mesh = Mesh::cube();
        mesh.translate(Vec3::new(0.0, 0.0, 4.0));

        renderer.update(&camera);
        renderer.render(std::slice::from_ref(&mesh), &light, &camera, &mut fb);

        assert!(fb.lit_pixels() > 0);
        let depth = renderer.depth();
        for i in 0..depth.len() {
            assert_eq!(depth.get(i).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_config_ron_round_trip() {
        let config = test_config();
        let doc = ron::to_string(&config).unwrap();
        let parsed: RenderConfig = ron::from_str(&doc).unwrap();
        assert_eq!(parsed.width, config.width);
        assert_eq!(parsed.fov, config.fov);
        assert_eq!(parsed.lite_mode, config.lite_mode);
    }

    #[test]
    fn test_config_partial_document_uses_defaults() {
        let parsed: RenderConfig = ron::from_str("(width: 320, height: 240)").unwrap();
        assert_eq!(parsed.width, 320);
        assert_eq!(parsed.height, 240);
        assert_eq!(parsed.fov, RenderConfig::default().fov);
    }
}
