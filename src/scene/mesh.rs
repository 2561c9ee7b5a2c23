//! Triangle mesh: geometry, transform triple, optional texture
//!
//! Loads the OBJ subset the renderer needs (v/vt/f with polygon fan
//! triangulation). The pipeline borrows the transformed triangles each
//! frame; the mesh exclusively owns its texture.

use crate::renderer::math::{Mat4x4, Vec2, Vec3};
use crate::renderer::texture::Texture;
use crate::renderer::triangle::Triangle;

pub struct Mesh {
    triangles: Vec<Triangle>,
    position: Vec3,
    scale: Vec3,
    rotation: Vec3,
    texture: Option<Texture>,
}

impl Mesh {
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            position: Vec3::ZERO,
            scale: Vec3::splat(1.0),
            rotation: Vec3::ZERO,
            texture: None,
        }
    }

    /// Load an OBJ model
    pub fn from_obj<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to open obj file {}: {}", path.display(), e))?;
        let triangles = parse_obj(&source)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
        println!("Loaded mesh: {} ({} triangles)", path.display(), triangles.len());
        Ok(Self::from_triangles(triangles))
    }

    /// Load an OBJ model plus its texture image
    pub fn with_texture<P: AsRef<std::path::Path>>(
        model_path: P,
        texture_path: P,
    ) -> Result<Self, String> {
        let mut mesh = Self::from_obj(model_path)?;
        mesh.texture = Some(Texture::from_file(texture_path)?);
        Ok(mesh)
    }

    /// Built-in unit cube centered at the origin, quad texture
    /// coordinates per face
    pub fn cube() -> Self {
        // Each face: four corners, split into two triangles
        let faces: [[Vec3; 4]; 6] = [
            // South (-Z)
            [v(0, 0, 0), v(0, 1, 0), v(1, 1, 0), v(1, 0, 0)],
            // East (+X)
            [v(1, 0, 0), v(1, 1, 0), v(1, 1, 1), v(1, 0, 1)],
            // North (+Z)
            [v(1, 0, 1), v(1, 1, 1), v(0, 1, 1), v(0, 0, 1)],
            // West (-X)
            [v(0, 0, 1), v(0, 1, 1), v(0, 1, 0), v(0, 0, 0)],
            // Top (+Y)
            [v(0, 1, 0), v(0, 1, 1), v(1, 1, 1), v(1, 1, 0)],
            // Bottom (-Y)
            [v(1, 0, 1), v(0, 0, 1), v(0, 0, 0), v(1, 0, 0)],
        ];

        let mut triangles = Vec::with_capacity(12);
        for [p0, p1, p2, p3] in faces {
            let mut a = Triangle::new(p0, p1, p2);
            a.set_texture_coords(Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
            let mut b = Triangle::new(p0, p2, p3);
            b.set_texture_coords(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0));
            triangles.push(a);
            triangles.push(b);
        }

        Self::from_triangles(triangles)
    }

    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    pub fn scale_by(&mut self, scale: Vec3) {
        self.scale *= scale;
    }

    /// Rotation angles in degrees, accumulated per axis
    pub fn rotate(&mut self, angle: Vec3) {
        self.rotation += angle;
    }

    /// World-space triangles: scale, then rotation (X, Y, Z), then
    /// translation
    pub fn transformed_triangles(&self) -> Vec<Triangle> {
        let mat_scale = Mat4x4::scale(self.scale.x, self.scale.y, self.scale.z);
        let mat_rot = Mat4x4::rotation_x(self.rotation.x)
            * Mat4x4::rotation_y(self.rotation.y)
            * Mat4x4::rotation_z(self.rotation.z);
        let mat_trans = Mat4x4::translation(self.position.x, self.position.y, self.position.z);

        self.triangles
            .iter()
            .map(|tri| ((*tri * mat_scale) * mat_rot) * mat_trans)
            .collect()
    }
}

/// Cube corner helper: integer lattice shifted to center the cube
fn v(x: i32, y: i32, z: i32) -> Vec3 {
    Vec3::new(x as f32 - 0.5, y as f32 - 0.5, z as f32 - 0.5)
}

/// Parse the OBJ subset: v, vt (v flipped), f with 1-based v/vt/...
/// indices and polygon fan triangulation
fn parse_obj(source: &str) -> Result<Vec<Triangle>, String> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut triangles: Vec<Triangle> = Vec::new();

    for (line_no, line) in source.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let prefix = match tokens.next() {
            Some(p) => p,
            None => continue,
        };

        match prefix {
            "v" => {
                let coords = parse_floats::<3>(&mut tokens)
                    .ok_or_else(|| format!("line {}: malformed vertex", line_no + 1))?;
                vertices.push(Vec3::new(coords[0], coords[1], coords[2]));
            }
            "vt" => {
                let coords = parse_floats::<2>(&mut tokens)
                    .ok_or_else(|| format!("line {}: malformed texture coordinate", line_no + 1))?;
                // V runs top-down in this engine
                tex_coords.push(Vec2::new(coords[0], 1.0 - coords[1]));
            }
            "f" => {
                let mut vertex_indices: Vec<usize> = Vec::new();
                let mut texture_indices: Vec<Option<usize>> = Vec::new();

                for token in tokens {
                    let (v_idx, t_idx) = parse_face_token(token)
                        .ok_or_else(|| format!("line {}: malformed face token '{}'", line_no + 1, token))?;
                    vertex_indices.push(v_idx);
                    texture_indices.push(t_idx);
                }

                // Fan triangulation from the first vertex
                for i in 1..vertex_indices.len().saturating_sub(1) {
                    let fetch = |idx: usize| -> Result<Vec3, String> {
                        vertices
                            .get(vertex_indices[idx])
                            .copied()
                            .ok_or_else(|| format!("line {}: vertex index out of range", line_no + 1))
                    };
                    let mut tri = Triangle::new(fetch(0)?, fetch(i)?, fetch(i + 1)?);

                    if let (Some(t0), Some(t1), Some(t2)) =
                        (texture_indices[0], texture_indices[i], texture_indices[i + 1])
                    {
                        let fetch_t = |idx: usize| -> Result<Vec2, String> {
                            tex_coords
                                .get(idx)
                                .copied()
                                .ok_or_else(|| format!("line {}: texture index out of range", line_no + 1))
                        };
                        tri.set_texture_coords(fetch_t(t0)?, fetch_t(t1)?, fetch_t(t2)?);
                    }

                    triangles.push(tri);
                }
            }
            _ => {}
        }
    }

    Ok(triangles)
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = tokens.next()?.parse().ok()?;
    }
    Some(out)
}

/// One face token: "i", "i/j", "i/j/k" or "i//k", 1-based indices
fn parse_face_token(token: &str) -> Option<(usize, Option<usize>)> {
    let mut parts = token.split('/');
    let v_idx = parts.next()?.parse::<usize>().ok()?.checked_sub(1)?;
    let t_idx = match parts.next() {
        Some("") | None => None,
        Some(t) => Some(t.parse::<usize>().ok()?.checked_sub(1)?),
    };
    Some((v_idx, t_idx))
}
