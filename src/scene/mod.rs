//! Scene data the pipeline consumes: camera, light, meshes

pub mod camera;
pub mod light;
pub mod mesh;

pub use camera::Camera;
pub use light::Light;
pub use mesh::Mesh;
