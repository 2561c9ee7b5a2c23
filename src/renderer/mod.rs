//! Software 3D rendering pipeline
//!
//! Transforms, culls, lights, clips, projects and rasterizes triangle
//! meshes into a pixel buffer with no hardware graphics API:
//! - Homogeneous vector/matrix math
//! - Near-plane and screen-edge clipping
//! - Depth-buffered, perspective-correct textured scanline fill
//! - Painter's-algorithm lite mode with face/edge overlays

pub mod math;
pub mod depth;
pub mod framebuffer;
pub mod texture;
pub mod triangle;
pub mod pipeline;

pub use depth::{DepthBuffer, DepthError};
pub use framebuffer::Framebuffer;
pub use pipeline::{RenderConfig, Renderer};
pub use texture::{Color, Texture};
pub use triangle::{Clipped, Triangle};
