//! wgpu render backend for the haunted house.
//!
//! Draws every mesh node with flat-colored Lambert shading from the scene's
//! ambient, directional and point lights, then blends toward the fog color.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - GPU meshes are built once per distinct geometry; per-frame work is
//!   limited to uniforms and instance data.

mod gpu;
mod mesh;
mod shaders;
mod surface;

pub use gpu::{Globals, MAX_POINT_LIGHTS, WgpuRenderer};
pub use mesh::{MeshData, Vertex};
pub use surface::{Frame, GpuSurface};
