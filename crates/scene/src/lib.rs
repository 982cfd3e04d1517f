//! Scene graph for the haunted house: nodes, fog, camera and the builder that
//! populates them.
//!
//! # Invariants
//! - The scene is insertion-only; nodes are never removed.
//! - Node ids are assigned sequentially, so identical build sequences produce
//!   identical graphs.
//! - Grave placement is the only stochastic step and draws from the caller's RNG.

pub mod builder;
pub mod camera;
pub mod context;
pub mod fog;
pub mod node;
pub mod scene;

pub use builder::{GRAVE_COUNT, GravePlacement, HouseBuilder, SceneHandles, build_scene};
pub use camera::{OrbitControls, PerspectiveCamera};
pub use context::{SceneContext, Viewport};
pub use fog::Fog;
pub use node::{Geometry, Light, LightKind, Material, Node, NodeKind};
pub use scene::Scene;
