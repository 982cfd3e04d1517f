//! Shared types used across the haunted house crates.

mod color;
mod types;

pub use color::{Color, ColorError};
pub use types::{NodeId, Transform};
