//! Rendering adapter: the interface the render loop draws through.
//!
//! # Invariants
//! - A draw target never mutates the scene.
//! - Resizing a target changes its output size only.
//!
//! The GPU backend lives in `haunted-render-wgpu`; [`DebugTextRenderer`] is a
//! headless target for the CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, DrawOutcome, DrawTarget, RenderError};
