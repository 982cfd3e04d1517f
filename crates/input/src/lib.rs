//! Pointer input for the orbit camera.
//!
//! # Invariants
//! - Raw pointer events become [`Action`]s; only actions touch the controls.
//! - Actions queue motion on the controls; the render loop applies it.

pub mod action;

pub use action::{Action, PointerButton, PointerTracker, apply_action};
