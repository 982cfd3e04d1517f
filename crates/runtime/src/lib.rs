//! Render loop for the haunted house.
//!
//! # Invariants
//! - The clock is read once per iteration and never reset.
//! - Only the three ghost lights and the camera move between frames.
//! - A stopped loop does no work; there is no way to restart it.
//! - Resize never changes scene content or loop cadence.

mod clock;
mod ghosts;
mod render_loop;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ghosts::{animate_ghosts, ghost_positions};
pub use render_loop::{FrameInfo, RenderLoop, resize};
pub use timer::FrameTimer;
