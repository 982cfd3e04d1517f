//! Parameter panel: six bounded controls, each bound to one live scene field.
//!
//! # Invariants
//! - Each parameter has exactly one writer: its command function.
//! - The value a control displays is re-read from the scene after every write.
//! - No cross-parameter validation; fog near may exceed fog far.

pub mod commands;
mod panel;
mod param;

pub use panel::{Control, PANEL_WIDTH, ParameterPanel, apply, read};
pub use param::{ControlSpec, Folder, ParamId, ParamValue, PanelError, parse_assignment};
