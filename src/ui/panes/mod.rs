//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: program text with syntax highlighting and the current line
//! - [`visual`]: the specialized view for the current step's mode
//! - [`watch`]: bindings not consumed by the specialized view
//! - [`status`]: step counter, mode, speed, keybindings and play state
//!
//! Each module exports a `render_*` function that draws into a given area
//! and keeps no state of its own beyond the scroll structs passed in.

pub mod source;
pub mod status;
pub mod visual;
pub mod watch;

pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use visual::render_visual_pane;
pub use watch::{render_watch_pane, WatchScrollState};
