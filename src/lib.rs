//! # Introduction
//!
//! tracetty replays the execution trace of an algorithm step by step and
//! draws each step the way the algorithm is usually explained: search arrays
//! with their boundary pointers, graphs with the visit frontier, binary
//! trees, dynamic-programming tables and sorting bars. The trace is recorded
//! by an external execution backend; tracetty only reads it.
//!
//! ## Execution pipeline
//!
//! ```text
//! Generator → Source → Backend → Snapshots → Playback → Classify → Layout → TUI
//! ```
//!
//! 1. [`templates`] and [`generator`]: starter programs, and synthetic array
//!    and graph inputs emitted as source text to append to the program.
//! 2. [`backend`]: posts the program to the execution service and decodes
//!    the trace, off the UI thread, discarding stale runs.
//! 3. [`snapshot`]: one recorded step (line, event, function, bindings).
//! 4. [`playback`]: the time-travel cursor over the snapshots, with
//!    play/pause and a single scheduled advance.
//! 5. [`value`] and [`classify`]: binding normalization and the ordered rule
//!    table that picks a visualization mode with its evidence.
//! 6. [`layout`]: one pure geometry engine per mode, plus the residual
//!    bindings for the watch list.
//! 7. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Visualization modes
//!
//! `tree`, `dp`, `sorting`, `graph`, `array`, tried in that order, with
//! `generic` as the fallback.

pub mod backend;
pub mod classify;
pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod playback;
pub mod snapshot;
pub mod templates;
pub mod ui;
pub mod value;
