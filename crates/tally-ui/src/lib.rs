//! Terminal UI layer for the tally tools.
//!
//! Provides themes, header/control/status components, the file picker, one
//! view per tool, and the main application event loop built on top of
//! [`ratatui`].

pub mod analyzer_view;
pub mod app;
pub mod cloud_view;
pub mod components;
pub mod file_picker;
pub mod quantum_view;
pub mod state;
pub mod themes;

pub use tally_core as core;
