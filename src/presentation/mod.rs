//! Presentation layer handling terminal UI and user input.
//!
//! Renders the dashboard tabs and dialogs with ratatui and maps key
//! presses onto the application state.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
