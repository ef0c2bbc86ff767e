//! Launcher GUI module
//!
//! The main window with its branding and three action buttons, the warning
//! dialog, and the changelog windows it spawns.

mod app;
mod branding;
mod panels;
mod state;
mod viewer;

pub use app::LauncherGui;
pub use panels::Palette;
pub use state::{Action, ActionId, Binding, LauncherState, Notice};
pub use viewer::ChangelogWindow;
