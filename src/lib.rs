//! Apex launcher library - welcome window for the Apex KLGE live image

pub mod changelog;
pub mod config;
pub mod events;
pub mod gui;
pub mod resources;
pub mod utils;

pub use config::LauncherConfig;
pub use utils::error::LauncherError;
