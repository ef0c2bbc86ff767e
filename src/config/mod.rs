//! Launcher configuration

mod launcher;

pub use launcher::*;
