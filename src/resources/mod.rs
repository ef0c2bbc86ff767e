//! Embedded resources
//!
//! Configuration and branding assets compiled into the binary so the
//! launcher runs from a bare live image.

/// Launcher configuration document
pub const LAUNCHER_TOML: &str = include_str!("../../resources/launcher.toml");

/// Animated banner shown above the welcome text
pub const BANNER_GIF: &[u8] = include_bytes!("../../assets/apex.gif");

/// Distribution logo
pub const LOGO_PNG: &[u8] = include_bytes!("../../assets/logo.png");
