//! Apex launcher - welcome window for the Apex KLGE Minimal live image
//!
//! Offers the Calamares and Apex Arch installers and shows the release
//! changelog.

use anyhow::Context;
use apex_launcher::gui::LauncherGui;
use apex_launcher::LauncherConfig;
use eframe::egui;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_target(false)
        .init();

    let config = LauncherConfig::embedded().context("embedded launcher configuration")?;
    let branding = &config.branding;
    info!("Starting {}", branding.window_title);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(branding.window_title.as_str())
            .with_inner_size([branding.width, branding.height])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "apex-launcher",
        options,
        Box::new(move |cc| Ok(Box::new(LauncherGui::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {}", e))
}
