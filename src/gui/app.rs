//! Main GUI application

use crate::config::LauncherConfig;
use crate::resources;
use crate::utils::command::command_exists;
use eframe::egui;
use tracing::{info, warn};

use super::branding::{load_texture, AnimatedImage};
use super::panels::{self, Palette};
use super::state::LauncherState;

/// Main launcher window
pub struct LauncherGui {
    state: LauncherState,
    palette: Palette,
    banner: Option<AnimatedImage>,
    logo: Option<egui::TextureHandle>,
}

impl LauncherGui {
    pub fn new(cc: &eframe::CreationContext<'_>, config: LauncherConfig) -> Self {
        let palette = Palette::from_branding(&config.branding);
        palette.apply(&cc.egui_ctx);

        let banner = AnimatedImage::from_gif(&cc.egui_ctx, "banner", resources::BANNER_GIF);
        let logo = load_texture(&cc.egui_ctx, "logo", resources::LOGO_PNG);

        log_missing_programs(&config);

        Self {
            state: LauncherState::new(config, Some(cc.egui_ctx.clone())),
            palette,
            banner,
            logo,
        }
    }
}

/// Startup diagnostic only; the buttons stay enabled either way.
fn log_missing_programs(config: &LauncherConfig) {
    let installers = &config.installers;
    for program in [
        &installers.privilege_helper,
        &installers.elevated_program,
        &installers.direct_program,
    ] {
        if command_exists(program) {
            info!("Found {} in PATH", program);
        } else {
            warn!("{} not found in PATH", program);
        }
    }
}

impl eframe::App for LauncherGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.process_events();

        let palette = self.palette;
        let mut pressed = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(palette.background).inner_margin(16.0))
            .show(ctx, |ui| {
                panels::branding_panel(
                    ui,
                    self.banner.as_ref(),
                    self.logo.as_ref(),
                    &self.state.config().branding.welcome_text,
                    palette,
                );
                pressed = panels::action_buttons(ui, self.state.bindings(), palette);
            });

        if let Some(id) = pressed {
            info!("Button pressed: {:?}", id);
            self.state.trigger(id);
        }

        let acknowledged = self
            .state
            .current_notice()
            .map(|notice| panels::notice_modal(ctx, notice))
            .unwrap_or(false);
        if acknowledged {
            self.state.dismiss_notice();
        }

        let closed: Vec<u64> = self
            .state
            .changelog_windows()
            .iter()
            .filter(|w| !w.show(ctx, palette))
            .map(|w| w.id())
            .collect();
        for id in closed {
            info!("Changelog window #{} closed", id);
            self.state.close_changelog(id);
        }
    }
}
