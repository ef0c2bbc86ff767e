//! Panel components for the main window

use crate::config::{parse_hex_color, BrandingConfig};
use eframe::egui;
use egui::{Color32, RichText, Ui};

use super::branding::AnimatedImage;
use super::state::{ActionId, Binding, Notice};

/// Window colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color32,
    pub foreground: Color32,
}

impl Palette {
    pub fn from_branding(branding: &BrandingConfig) -> Self {
        let rgb = |value: &str, fallback: Color32| {
            parse_hex_color(value)
                .map(|[r, g, b]| Color32::from_rgb(r, g, b))
                .unwrap_or(fallback)
        };
        Self {
            background: rgb(&branding.background, Color32::from_rgb(0x00, 0x56, 0x8f)),
            foreground: rgb(&branding.foreground, Color32::GOLD),
        }
    }

    /// Apply to the egui style shared by every viewport
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.background;
        visuals.window_fill = self.background;
        visuals.override_text_color = Some(self.foreground);
        visuals.widgets.inactive.weak_bg_fill = self.background;
        visuals.widgets.inactive.bg_fill = self.background;
        ctx.set_visuals(visuals);
    }
}

/// Banner, logo and welcome text
pub fn branding_panel(
    ui: &mut Ui,
    banner: Option<&AnimatedImage>,
    logo: Option<&egui::TextureHandle>,
    welcome: &str,
    palette: Palette,
) {
    ui.vertical_centered(|ui| {
        ui.add_space(16.0);

        if let Some(logo) = logo {
            ui.add(
                egui::Image::from_texture(egui::load::SizedTexture::from_handle(logo))
                    .max_height(72.0),
            );
            ui.add_space(8.0);
        }

        if let Some(banner) = banner {
            banner.show(ui);
        }

        ui.add_space(4.0);
        ui.label(
            RichText::new(welcome)
                .size(20.0)
                .strong()
                .color(palette.foreground),
        );
    });
}

/// Full-width action buttons. Returns the button pressed this frame.
pub fn action_buttons(ui: &mut Ui, bindings: &[Binding], palette: Palette) -> Option<ActionId> {
    let mut pressed = None;

    ui.add_space(16.0);
    for binding in bindings {
        let button = egui::Button::new(
            RichText::new(&binding.label)
                .size(16.0)
                .color(palette.foreground),
        )
        .fill(palette.background)
        .min_size(egui::vec2(ui.available_width(), 36.0));

        if ui.add(button).clicked() {
            pressed = Some(binding.id);
        }
        ui.add_space(6.0);
    }

    pressed
}

/// Blocking warning dialog. Returns `true` only once `OK` is clicked;
/// Escape and clicks on the backdrop leave it open.
pub fn notice_modal(ctx: &egui::Context, notice: &Notice) -> bool {
    let mut acknowledged = false;

    egui::Modal::new(egui::Id::new("launcher_notice")).show(ctx, |ui| {
        ui.set_min_width(320.0);
        ui.heading(&notice.title);
        ui.add_space(8.0);
        ui.label(RichText::new(&notice.message).color(Color32::YELLOW));
        ui.add_space(12.0);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            if ui.button("OK").clicked() {
                acknowledged = true;
            }
        });
    });

    acknowledged
}
