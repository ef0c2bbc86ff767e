//! Read-only changelog windows

use super::panels::Palette;
use eframe::egui;

/// One changelog window. A new one is opened for every successful download
/// and nothing links it back to the main window.
#[derive(Debug, Clone)]
pub struct ChangelogWindow {
    id: u64,
    title: String,
    text: String,
    size: [f32; 2],
}

impl ChangelogWindow {
    pub fn new(id: u64, title: String, text: String, size: [f32; 2]) -> Self {
        Self {
            id,
            title,
            text,
            size,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Widget id of the text area
    pub fn text_id(&self) -> egui::Id {
        egui::Id::new(("changelog_text", self.id))
    }

    /// Draw the window for this frame. Returns `false` once the user closed it.
    pub fn show(&self, ctx: &egui::Context, palette: Palette) -> bool {
        let viewport_id = egui::ViewportId::from_hash_of(("changelog", self.id));
        let builder = egui::ViewportBuilder::default()
            .with_title(self.title.as_str())
            .with_inner_size(self.size);

        ctx.show_viewport_immediate(viewport_id, builder, |ctx, class| {
            if class == egui::ViewportClass::Embedded {
                // Backend without multi-window support: fall back to an
                // in-window panel
                let mut open = true;
                egui::Window::new(self.title.as_str())
                    .id(egui::Id::new(("changelog", self.id)))
                    .default_size(self.size)
                    .frame(egui::Frame::window(&ctx.style()).fill(palette.background))
                    .open(&mut open)
                    .show(ctx, |ui| self.contents(ui, palette));
                return open;
            }

            egui::CentralPanel::default()
                .frame(egui::Frame::default().fill(palette.background).inner_margin(8.0))
                .show(ctx, |ui| self.contents(ui, palette));

            !ctx.input(|i| i.viewport().close_requested())
        })
    }

    fn contents(&self, ui: &mut egui::Ui, palette: Palette) {
        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // An immutable &str buffer: the widget can select and copy
                // but never edit
                ui.add(
                    egui::TextEdit::multiline(&mut self.text.as_str())
                        .id(self.text_id())
                        .desired_width(f32::INFINITY)
                        .text_color(palette.foreground)
                        .font(egui::TextStyle::Body)
                        .frame(false),
                );
            });
    }
}
