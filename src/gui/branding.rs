//! Branding images: the animated banner and the logo

use eframe::egui;
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use std::io::Cursor;
use std::time::{Duration, Instant};
use tracing::warn;

/// Frames shorter than this are shown for [`DEFAULT_FRAME_DELAY`], as
/// browsers do for GIFs with a zero delay.
const MIN_FRAME_DELAY: Duration = Duration::from_millis(20);
const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Decode every frame of a GIF into RGBA images with their display time.
pub fn decode_gif(bytes: &[u8]) -> image::ImageResult<Vec<(egui::ColorImage, Duration)>> {
    let decoder = GifDecoder::new(Cursor::new(bytes))?;
    let frames = decoder.into_frames().collect_frames()?;

    Ok(frames
        .into_iter()
        .map(|frame| {
            let mut delay = Duration::from(frame.delay());
            if delay < MIN_FRAME_DELAY {
                delay = DEFAULT_FRAME_DELAY;
            }
            let buffer = frame.into_buffer();
            let size = [buffer.width() as usize, buffer.height() as usize];
            (
                egui::ColorImage::from_rgba_unmultiplied(size, buffer.as_raw()),
                delay,
            )
        })
        .collect())
}

/// Which frame is visible `elapsed` into a looping animation, and how long
/// until it changes.
pub fn frame_at(delays: &[Duration], elapsed: Duration) -> (usize, Duration) {
    let total: Duration = delays.iter().sum();
    if delays.is_empty() || total.is_zero() {
        return (0, Duration::MAX);
    }

    let mut offset = Duration::from_nanos((elapsed.as_nanos() % total.as_nanos()) as u64);
    for (i, delay) in delays.iter().enumerate() {
        if offset < *delay {
            return (i, *delay - offset);
        }
        offset -= *delay;
    }
    (delays.len() - 1, Duration::ZERO)
}

/// Looping animation uploaded to the GPU once
pub struct AnimatedImage {
    frames: Vec<egui::TextureHandle>,
    delays: Vec<Duration>,
    started: Instant,
}

impl AnimatedImage {
    pub fn from_gif(ctx: &egui::Context, name: &str, bytes: &[u8]) -> Option<Self> {
        let decoded = match decode_gif(bytes) {
            Ok(frames) if !frames.is_empty() => frames,
            Ok(_) => {
                warn!("Animation {} has no frames", name);
                return None;
            }
            Err(e) => {
                warn!("Failed to decode animation {}: {}", name, e);
                return None;
            }
        };

        let mut frames = Vec::with_capacity(decoded.len());
        let mut delays = Vec::with_capacity(decoded.len());
        for (i, (image, delay)) in decoded.into_iter().enumerate() {
            frames.push(ctx.load_texture(
                format!("{}-{}", name, i),
                image,
                egui::TextureOptions::LINEAR,
            ));
            delays.push(delay);
        }

        Some(Self {
            frames,
            delays,
            started: Instant::now(),
        })
    }

    /// Draw the current frame and schedule a repaint for the next one.
    pub fn show(&self, ui: &mut egui::Ui) {
        let (index, remaining) = frame_at(&self.delays, self.started.elapsed());
        let texture = &self.frames[index];
        ui.add(egui::Image::from_texture(
            egui::load::SizedTexture::from_handle(texture),
        ));
        if self.frames.len() > 1 {
            ui.ctx().request_repaint_after(remaining);
        }
    }
}

/// Decode a still image (PNG) into a texture
pub fn load_texture(ctx: &egui::Context, name: &str, bytes: &[u8]) -> Option<egui::TextureHandle> {
    match image::load_from_memory(bytes) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
            Some(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
        }
        Err(e) => {
            warn!("Failed to load image {}: {}", name, e);
            None
        }
    }
}
