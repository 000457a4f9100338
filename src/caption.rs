use crate::config::Config;
use crate::error::{Error, Result};
use image::{imageops, ImageBuffer, ImageFormat, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, info};
use rusttype::{Font, Scale};
use std::fs;
use std::path::Path;

/// Canvas height relative to the QR code once the caption band is added.
const CANVAS_HEIGHT_RATIO: f32 = 1.1;
/// Caption glyph size relative to the QR code height.
const FONT_SIZE_RATIO: f32 = 0.065;

/// DejaVu Sans, used when no `--font` is given.
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let bytes = fs::read(path).map_err(|e| {
        Error::InvalidConfiguration(format!("cannot read font {}: {e}", path.display()))
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| {
        Error::InvalidConfiguration(format!("{} is not a usable TrueType font", path.display()))
    })
}

pub fn bundled_font() -> Result<Font<'static>> {
    Font::try_from_bytes(BUNDLED_FONT)
        .ok_or_else(|| Error::InvalidConfiguration("bundled font is unusable".to_string()))
}

/// Loads the caption font once per run: the `--font` file when given,
/// otherwise the bundled one.
pub fn resolve_font(config: &Config) -> Result<Font<'static>> {
    match &config.font {
        Some(path) => {
            debug!("Caption font: {}", path.display());
            load_font(path)
        }
        None => bundled_font(),
    }
}

/// Extends `qr` downwards by a light band and writes `caption` into it,
/// horizontally centred, in the dark colour.
pub fn compose(qr: &RgbaImage, caption: &str, font: &Font, config: &Config) -> RgbaImage {
    let (width, height) = qr.dimensions();
    let canvas_height = (height as f32 * CANVAS_HEIGHT_RATIO).round() as u32;

    let mut canvas: RgbaImage =
        ImageBuffer::from_pixel(width, canvas_height, config.light.to_rgba());
    imageops::replace(&mut canvas, qr, 0, 0);

    let scale = Scale::uniform(height as f32 * FONT_SIZE_RATIO);
    let (text_width, _) = text_size(scale, font, caption);
    let x = ((width as i32 - text_width) / 2).max(0);
    let y = height as i32;

    draw_text_mut(
        &mut canvas,
        config.dark.to_rgba(),
        x,
        y,
        scale,
        font,
        caption,
    );
    canvas
}

/// Reopens the PNG at `path`, bakes the caption in and overwrites the file.
pub fn add_caption(path: &Path, caption: &str, font: &Font, config: &Config) -> Result<()> {
    let fail = |reason: String| Error::Compositing {
        path: path.to_path_buf(),
        reason,
    };

    let qr = image::open(path)
        .map_err(|e| fail(format!("cannot reopen image: {e}")))?
        .to_rgba8();

    let canvas = compose(&qr, caption, font, config);
    canvas
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| fail(format!("cannot write image: {e}")))?;

    info!("Converted: {}", path.display());
    Ok(())
}
