use crate::color::HexColor;
use crate::config::Config;
use crate::error::{Error, Result};
use image::{ImageBuffer, ImageFormat, RgbaImage};
use log::info;
use qrcode::{EcLevel, QrCode};
use std::path::{Path, PathBuf};

/// Light modules drawn around the symbol on every side.
pub const QUIET_ZONE: usize = 4;

pub fn generate_qr_data(text: &str, ec_level: EcLevel) -> Result<Vec<Vec<bool>>> {
    let code = QrCode::with_error_correction_level(text, ec_level).map_err(|source| {
        Error::Encoding {
            text: text.to_string(),
            source,
        }
    })?;

    let modules = code.to_colors();
    let width = code.width();

    let mut qr_data = vec![vec![false; width]; width];
    for y in 0..width {
        for x in 0..width {
            qr_data[y][x] = matches!(modules[y * width + x], qrcode::Color::Dark);
        }
    }

    Ok(qr_data)
}

/// Rasterises a module matrix with its quiet zone into a square image of
/// `width` pixels, or one pixel per module when `width` is too small to hold
/// the symbol.
pub fn render(qr_data: &[Vec<bool>], width: u32, dark: HexColor, light: HexColor) -> RgbaImage {
    let modules = qr_data.len();
    let total = modules + 2 * QUIET_ZONE;
    let size = (width as usize).max(total);

    ImageBuffer::from_fn(size as u32, size as u32, |x, y| {
        let mx = x as usize * total / size;
        let my = y as usize * total / size;

        let inside = (QUIET_ZONE..QUIET_ZONE + modules).contains(&mx)
            && (QUIET_ZONE..QUIET_ZONE + modules).contains(&my);

        if inside && qr_data[my - QUIET_ZONE][mx - QUIET_ZONE] {
            dark.to_rgba()
        } else {
            light.to_rgba()
        }
    })
}

/// `<destination>/<label>.png`; the prefix never takes part in the file name.
pub fn png_path(destination: &Path, label: &str) -> PathBuf {
    destination.join(format!("{label}.png"))
}

/// Encodes `prefix + label` and writes the bare QR code as a PNG.
pub fn generate_png(label: &str, destination: &Path, config: &Config) -> Result<PathBuf> {
    let text = config.caption(label);
    let qr_data = generate_qr_data(&text, config.ec_level)?;
    let image = render(&qr_data, config.width, config.dark, config.light);

    let path = png_path(destination, label);
    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|source| Error::ImageWrite {
            path: path.clone(),
            source,
        })?;

    info!("Encoded: {}", path.display());
    Ok(path)
}
