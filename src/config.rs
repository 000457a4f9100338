use crate::args::Args;
use crate::color::HexColor;
use crate::error::{Error, Result};
use qrcode::EcLevel;
use std::path::PathBuf;

/// QR width used for standalone PNG files, in pixels.
pub const DEFAULT_PNG_WIDTH: u32 = 400;
/// QR width used inside a PDF cell, in points.
pub const DEFAULT_PDF_WIDTH: u32 = 70;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// One captioned PNG per label in `destination`.
    Png { destination: PathBuf },
    /// A single tiled PDF sheet written to `path`.
    Pdf { path: PathBuf },
}

/// Resolved, validated run configuration. Shared read-only by every stage.
#[derive(Clone, Debug)]
pub struct Config {
    pub width: u32,
    pub label_width: u32,
    pub label_height: u32,
    pub label_border: bool,
    pub margin_left: u32,
    pub margin_top: u32,
    pub prefix: String,
    pub dark: HexColor,
    pub light: HexColor,
    pub ec_level: EcLevel,
    /// Caption font for PNG files; `None` selects the bundled font.
    pub font: Option<PathBuf>,
    pub jobs: usize,
    pub source: PathBuf,
    pub mode: Mode,
}

impl Config {
    /// Text encoded into the QR code and printed beneath it.
    pub fn caption(&self, label: &str) -> String {
        format!("{}{}", self.prefix, label)
    }
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        let mode = match args.pdf {
            Some(path) if !path.as_os_str().is_empty() => Mode::Pdf { path },
            _ => Mode::Png {
                destination: args.destination,
            },
        };

        let width = match (args.width, &mode) {
            (Some(w), _) => w,
            (None, Mode::Png { .. }) => DEFAULT_PNG_WIDTH,
            (None, Mode::Pdf { .. }) => DEFAULT_PDF_WIDTH,
        };

        positive("width", width)?;
        positive("labelwidth", args.labelwidth)?;
        positive("labelheight", args.labelheight)?;

        let jobs = match args.jobs {
            Some(0) => {
                return Err(Error::InvalidConfiguration("jobs must be at least 1".to_string()))
            }
            Some(n) => n,
            None => rayon::current_num_threads(),
        };

        let label_border = match args.labelborder.as_deref() {
            None => false,
            Some(flag) => parse_flag(flag)?,
        };

        Ok(Self {
            width,
            label_width: args.labelwidth,
            label_height: args.labelheight,
            label_border,
            margin_left: args.marginleft,
            margin_top: args.margintop,
            prefix: args.prefix,
            dark: args.dark.parse()?,
            light: args.light.parse()?,
            ec_level: args.error_correction.into(),
            font: args.font,
            jobs,
            source: args.source,
            mode,
        })
    }
}

fn positive(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidConfiguration(format!("{name} must be greater than zero")));
    }
    Ok(())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "y" | "yes" | "true" | "on" => Ok(true),
        "0" | "n" | "no" | "false" | "off" => Ok(false),
        other => Err(Error::InvalidConfiguration(format!(
            "labelborder expects yes or no, got {other:?}"
        ))),
    }
}
