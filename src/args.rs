use clap::{Parser, ValueEnum};
use qrcode::EcLevel;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPER")]
pub enum EcArg {
    L,
    M,
    Q,
    H,
}

impl From<EcArg> for EcLevel {
    fn from(v: EcArg) -> Self {
        match v {
            EcArg::L => EcLevel::L,
            EcArg::M => EcLevel::M,
            EcArg::Q => EcLevel::Q,
            EcArg::H => EcLevel::H,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "qr-sheet")]
#[command(about = "Generate captioned QR codes from a list of labels, as PNG files or a printable PDF sheet")]
pub struct Args {
    /// QR code width (default: 400 px for PNG files, 70 pt in a PDF sheet)
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Label cell width in the PDF sheet
    #[arg(long, default_value = "86")]
    pub labelwidth: u32,

    /// Label cell height in the PDF sheet
    #[arg(long, default_value = "88")]
    pub labelheight: u32,

    /// Draw label borders in the PDF sheet (yes/no; bare flag means yes)
    #[arg(long, num_args = 0..=1, default_missing_value = "yes")]
    pub labelborder: Option<String>,

    /// Left page margin of the PDF sheet
    #[arg(long, default_value = "10")]
    pub marginleft: u32,

    /// Top page margin of the PDF sheet
    #[arg(long, default_value = "15")]
    pub margintop: u32,

    /// Source file with one label per line
    #[arg(short, long, default_value = "input.txt")]
    pub source: PathBuf,

    /// Destination directory for PNG files
    #[arg(short, long, default_value = "output")]
    pub destination: PathBuf,

    /// PDF file to generate instead of PNG files. PDF captions use the
    /// Helvetica builtin font, which only covers Latin-1 text.
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Text prepended to every encoded and displayed label
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Dark colour for the QR code and caption
    #[arg(long, default_value = "#000000")]
    pub dark: String,

    /// Light colour for the background
    #[arg(long, default_value = "#ffffff")]
    pub light: String,

    /// QR code error correction level (L, M, Q, H)
    #[arg(short = 'e', long, default_value = "H")]
    pub error_correction: EcArg,

    /// TrueType font used for PNG captions (default: bundled DejaVu Sans)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Number of PNG worker threads (default: one per CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}
