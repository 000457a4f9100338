use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to read source file {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode {text:?} as a QR code: {source}")]
    Encoding {
        text: String,
        #[source]
        source: qrcode::types::QrError,
    },

    #[error("failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to add caption to {path}: {reason}")]
    Compositing { path: PathBuf, reason: String },

    #[error("failed to write PDF document: {0}")]
    DocumentWrite(String),
}

impl Error {
    /// Whether the failure belongs to a single label and should not stop the batch.
    pub fn is_per_label(&self) -> bool {
        matches!(
            self,
            Error::Encoding { .. } | Error::ImageWrite { .. } | Error::Compositing { .. }
        )
    }
}
