use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::{Format, SUPPORTED_FORMATS_MSG};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unsupported format for {}. {}", .path.display(), SUPPORTED_FORMATS_MSG)]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {} as {format}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: Format,
        message: String,
    },

    #[error("failed to serialize {format}: {message}")]
    Serialize { format: Format, message: String },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("conversion worker stopped without reporting a result")]
    WorkerLost,
}
