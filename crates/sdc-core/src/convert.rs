use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::document::Document;
use crate::error::ConvertError;
use crate::format::{Format, infer_format};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOpts {
    pub json_indent: usize,
    /// Accepted for symmetry; the YAML emitter has a fixed block style.
    pub yaml_indent: usize,
    /// Applies to XML built from a JSON/YAML tree; parsed XML is written as-is.
    pub xml_indent: usize,
}

impl Default for ConvertOpts {
    fn default() -> Self {
        Self {
            json_indent: 4,
            yaml_indent: 2,
            xml_indent: 4,
        }
    }
}

/// Source and destination of one conversion, with both formats already
/// resolved. Building one touches no files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source: PathBuf,
    destination: PathBuf,
    source_format: Format,
    destination_format: Format,
}

impl ConversionRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Result<Self, ConvertError> {
        let source = source.into();
        let destination = destination.into();
        let source_format = infer_format(&source)?;
        let destination_format = infer_format(&destination)?;
        Ok(Self {
            source,
            destination,
            source_format,
            destination_format,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
    pub fn destination(&self) -> &Path {
        &self.destination
    }
    pub fn source_format(&self) -> Format {
        self.source_format
    }
    pub fn destination_format(&self) -> Format {
        self.destination_format
    }
}

pub fn read(path: &Path, format: Format) -> Result<Document, ConvertError> {
    let text = fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %format, bytes = text.len(), "read source");
    Document::decode(&text, format).map_err(|message| ConvertError::Parse {
        path: path.to_path_buf(),
        format,
        message,
    })
}

/// Renders `doc` fully in memory, then writes it to `path`.
pub fn write(
    doc: &Document,
    path: &Path,
    format: Format,
    opts: &ConvertOpts,
) -> Result<(), ConvertError> {
    let text = doc
        .encode(format, opts)
        .map_err(|message| ConvertError::Serialize { format, message })?;
    fs::write(path, &text).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %format, bytes = text.len(), "wrote destination");
    Ok(())
}

pub fn convert(req: &ConversionRequest, opts: &ConvertOpts) -> Result<(), ConvertError> {
    let doc = read(&req.source, req.source_format)?;
    write(&doc, &req.destination, req.destination_format, opts)?;
    info!(
        src = %req.source.display(),
        dst = %req.destination.display(),
        from = %req.source_format,
        to = %req.destination_format,
        "conversion finished"
    );
    Ok(())
}
