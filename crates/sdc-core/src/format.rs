use std::fmt;
use std::path::Path;

use crate::error::ConvertError;

/// Message shown whenever an extension falls outside the supported set.
pub const SUPPORTED_FORMATS_MSG: &str = "Supported formats are: .xml, .json, .yml, .yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Xml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Yaml, Format::Xml];

    /// Maps an extension (without the dot) to a format tag.
    ///
    /// Matching is case-sensitive: `"JSON"` is not recognized.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext {
            "json" => Some(Format::Json),
            "yml" | "yaml" => Some(Format::Yaml),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yml", "yaml"],
            Format::Xml => &["xml"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Xml => "XML",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn infer_format(path: &Path) -> Result<Format, ConvertError> {
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(Format::from_extension)
        .ok_or_else(|| ConvertError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
}
