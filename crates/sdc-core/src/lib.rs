//! sdc-core: format dispatch and codecs for structured documents
//!
//! This crate keeps a small surface:
//! - Closed format tag (JSON, YAML, XML) inferred from file extensions
//! - Document model: a generic tree for JSON/YAML, a DOM for XML
//! - Reader/writer dispatch over files, with an explicit XML <-> tree mapping
//! - Single-slot background worker used by the GUI
//!
pub mod convert;
pub mod document;
pub mod error;
pub mod format;
pub mod json;
pub mod worker;
pub mod xml;
pub mod yaml;

pub use convert::{ConversionRequest, ConvertOpts, convert, read, write};
pub use document::Document;
pub use error::ConvertError;
pub use format::{Format, SUPPORTED_FORMATS_MSG, infer_format};
pub use worker::{ConversionWorker, SUCCESS_MSG, WorkerBusy, status_line};
pub use xml::{XmlDocument, XmlElement, XmlNode};
