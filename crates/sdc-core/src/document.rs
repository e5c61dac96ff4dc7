use std::borrow::Cow;

use serde_json::Value;

use crate::convert::ConvertOpts;
use crate::format::Format;
use crate::json::{encode_json, parse_json};
use crate::xml::XmlDocument;
use crate::yaml::{encode_yaml, parse_yaml};

/// In-memory document produced by a reader and consumed by a writer.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// null / bool / number / string / sequence / mapping, from JSON or YAML
    Tree(Value),
    /// Parsed DOM, from XML
    Xml(XmlDocument),
}

impl Document {
    pub fn decode(input: &str, format: Format) -> Result<Self, String> {
        match format {
            Format::Json => parse_json(input).map(Document::Tree),
            Format::Yaml => parse_yaml(input).map(Document::Tree),
            Format::Xml => XmlDocument::parse(input).map(Document::Xml),
        }
    }

    pub fn encode(&self, format: Format, opts: &ConvertOpts) -> Result<String, String> {
        match format {
            Format::Json => encode_json(&self.tree(), opts.json_indent),
            Format::Yaml => encode_yaml(&self.tree(), opts.yaml_indent),
            Format::Xml => match self {
                // parsed XML keeps its own layout
                Document::Xml(doc) => doc.to_xml_string(),
                Document::Tree(v) => XmlDocument::from_tree(v)?
                    .pretty(opts.xml_indent)
                    .to_xml_string(),
            },
        }
    }

    /// Tree view of the document; XML goes through the element mapping.
    pub fn tree(&self) -> Cow<'_, Value> {
        match self {
            Document::Tree(v) => Cow::Borrowed(v),
            Document::Xml(doc) => Cow::Owned(doc.to_tree()),
        }
    }
}
