//! Minimal XML DOM plus the mapping between XML and the generic tree.
//!
//! XML to XML conversion only parses and re-serializes the DOM, so element
//! names, attributes, text (including whitespace) and comments survive
//! unchanged. Conversions that cross into JSON/YAML use the mapping below:
//!
//! - the document becomes `{ "<root name>": <root value> }`
//! - an element without attributes or child elements becomes its text
//!   (`null` when empty)
//! - otherwise it becomes a mapping: attributes under `@name`, child elements
//!   under their name (repeated names collapse into a sequence) and text
//!   under `#text`
//!
//! Going the other way, a mapping with a single non-sequence entry names the
//! root element; anything else is wrapped in `<root>`. Sequences that have no
//! key of their own become `<item>` elements. Scalars read back from XML are
//! always strings. Whitespace-only text is ignored by the mapping in
//! elements that also have child elements.
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

pub const TEXT_KEY: &str = "#text";
pub const ATTR_PREFIX: char = '@';
pub const DEFAULT_ROOT: &str = "root";
pub const ITEM_NAME: &str = "item";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated text and CDATA content of this element (not descendants).
    pub fn text(&self) -> String {
        let mut out = String::new();
        for c in &self.children {
            match c {
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                _ => {}
            }
        }
        out
    }
}

impl XmlDocument {
    /// Parses XML text into a DOM.
    ///
    /// Text is kept as written, whitespace included. The XML declaration,
    /// processing instructions, the doctype and anything outside the root
    /// element other than whitespace are not kept.
    pub fn parse(input: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(input);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(tag)) => stack.push(start_element(&tag)?),
                Ok(Event::Empty(tag)) => {
                    let el = start_element(&tag)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::End(tag)) => {
                    let el = stack.pop().ok_or_else(|| {
                        format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(tag.name().as_ref())
                        )
                    })?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    push_content(&mut stack, XmlNode::Text(text.into_owned()))?;
                }
                Ok(Event::CData(c)) => {
                    let text = String::from_utf8(c.to_vec()).map_err(|e| e.to_string())?;
                    push_content(&mut stack, XmlNode::CData(text))?;
                }
                Ok(Event::Comment(c)) => {
                    if let Some(cur) = stack.last_mut() {
                        cur.children
                            .push(XmlNode::Comment(String::from_utf8_lossy(&c).into_owned()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(format!(
                        "error at position {}: {}",
                        reader.buffer_position(),
                        e
                    ));
                }
            }
            buf.clear();
        }
        if let Some(open) = stack.last() {
            return Err(format!("unclosed element <{}>", open.name));
        }
        root.map(|root| XmlDocument { root })
            .ok_or_else(|| "no root element".to_string())
    }

    /// Serializes with an XML declaration. No whitespace is added: the
    /// layout is whatever text nodes the DOM holds.
    pub fn to_xml_string(&self) -> Result<String, String> {
        let mut writer = Writer::new(Vec::new());
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        writer.get_mut().push(b'\n');
        write_element(&mut writer, &self.root)?;
        let mut out = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;
        out.push('\n');
        Ok(out)
    }

    /// Inserts newline/indent text between child elements, `width` spaces per
    /// level. Elements holding text or CDATA are left untouched.
    pub fn pretty(mut self, width: usize) -> Self {
        if width > 0 {
            indent_element(&mut self.root, width, 0);
        }
        self
    }

    pub fn to_tree(&self) -> Value {
        let mut map = Map::with_capacity(1);
        map.insert(self.root.name.clone(), element_to_value(&self.root));
        Value::Object(map)
    }

    pub fn from_tree(value: &Value) -> Result<Self, String> {
        if let Value::Object(map) = value
            && map.len() == 1
            && let Some((name, inner)) = map.iter().next()
            && !inner.is_array()
            && !name.starts_with(ATTR_PREFIX)
            && name != TEXT_KEY
        {
            return Ok(XmlDocument {
                root: value_to_element(name, inner)?,
            });
        }
        Ok(XmlDocument {
            root: value_to_element(DEFAULT_ROOT, value)?,
        })
    }
}

fn start_element(tag: &BytesStart<'_>) -> Result<XmlElement, String> {
    let name = std::str::from_utf8(tag.name().as_ref())
        .map_err(|e| e.to_string())?
        .to_string();
    let mut el = XmlElement::new(name);
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| e.to_string())?
            .to_string();
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        el.attributes.push((key, value.into_owned()));
    }
    Ok(el)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    el: XmlElement,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(el));
    } else if root.is_some() {
        return Err(format!("second root element <{}>", el.name));
    } else {
        *root = Some(el);
    }
    Ok(())
}

fn push_content(stack: &mut [XmlElement], node: XmlNode) -> Result<(), String> {
    match (stack.last_mut(), node) {
        (Some(cur), node) => {
            cur.children.push(node);
            Ok(())
        }
        (None, XmlNode::Text(t)) if t.trim().is_empty() => Ok(()),
        (None, _) => Err("text outside of the root element".to_string()),
    }
}

fn indent_element(el: &mut XmlElement, width: usize, depth: usize) {
    for child in &mut el.children {
        if let XmlNode::Element(c) = child {
            indent_element(c, width, depth + 1);
        }
    }
    let has_text = el
        .children
        .iter()
        .any(|c| matches!(c, XmlNode::Text(_) | XmlNode::CData(_)));
    if has_text || el.children.is_empty() {
        return;
    }
    let inner = format!("\n{}", " ".repeat(width * (depth + 1)));
    let outer = format!("\n{}", " ".repeat(width * depth));
    let old = std::mem::take(&mut el.children);
    el.children.reserve(old.len() * 2 + 1);
    for c in old {
        el.children.push(XmlNode::Text(inner.clone()));
        el.children.push(c);
    }
    el.children.push(XmlNode::Text(outer));
}

fn emit(w: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), String> {
    w.write_event(event).map_err(|e| e.to_string())
}

fn write_element(w: &mut Writer<Vec<u8>>, el: &XmlElement) -> Result<(), String> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attributes {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    if el.children.is_empty() {
        return emit(w, Event::Empty(start));
    }
    emit(w, Event::Start(start))?;
    for child in &el.children {
        match child {
            XmlNode::Element(c) => write_element(w, c)?,
            XmlNode::Text(t) => emit(w, Event::Text(BytesText::new(t)))?,
            // "]]>" cannot appear inside a CDATA section
            XmlNode::CData(t) if t.contains("]]>") => emit(w, Event::Text(BytesText::new(t)))?,
            XmlNode::CData(t) => emit(w, Event::CData(BytesCData::new(t.as_str())))?,
            XmlNode::Comment(t) => emit(w, Event::Comment(BytesText::from_escaped(t.as_str())))?,
        }
    }
    emit(w, Event::End(BytesEnd::new(el.name.as_str())))
}

fn element_to_value(el: &XmlElement) -> Value {
    let text = el.text();
    let has_elements = el.elements().next().is_some();
    if el.attributes.is_empty() && !has_elements {
        return if text.is_empty() {
            Value::Null
        } else {
            Value::String(text)
        };
    }
    let mut obj = Map::new();
    for (k, v) in &el.attributes {
        obj.insert(format!("{ATTR_PREFIX}{k}"), Value::String(v.clone()));
    }
    for child in el.elements() {
        let value = element_to_value(child);
        match obj.get_mut(&child.name) {
            None => {
                obj.insert(child.name.clone(), value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    if !text.is_empty() && !(has_elements && text.trim().is_empty()) {
        obj.insert(TEXT_KEY.to_string(), Value::String(text));
    }
    Value::Object(obj)
}

fn value_to_element(name: &str, value: &Value) -> Result<XmlElement, String> {
    if !is_xml_name(name) {
        return Err(format!("`{name}` is not a valid XML element name"));
    }
    let mut el = XmlElement::new(name);
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                el.children
                    .push(XmlNode::Element(value_to_element(ITEM_NAME, item)?));
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                if let Some(attr) = key.strip_prefix(ATTR_PREFIX) {
                    if !is_xml_name(attr) {
                        return Err(format!("`{attr}` is not a valid XML attribute name"));
                    }
                    let text = scalar_text(child)
                        .ok_or_else(|| format!("attribute `{attr}` must hold a scalar"))?;
                    el.attributes.push((attr.to_string(), text));
                } else if key == TEXT_KEY {
                    let text = scalar_text(child)
                        .ok_or_else(|| format!("`{TEXT_KEY}` of <{name}> must hold a scalar"))?;
                    if !text.is_empty() {
                        el.children.push(XmlNode::Text(text));
                    }
                } else if let Value::Array(items) = child {
                    for item in items {
                        el.children
                            .push(XmlNode::Element(value_to_element(key, item)?));
                    }
                } else {
                    el.children
                        .push(XmlNode::Element(value_to_element(key, child)?));
                }
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar)
                && !text.is_empty()
            {
                el.children.push(XmlNode::Text(text));
            }
        }
    }
    Ok(el)
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
