use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

pub fn parse_json(input: &str) -> Result<Value, String> {
    serde_json::from_str(input).map_err(|e| e.to_string())
}

/// Pretty-prints `value` with `indent` spaces per level; `0` gives compact output.
pub fn encode_json(value: &Value, indent: usize) -> Result<String, String> {
    let mut out = Vec::new();
    if indent == 0 {
        serde_json::to_writer(&mut out, value).map_err(|e| e.to_string())?;
    } else {
        let pad = vec![b' '; indent];
        let mut ser =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&pad));
        value.serialize(&mut ser).map_err(|e| e.to_string())?;
    }
    let mut s = String::from_utf8(out).map_err(|e| e.to_string())?;
    s.push('\n');
    Ok(s)
}
