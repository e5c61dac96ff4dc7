// YAML goes through serde_yaml's own value type first so that tags and
// non-string keys can be normalized before landing in the shared tree.
use serde_json::{Map, Number, Value};

pub fn parse_yaml(input: &str) -> Result<Value, String> {
    let raw: serde_yaml::Value = serde_yaml::from_str(input).map_err(|e| e.to_string())?;
    yaml_to_tree(raw)
}

/// Serializes a tree as YAML.
///
/// `indent` is a hint only: the emitter always uses two-space block style.
pub fn encode_yaml(value: &Value, _indent: usize) -> Result<String, String> {
    serde_yaml::to_string(value).map_err(|e| e.to_string())
}

pub fn yaml_to_tree(value: serde_yaml::Value) -> Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(num) => {
            if let Some(i) = num.as_i64() {
                Value::Number(Number::from(i))
            } else if let Some(u) = num.as_u64() {
                Value::Number(Number::from(u))
            } else {
                // .nan and .inf have no JSON counterpart
                num.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_tree)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut obj = Map::with_capacity(map.len());
            for (k, v) in map {
                let key = key_text(k)?;
                if obj.contains_key(&key) {
                    return Err(format!("duplicate mapping key `{key}` after key conversion"));
                }
                obj.insert(key, yaml_to_tree(v)?);
            }
            Value::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_tree(tagged.value)?,
    })
}

fn key_text(key: serde_yaml::Value) -> Result<String, String> {
    Ok(match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map_err(|e| format!("unsupported mapping key: {e}"))?
            .trim()
            .to_string(),
    })
}
