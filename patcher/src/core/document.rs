//! Top-level field updates on a parsed manifest document.
//!
//! The document is a `serde_json::Value` built with `preserve_order`, so an
//! overwritten key keeps its position and a new key is appended last.

use serde_json::Value;

/// The document root cannot hold named fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootNotObject {
    pub found: &'static str,
}

/// Set `field` at the top level of `doc` to the string `value`.
///
/// Any prior value is replaced regardless of its type and returned.
pub fn set_top_level_string(
    doc: &mut Value,
    field: &str,
    value: &str,
) -> Result<Option<Value>, RootNotObject> {
    let found = kind_of(doc);
    let map = doc.as_object_mut().ok_or(RootNotObject { found })?;
    Ok(map.insert(field.to_string(), Value::String(value.to_string())))
}

/// Human-readable JSON type name for diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
