use serde_json::Value;

use crate::utils::clean_parse_error;

/// One `(label, value)` pair of a payload, in source order.
/// `None` marks a gap: the value was null or not a number.
pub type Entry = (String, Option<f64>);

/// Result of reading one data slot
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Slot found and holding a JSON object, entries in source order
    Present(Vec<Entry>),
    /// No element with the slot id
    Absent,
    /// Slot found but its text is not a JSON object
    Malformed(String),
}

impl Payload {
    /// Interpret the text content of a slot
    pub fn parse(text: &str) -> Payload {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => return Payload::Malformed(clean_parse_error(&e.to_string())),
        };

        match value {
            Value::Object(map) => Payload::Present(
                map.into_iter()
                    .map(|(label, value)| (label, numeric_value(&value)))
                    .collect(),
            ),
            other => Payload::Malformed(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )),
        }
    }

    /// Present with at least one entry
    pub fn has_data(&self) -> bool {
        matches!(self, Payload::Present(entries) if !entries.is_empty())
    }
}

/// Numbers pass through, numeric strings are parsed, anything else is a gap
fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
