//! Blank-value stripping for submitted fields

use serde_json::Value;

use crate::db::Fields;

/// Drop blank values from submitted fields.
///
/// Strings are kept trimmed when something is left after trimming; numbers
/// are kept as their decimal text, so `0` and `"0"` both survive. Any other
/// JSON type is dropped.
pub fn strip_empty(fields: Fields) -> Fields {
    fields
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.trim().to_owned(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            (!text.is_empty()).then(|| (key, Value::String(text)))
        })
        .collect()
}
