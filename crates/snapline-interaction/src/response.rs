//! Maps non-success responses onto the error taxonomy.

use serde_json::Value;
use snapline_core::error::{FieldErrors, SnaplineError};

/// Classifies a failed response by status code and body.
///
/// - 401 → [`SnaplineError::Auth`]
/// - other 4xx with a per-field map → [`SnaplineError::Validation`]
/// - other 4xx → [`SnaplineError::NotFoundOrConflict`]
/// - 5xx (and anything else unexpected) → [`SnaplineError::Server`]
///
/// The human-readable message is taken from `detail`, or `error` when the
/// endpoint reports failures that way.
pub fn classify_failure(status: u16, body: &str) -> SnaplineError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let detail = parsed.as_ref().and_then(extract_detail);

    match status {
        401 => SnaplineError::Auth { detail },
        400..=499 => {
            let fields = parsed.as_ref().map(extract_fields).unwrap_or_default();
            if fields.is_empty() {
                SnaplineError::NotFoundOrConflict { status, detail }
            } else {
                SnaplineError::Validation { detail, fields }
            }
        }
        _ => SnaplineError::Server { status, detail },
    }
}

fn extract_detail(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    ["detail", "error"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn extract_fields(body: &Value) -> FieldErrors {
    let mut fields = FieldErrors::new();
    match body {
        Value::Object(object) => {
            for (key, value) in object {
                if key == "detail" || key == "error" {
                    continue;
                }
                let messages = messages_of(value);
                if !messages.is_empty() {
                    fields.insert(key.clone(), messages);
                }
            }
        }
        // A bare list is how form-level errors arrive without a field name
        Value::Array(_) => {
            let messages = messages_of(body);
            if !messages.is_empty() {
                fields.insert("non_field_errors".to_string(), messages);
            }
        }
        _ => {}
    }
    fields
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
