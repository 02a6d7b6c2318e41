use serde_json::json;

use crate::store::StoreError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Pushed notification. Unlike responses it carries no request id; the
/// shell routes it by the `event` discriminator.
pub fn event(name: &str, payload: serde_json::Value) -> serde_json::Value {
    let mut value = json!({ "event": name });
    if let Some(fields) = payload.as_object() {
        for (k, v) in fields {
            value[k.as_str()] = v.clone();
        }
    }
    value
}

pub fn store_err(id: &str, e: StoreError) -> serde_json::Value {
    match e {
        StoreError::InvalidArgument(message) => err(id, "bad_params", message, None),
        StoreError::NotFound(message) => err(id, "not_found", message, None),
    }
}
