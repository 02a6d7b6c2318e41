use crate::codec::{self, CodecError, LoadOutcome};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn codec_err(id: &str, e: CodecError) -> serde_json::Value {
    match e {
        CodecError::Format(raw) => err(
            id,
            "bad_date",
            format!("unparseable date in document: {raw:?}"),
            None,
        ),
        CodecError::Json(e) => err(id, "bad_json", e.to_string(), None),
        CodecError::Io(e) => err(id, "io_failed", e.to_string(), None),
    }
}

fn handle_file_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = state.grades_path();
    match codec::save_to(&path, &state.store) {
        Ok(()) => ok(
            &req.id,
            json!({ "saved": true, "path": path.to_string_lossy() }),
        ),
        Err(e) => codec_err(&req.id, e),
    }
}

fn handle_file_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = state.grades_path();
    match codec::load_from(&path, &mut state.store) {
        Ok(LoadOutcome::Loaded) => ok(
            &req.id,
            json!({
                "loaded": true,
                "students": state.store.students().len(),
                "subjects": state.store.subjects().len(),
            }),
        ),
        // First run: nothing to load. The shell shows an informational
        // notice; in-memory state was not touched.
        Ok(LoadOutcome::CreatedEmpty) => ok(
            &req.id,
            json!({
                "loaded": false,
                "created": true,
                "path": path.to_string_lossy(),
            }),
        ),
        Err(e) => codec_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "file.save" => Some(handle_file_save(state, req)),
        "file.load" => Some(handle_file_load(state, req)),
        _ => None,
    }
}
