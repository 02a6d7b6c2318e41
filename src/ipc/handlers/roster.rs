use crate::ipc::error::{err, ok, store_err};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn param_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let students: Vec<serde_json::Value> = state
        .store
        .students()
        .iter()
        .map(|s| json!({ "name": s.name, "active": s.active }))
        .collect();
    ok(&req.id, json!({ "students": students }))
}

fn handle_students_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(name) = param_str(req, "name") else {
        return err(&req.id, "bad_params", "missing name", None);
    };
    match state.store.add_student(name) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_students_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(name) = param_str(req, "name") else {
        return err(&req.id, "bad_params", "missing name", None);
    };
    match state.store.remove_student(name) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_students_rename(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(from) = param_str(req, "from") else {
        return err(&req.id, "bad_params", "missing from", None);
    };
    let Some(to) = param_str(req, "to") else {
        return err(&req.id, "bad_params", "missing to", None);
    };
    match state.store.rename_student(from, to) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

/// The active checkbox lives in the grid's name column, so the shell
/// reports the toggle by row.
fn handle_students_set_active(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(row) = req.params.get("row").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing/invalid row", None);
    };
    let Some(active) = req.params.get("active").and_then(|v| v.as_bool()) else {
        return err(&req.id, "bad_params", "missing/invalid active", None);
    };
    let Some(name) = state
        .store
        .students()
        .get(row as usize)
        .map(|s| s.name.clone())
    else {
        return err(
            &req.id,
            "not_found",
            "no student at row",
            Some(json!({ "row": row })),
        );
    };
    match state.store.set_active(&name, active) {
        Ok(()) => ok(&req.id, json!({ "ok": true, "name": name, "active": active })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_subjects_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "subjects": state.store.subjects() }))
}

fn handle_subjects_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(name) = param_str(req, "name") else {
        return err(&req.id, "bad_params", "missing name", None);
    };
    match state.store.add_subject(name) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_subjects_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(name) = param_str(req, "name") else {
        return err(&req.id, "bad_params", "missing name", None);
    };
    match state.store.remove_subject(name) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_subjects_rename(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(from) = param_str(req, "from") else {
        return err(&req.id, "bad_params", "missing from", None);
    };
    let Some(to) = param_str(req, "to") else {
        return err(&req.id, "bad_params", "missing to", None);
    };
    match state.store.rename_subject(from, to) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.add" => Some(handle_students_add(state, req)),
        "students.remove" => Some(handle_students_remove(state, req)),
        "students.rename" => Some(handle_students_rename(state, req)),
        "students.setActive" => Some(handle_students_set_active(state, req)),
        "subjects.list" => Some(handle_subjects_list(state, req)),
        "subjects.add" => Some(handle_subjects_add(state, req)),
        "subjects.remove" => Some(handle_subjects_remove(state, req)),
        "subjects.rename" => Some(handle_subjects_rename(state, req)),
        _ => None,
    }
}
