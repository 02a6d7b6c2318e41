use crate::codec;
use crate::ipc::error::{err, ok, store_err};
use crate::ipc::types::{AppState, Request};
use chrono::{Local, NaiveDate};
use serde_json::json;

/// Date for a grade commit: the request's `dd.MM.yyyy` value, or today when
/// the shell sends none (the edit dialog stamps commits with the current
/// date).
fn commit_date(req: &Request) -> Result<NaiveDate, serde_json::Value> {
    match req.params.get("date").and_then(|v| v.as_str()) {
        Some(raw) if !raw.is_empty() => match codec::parse_date(raw) {
            Ok(Some(date)) => Ok(date),
            _ => Err(err(
                &req.id,
                "bad_date",
                format!("date must be dd.MM.yyyy: {raw:?}"),
                None,
            )),
        },
        _ => Ok(Local::now().date_naive()),
    }
}

fn handle_grades_record(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(student) = req.params.get("student").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing student", None);
    };
    let Some(subject) = req.params.get("subject").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing subject", None);
    };
    let grade = match req.params.get("grade").and_then(|v| v.as_u64()) {
        Some(v) if v <= u8::MAX as u64 => v as u8,
        _ => return err(&req.id, "bad_params", "missing/invalid grade", None),
    };
    let date = match commit_date(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.store.record_grade(student, subject, grade, date) {
        Ok(()) => ok(
            &req.id,
            json!({ "ok": true, "date": codec::format_date(Some(date)) }),
        ),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_grades_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(student) = req.params.get("student").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing student", None);
    };
    let Some(subject) = req.params.get("subject").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing subject", None);
    };

    let rec = state.store.grade_of(student, subject);
    ok(
        &req.id,
        json!({ "grade": rec.grade, "date": codec::format_date(rec.date) }),
    )
}

fn handle_grades_history(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(student) = req.params.get("student").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing student", None);
    };

    let history: Vec<serde_json::Value> = state
        .store
        .history_of(student)
        .iter()
        .map(|rec| json!({ "date": codec::format_date(rec.date), "grade": rec.grade }))
        .collect();
    ok(&req.id, json!({ "history": history }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.record" => Some(handle_grades_record(state, req)),
        "grades.get" => Some(handle_grades_get(state, req)),
        "grades.history" => Some(handle_grades_history(state, req)),
        _ => None,
    }
}
