use crate::click::Intent;
use crate::codec;
use crate::ipc::error::{err, event, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::time::Instant;

/// Color key the shell applies to a grade cell.
fn tone(grade: u8) -> &'static str {
    match grade {
        5 => "success",
        4 => "warn",
        3 => "info",
        2 => "danger",
        _ => "neutral",
    }
}

fn cell_coords(req: &Request) -> Result<(usize, usize), serde_json::Value> {
    let Some(row) = req.params.get("row").and_then(|v| v.as_u64()) else {
        return Err(err(&req.id, "bad_params", "missing/invalid row", None));
    };
    let Some(col) = req.params.get("col").and_then(|v| v.as_u64()) else {
        return Err(err(&req.id, "bad_params", "missing/invalid col", None));
    };
    Ok((row as usize, col as usize))
}

/// Grade cell at (row, col), if there is one. Column 0 hosts the name and
/// active-toggle controls, so it never resolves; column N maps to subject
/// N-1.
fn resolve_cell(state: &AppState, row: usize, col: usize) -> Option<(String, String)> {
    if col == 0 {
        return None;
    }
    let student = state.store.students().get(row)?.name.clone();
    let subject = state.store.subjects().get(col - 1)?.clone();
    Some((student, subject))
}

fn handle_grid_view(state: &mut AppState, req: &Request) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = state
        .store
        .students()
        .iter()
        .map(|student| {
            let cells: Vec<serde_json::Value> = state
                .store
                .subjects()
                .iter()
                .map(|subject| {
                    let rec = state.store.grade_of(&student.name, subject);
                    json!({
                        "subject": subject,
                        "grade": rec.grade,
                        "date": codec::format_date(rec.date),
                        "tone": tone(rec.grade),
                    })
                })
                .collect();
            json!({ "name": student.name, "active": student.active, "cells": cells })
        })
        .collect();

    ok(
        &req.id,
        json!({ "subjects": state.store.subjects(), "rows": rows }),
    )
}

/// Arms the click window. Whether the cell is worth editing is decided when
/// the window elapses, not here: the disambiguator itself is cell-agnostic.
fn handle_grid_click(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (row, col) = match cell_coords(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    state.clicks.on_click(row, col, Instant::now());
    ok(&req.id, json!({ "pending": true }))
}

/// A double click always cancels the pending click first; the toolkit sends
/// both notifications for the gesture even over the name column.
fn handle_grid_double_click(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (row, col) = match cell_coords(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let _ = state.clicks.on_double_click(row, col);

    let Some((student, subject)) = resolve_cell(state, row, col) else {
        return ok(&req.id, json!({ "ignored": true }));
    };
    let history: Vec<serde_json::Value> = state
        .store
        .history_of(&student)
        .iter()
        .map(|rec| json!({ "date": codec::format_date(rec.date), "grade": rec.grade }))
        .collect();
    ok(
        &req.id,
        json!({
            "intent": "history",
            "student": student,
            "subject": subject,
            "history": history,
        }),
    )
}

fn handle_grid_sort_column(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(col) = req.params.get("col").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing/invalid col", None);
    };
    let col = col as usize;
    if col == 0 {
        return ok(&req.id, json!({ "ignored": true }));
    }
    let Some(subject) = state.store.subjects().get(col - 1).cloned() else {
        return ok(&req.id, json!({ "ignored": true }));
    };

    let ascending = state.store.sort_students_by_grade(&subject);
    ok(
        &req.id,
        json!({ "sorted": true, "subject": subject, "ascending": ascending }),
    )
}

/// Commits a pending click whose window has elapsed. Resolution against the
/// roster happens now, not at click time: name-column clicks and cells that
/// vanished while the window was open are dropped without an event.
pub fn mature_click(state: &mut AppState, now: Instant) -> Option<serde_json::Value> {
    let Some(Intent::Edit { row, col }) = state.clicks.fire(now) else {
        return None;
    };
    let (student, subject) = resolve_cell(state, row, col)?;
    let grade = state.store.grade_of(&student, &subject).grade;
    Some(event(
        "grid.editIntent",
        json!({
            "row": row,
            "col": col,
            "student": student,
            "subject": subject,
            "grade": grade,
        }),
    ))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grid.view" => Some(handle_grid_view(state, req)),
        "grid.click" => Some(handle_grid_click(state, req)),
        "grid.doubleClick" => Some(handle_grid_double_click(state, req)),
        "grid.sortColumn" => Some(handle_grid_sort_column(state, req)),
        _ => None,
    }
}
