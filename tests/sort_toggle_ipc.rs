use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_gradebookd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn gradebookd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn listed_names(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>, id: &str) -> Vec<String> {
    let listed = request_ok(stdin, reader, id, "students.list", json!({}));
    listed
        .get("students")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.get("name").and_then(|v| v.as_str()).unwrap().to_string())
        .collect()
}

#[test]
fn header_click_sorts_and_toggles_direction() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    for (i, name) in ["Ann", "Ben", "Cay", "Dee"].iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("s{i}"),
            "students.add",
            json!({ "name": name }),
        );
    }
    let _ = request_ok(&mut stdin, &mut reader, "sub", "subjects.add", json!({ "name": "Math" }));
    for (id, student, grade) in [("g1", "Ann", 5), ("g2", "Ben", 3), ("g3", "Cay", 3)] {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            id,
            "grades.record",
            json!({ "student": student, "subject": "Math", "grade": grade, "date": "01.02.2024" }),
        );
    }
    // Dee stays ungraded and sorts as 0.

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "grid.sortColumn",
        json!({ "col": 1 }),
    );
    assert_eq!(res.get("ascending"), Some(&json!(true)));
    assert_eq!(res.get("subject").and_then(|v| v.as_str()), Some("Math"));
    // Ben before Cay: ties keep their roster order.
    assert_eq!(listed_names(&mut stdin, &mut reader, "2"), ["Dee", "Ben", "Cay", "Ann"]);

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "grid.sortColumn",
        json!({ "col": 1 }),
    );
    assert_eq!(res.get("ascending"), Some(&json!(false)));
    assert_eq!(listed_names(&mut stdin, &mut reader, "4"), ["Ann", "Ben", "Cay", "Dee"]);
}

#[test]
fn name_column_and_unknown_columns_do_not_sort() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    for (i, name) in ["Bea", "Abe"].iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("s{i}"),
            "students.add",
            json!({ "name": name }),
        );
    }
    let _ = request_ok(&mut stdin, &mut reader, "sub", "subjects.add", json!({ "name": "Math" }));

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "grid.sortColumn",
        json!({ "col": 0 }),
    );
    assert_eq!(res.get("ignored"), Some(&json!(true)));

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "grid.sortColumn",
        json!({ "col": 5 }),
    );
    assert_eq!(res.get("ignored"), Some(&json!(true)));

    // An ignored header click must not reorder or burn the direction
    // toggle: the next real sort is still the ascending pass.
    assert_eq!(listed_names(&mut stdin, &mut reader, "3"), ["Bea", "Abe"]);
    let res = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "grid.sortColumn",
        json!({ "col": 1 }),
    );
    assert_eq!(res.get("ascending"), Some(&json!(true)));
}
