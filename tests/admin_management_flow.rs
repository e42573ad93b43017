use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_studyzoned");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn studyzoned");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
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
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn request_err_code(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> String {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string()
}

#[test]
fn user_directory_search_matches_name_email_and_role() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let all = request_ok(&mut stdin, &mut reader, "1", "users.list", json!({}));
    assert_eq!(
        all.get("users").and_then(|v| v.as_array()).map(|v| v.len()),
        Some(6)
    );

    let students = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "users.list",
        json!({ "query": "student" }),
    );
    assert_eq!(
        students
            .get("users")
            .and_then(|v| v.as_array())
            .map(|v| v.len()),
        Some(3)
    );

    let by_name = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "users.list",
        json!({ "query": "okafor" }),
    );
    let users = by_name.get("users").and_then(|v| v.as_array()).expect("users");
    assert_eq!(users.len(), 1);
    assert_eq!(
        users[0].get("email").and_then(|v| v.as_str()),
        Some("e.okafor@student.unilag.edu.ng")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn course_creation_rejects_duplicate_codes() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "admin.createCourse",
        json!({
            "code": "CSC 499",
            "title": "Research Project",
            "lecturer": "Dr. Emeka Obi",
            "creditUnits": 6
        }),
    );
    let course_id = created
        .get("courseId")
        .and_then(|v| v.as_str())
        .expect("courseId")
        .to_string();

    let listed = request_ok(&mut stdin, &mut reader, "2", "courses.list", json!({}));
    let codes: Vec<&str> = listed
        .get("courses")
        .and_then(|v| v.as_array())
        .expect("courses")
        .iter()
        .map(|c| c.get("code").and_then(|v| v.as_str()).unwrap())
        .collect();
    assert!(codes.contains(&"CSC 499"));

    // Codes are unique case-insensitively.
    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "3",
        "admin.createCourse",
        json!({
            "code": "csc 301",
            "title": "Shadow Course",
            "lecturer": "Nobody",
            "creditUnits": 2
        }),
    );
    assert_eq!(code, "duplicate_code");

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "4",
        "admin.createCourse",
        json!({
            "code": "CSC 500",
            "title": "Zero Units",
            "lecturer": "Nobody",
            "creditUnits": 0
        }),
    );
    assert_eq!(code, "bad_params");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "admin.deleteCourse",
        json!({ "courseId": course_id }),
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn deleting_a_course_cascades_to_dependent_state() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    // crs-csc305 has a Friday timetable slot and no results sheet.
    let week = request_ok(&mut stdin, &mut reader, "1", "timetable.week", json!({}));
    assert!(week
        .get("entries")
        .and_then(|v| v.as_array())
        .expect("entries")
        .iter()
        .any(|e| e.get("courseId").and_then(|v| v.as_str()) == Some("crs-csc305")));

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "admin.deleteCourse",
        json!({ "courseId": "crs-csc305" }),
    );
    assert_eq!(deleted.get("deleted").and_then(|v| v.as_bool()), Some(true));

    let week = request_ok(&mut stdin, &mut reader, "3", "timetable.week", json!({}));
    assert!(week
        .get("entries")
        .and_then(|v| v.as_array())
        .expect("entries")
        .iter()
        .all(|e| e.get("courseId").and_then(|v| v.as_str()) != Some("crs-csc305")));

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "4",
        "results.open",
        json!({ "courseId": "crs-csc305" }),
    );
    assert_eq!(code, "not_found");

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "5",
        "admin.deleteCourse",
        json!({ "courseId": "crs-csc305" }),
    );
    assert_eq!(code, "not_found");

    drop(stdin);
    let _ = child.wait();
}
