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

fn listed_ids(result: &serde_json::Value) -> Vec<String> {
    result
        .get("announcements")
        .and_then(|v| v.as_array())
        .expect("announcements")
        .iter()
        .map(|a| {
            a.get("id")
                .and_then(|v| v.as_str())
                .expect("announcement id")
                .to_string()
        })
        .collect()
}

#[test]
fn student_list_shows_published_newest_first() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let all = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "announcements.list",
        json!({}),
    );
    // Four of the five seeded announcements are published; the draft
    // stays hidden. Newest first.
    assert_eq!(
        listed_ids(&all),
        vec!["ann-04", "ann-03", "ann-02", "ann-01"]
    );
    assert_eq!(all.get("importantCount").and_then(|v| v.as_u64()), Some(2));

    let important = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "announcements.list",
        json!({ "filter": "important" }),
    );
    assert_eq!(listed_ids(&important), vec!["ann-04", "ann-01"]);

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "3",
        "announcements.list",
        json!({ "filter": "urgent" }),
    );
    assert_eq!(code, "bad_params");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn drafts_surface_only_after_publishing() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "announcements.create",
        json!({
            "title": "Lab rescheduled",
            "content": "Thursday's CSC 301 lab moves to Friday this week.",
            "target": "crs-csc301"
        }),
    );
    let announcement = created.get("announcement").expect("announcement");
    let id = announcement
        .get("id")
        .and_then(|v| v.as_str())
        .expect("id")
        .to_string();
    assert_eq!(
        announcement.get("status").and_then(|v| v.as_str()),
        Some("draft")
    );

    // Drafts are visible to the author but not in the student list.
    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "announcements.list",
        json!({}),
    );
    assert!(!listed_ids(&listed).contains(&id));
    let authored = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "announcements.authored",
        json!({}),
    );
    assert!(listed_ids(&authored).contains(&id));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "announcements.publish",
        json!({ "announcementId": id }),
    );
    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "announcements.list",
        json!({}),
    );
    assert!(listed_ids(&listed).contains(&id));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn create_validates_content_and_target() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "1",
        "announcements.create",
        json!({ "title": "   ", "content": "body" }),
    );
    assert_eq!(code, "bad_params");

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "2",
        "announcements.create",
        json!({ "title": "Notice", "content": "body", "target": "crs-missing" }),
    );
    assert_eq!(code, "bad_params");

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "3",
        "announcements.publish",
        json!({ "announcementId": "ann-missing" }),
    );
    assert_eq!(code, "not_found");

    // Publish-on-create skips the draft stage.
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "announcements.create",
        json!({
            "title": "Makeup class",
            "content": "Saturday 10am, LT B.",
            "publish": true,
            "isImportant": true
        }),
    );
    assert_eq!(
        created
            .get("announcement")
            .and_then(|a| a.get("status"))
            .and_then(|v| v.as_str()),
        Some("published")
    );

    drop(stdin);
    let _ = child.wait();
}
