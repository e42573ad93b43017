use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;
use chrono::NaiveDate;
use serde_json::json;

struct HandlerErr {
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl HandlerErr {
    fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: format!("missing {}", key),
            details: None,
        })
}

fn parse_session_date(raw: &str) -> Result<NaiveDate, HandlerErr> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| HandlerErr {
        code: "bad_params",
        message: "date must be YYYY-MM-DD".to_string(),
        details: None,
    })
}

fn require_course(store: &Store, course_id: &str) -> Result<(), HandlerErr> {
    if store.course_by_id(course_id).is_none() {
        return Err(HandlerErr {
            code: "not_found",
            message: "course not found".to_string(),
            details: None,
        });
    }
    Ok(())
}

fn attendance_open(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    let date = parse_session_date(&get_required_str(params, "date")?)?;
    require_course(store, &course_id)?;

    let roster: Vec<(String, String, String)> = store
        .roster
        .iter()
        .map(|s| (s.id.clone(), s.display_name(), s.matric_number.clone()))
        .collect();

    let session = store.session_mut(&course_id, date);
    let rows: Vec<serde_json::Value> = roster
        .iter()
        .map(|(id, name, matric)| {
            let status = session
                .marks
                .get(id)
                .copied()
                .unwrap_or(calc::AttendanceStatus::Unmarked);
            json!({
                "studentId": id,
                "displayName": name,
                "matricNumber": matric,
                "status": status,
            })
        })
        .collect();
    let summary = calc::summarize(session.marks.values().copied());

    Ok(json!({
        "sessionId": session.id,
        "courseId": course_id,
        "date": date.to_string(),
        "saved": session.saved,
        "rows": rows,
        "summary": summary,
    }))
}

fn attendance_toggle(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    let date = parse_session_date(&get_required_str(params, "date")?)?;
    let student_id = get_required_str(params, "studentId")?;
    require_course(store, &course_id)?;

    let session = store.session_mut(&course_id, date);
    let Some(current) = session.marks.get(&student_id).copied() else {
        return Err(HandlerErr {
            code: "not_found",
            message: "student not in session".to_string(),
            details: None,
        });
    };
    let next = calc::advance(current);
    session.marks.insert(student_id.clone(), next);
    let summary = calc::summarize(session.marks.values().copied());

    Ok(json!({
        "studentId": student_id,
        "status": next,
        "summary": summary,
    }))
}

fn attendance_mark_all_present(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    let date = parse_session_date(&get_required_str(params, "date")?)?;
    require_course(store, &course_id)?;

    let session = store.session_mut(&course_id, date);
    for status in session.marks.values_mut() {
        *status = calc::AttendanceStatus::Present;
    }
    let summary = calc::summarize(session.marks.values().copied());

    Ok(json!({ "summary": summary }))
}

fn attendance_save(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    let date = parse_session_date(&get_required_str(params, "date")?)?;
    require_course(store, &course_id)?;

    let session = store.session_mut(&course_id, date);
    let summary = calc::summarize(session.marks.values().copied());
    // The save button stays disabled until something is marked.
    if summary.total_marked == 0 {
        return Err(HandlerErr {
            code: "empty_session",
            message: "mark at least one student before saving".to_string(),
            details: None,
        });
    }
    session.saved = true;

    Ok(json!({ "saved": true, "summary": summary }))
}

fn handle(
    state: &mut AppState,
    req: &Request,
    f: impl FnOnce(&mut Store, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    match f(&mut state.store, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.open" => Some(handle(state, req, attendance_open)),
        "attendance.toggle" => Some(handle(state, req, attendance_toggle)),
        "attendance.markAllPresent" => Some(handle(state, req, attendance_mark_all_present)),
        "attendance.save" => Some(handle(state, req, attendance_save)),
        _ => None,
    }
}
