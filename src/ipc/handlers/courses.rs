use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut courses: Vec<_> = state.store.courses.iter().collect();
    courses.sort_by(|a, b| a.code.cmp(&b.code));

    // Include material counts so the catalog cards can show them without
    // a second round trip.
    let rows: Vec<serde_json::Value> = courses
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "code": c.code,
                "title": c.title,
                "lecturer": c.lecturer,
                "creditUnits": c.credit_units,
                "semester": c.semester,
                "materialCount": c.materials.len(),
            })
        })
        .collect();

    ok(&req.id, json!({ "courses": rows }))
}

fn handle_courses_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let course_id = req.params.get("courseId").and_then(|v| v.as_str());
    let Some(course_id) = course_id else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };

    match state.store.course_by_id(course_id) {
        Some(course) => ok(&req.id, json!({ "course": course })),
        None => err(&req.id, "not_found", "course not found", None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.list" => Some(handle_courses_list(state, req)),
        "courses.get" => Some(handle_courses_get(state, req)),
        _ => None,
    }
}
