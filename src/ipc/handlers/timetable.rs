use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_timetable_week(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = &state.store;
    let mut entries: Vec<_> = store.timetable.iter().collect();
    entries.sort_by(|a, b| a.day.cmp(&b.day).then(a.start_time.cmp(&b.start_time)));

    let rows: Vec<serde_json::Value> = entries
        .iter()
        .filter_map(|entry| {
            let course = store.course_by_id(&entry.course_id)?;
            Some(json!({
                "id": entry.id,
                "courseId": course.id,
                "courseCode": course.code,
                "courseTitle": course.title,
                "day": entry.day,
                "startTime": entry.start_time,
                "endTime": entry.end_time,
                "venue": entry.venue,
            }))
        })
        .collect();

    ok(&req.id, json!({ "entries": rows }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "timetable.week" => Some(handle_timetable_week(state, req)),
        _ => None,
    }
}
