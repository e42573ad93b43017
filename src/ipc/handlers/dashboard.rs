use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::store::{PublishStatus, Weekday};
use chrono::Datelike;
use serde_json::json;

/// Landing-page rollup: today's classes, credit load, and the latest
/// announcements.
fn handle_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = &state.store;
    let today = Weekday::from_chrono(chrono::Local::now().weekday());

    let mut todays_classes: Vec<serde_json::Value> = Vec::new();
    if let Some(day) = today {
        let mut entries: Vec<_> = store.timetable.iter().filter(|t| t.day == day).collect();
        entries.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        for entry in entries {
            let Some(course) = store.course_by_id(&entry.course_id) else {
                continue;
            };
            todays_classes.push(json!({
                "courseId": course.id,
                "courseCode": course.code,
                "courseTitle": course.title,
                "startTime": entry.start_time,
                "endTime": entry.end_time,
                "venue": entry.venue,
            }));
        }
    }

    let mut published: Vec<_> = store
        .announcements
        .iter()
        .filter(|a| a.status == PublishStatus::Published)
        .collect();
    published.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let important_count = published.iter().filter(|a| a.is_important).count();
    let recent: Vec<_> = published.into_iter().take(3).collect();

    let total_credits: u32 = store.courses.iter().map(|c| c.credit_units).sum();

    ok(
        &req.id,
        json!({
            "todaysClasses": todays_classes,
            "courseCount": store.courses.len(),
            "totalCredits": total_credits,
            "recentAnnouncements": recent,
            "importantCount": important_count,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.overview" => Some(handle_overview(state, req)),
        _ => None,
    }
}
