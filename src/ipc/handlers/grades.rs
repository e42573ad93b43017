use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_grades_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let records = state.store.student_grade_records();
    ok(&req.id, json!({ "grades": records }))
}

/// GPA card data. `gpa` is null until at least one published record
/// carries credit units; never NaN.
fn handle_grades_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let records = state.store.student_grade_records();
    let gpa = calc::gpa(&records).map(calc::round_2dp);
    ok(
        &req.id,
        json!({
            "gpa": gpa,
            "totalCredits": calc::total_credits(&records),
            "coursesGraded": records.len(),
            "distribution": calc::grade_distribution(&records),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_grades_list(state, req)),
        "grades.summary" => Some(handle_grades_summary(state, req)),
        _ => None,
    }
}
