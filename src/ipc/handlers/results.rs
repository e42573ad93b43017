use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{PublishStatus, ScoreRecord, Store};
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

fn score_row(
    student_id: &str,
    display_name: &str,
    matric_number: &str,
    ca: f64,
    exam: f64,
) -> serde_json::Value {
    let total = ca + exam;
    json!({
        "studentId": student_id,
        "displayName": display_name,
        "matricNumber": matric_number,
        "continuousAssessment": ca,
        "examScore": exam,
        "totalScore": total,
        "grade": calc::grade_for(total),
    })
}

fn results_open(store: &mut Store, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    require_course(store, &course_id)?;

    let roster: Vec<(String, String, String)> = store
        .roster
        .iter()
        .map(|s| (s.id.clone(), s.display_name(), s.matric_number.clone()))
        .collect();

    let sheet = store.sheet_mut(&course_id);
    let rows: Vec<serde_json::Value> = roster
        .iter()
        .map(|(id, name, matric)| {
            let (ca, exam) = sheet
                .score_for(id)
                .map(|r| (r.continuous_assessment, r.exam_score))
                .unwrap_or((0.0, 0.0));
            score_row(id, name, matric, ca, exam)
        })
        .collect();

    Ok(json!({
        "courseId": course_id,
        "status": sheet.status,
        "rows": rows,
    }))
}

fn results_set_score(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    let student_id = get_required_str(params, "studentId")?;
    let component = get_required_str(params, "component")?;
    let value = params
        .get("value")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: "missing numeric value".to_string(),
            details: None,
        })?;
    if value < 0.0 {
        return Err(HandlerErr {
            code: "bad_params",
            message: "negative scores are not allowed".to_string(),
            details: Some(json!({ "value": value })),
        });
    }

    require_course(store, &course_id)?;
    let Some(member) = store.roster_member(&student_id) else {
        return Err(HandlerErr {
            code: "not_found",
            message: "student not found".to_string(),
            details: None,
        });
    };
    let display_name = member.display_name();
    let matric_number = member.matric_number.clone();

    let sheet = store.sheet_mut(&course_id);
    if sheet.score_for(&student_id).is_none() {
        sheet.scores.push(ScoreRecord {
            student_id: student_id.clone(),
            continuous_assessment: 0.0,
            exam_score: 0.0,
        });
    }
    let Some(record) = sheet.score_for_mut(&student_id) else {
        return Err(HandlerErr {
            code: "not_found",
            message: "student not on sheet".to_string(),
            details: None,
        });
    };

    // Entry clamps mirror the form inputs: CA tops out at 30, exam at 70.
    match component.as_str() {
        "ca" => record.continuous_assessment = calc::clamp_ca(value),
        "exam" => record.exam_score = calc::clamp_exam(value),
        _ => {
            return Err(HandlerErr {
                code: "bad_params",
                message: "component must be ca or exam".to_string(),
                details: None,
            })
        }
    }

    let ca = record.continuous_assessment;
    let exam = record.exam_score;
    Ok(json!({
        "row": score_row(&student_id, &display_name, &matric_number, ca, exam),
        "status": sheet.status,
    }))
}

fn results_set_status(
    store: &mut Store,
    params: &serde_json::Value,
    status: PublishStatus,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    require_course(store, &course_id)?;
    let sheet = store.sheet_mut(&course_id);
    sheet.status = status;
    Ok(json!({ "courseId": course_id, "status": sheet.status }))
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
        "results.open" => Some(handle(state, req, results_open)),
        "results.setScore" => Some(handle(state, req, results_set_score)),
        "results.saveDraft" => Some(handle(state, req, |s, p| {
            results_set_status(s, p, PublishStatus::Draft)
        })),
        "results.publish" => Some(handle(state, req, |s, p| {
            results_set_status(s, p, PublishStatus::Published)
        })),
        _ => None,
    }
}
