use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{Course, Store};
use serde_json::json;
use uuid::Uuid;

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

fn users_list(store: &mut Store, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let query = params
        .get("query")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let users: Vec<_> = store
        .users
        .iter()
        .filter(|u| {
            query.as_deref().map_or(true, |q| {
                u.name.to_lowercase().contains(q)
                    || u.email.to_lowercase().contains(q)
                    || u.role.to_lowercase().contains(q)
            })
        })
        .collect();

    Ok(json!({ "users": users }))
}

fn admin_create_course(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let code = get_required_str(params, "code")?;
    let title = get_required_str(params, "title")?;
    let lecturer = get_required_str(params, "lecturer")?;
    let credit_units = params
        .get("creditUnits")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: "missing creditUnits".to_string(),
            details: None,
        })?;
    if credit_units == 0 || credit_units > 12 {
        return Err(HandlerErr {
            code: "bad_params",
            message: "creditUnits must be between 1 and 12".to_string(),
            details: Some(json!({ "creditUnits": credit_units })),
        });
    }
    if store.courses.iter().any(|c| c.code.eq_ignore_ascii_case(&code)) {
        return Err(HandlerErr {
            code: "duplicate_code",
            message: "a course with that code already exists".to_string(),
            details: Some(json!({ "code": code })),
        });
    }

    let description = params
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let lecturer_email = params
        .get("lecturerEmail")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let semester = params
        .get("semester")
        .and_then(|v| v.as_str())
        .unwrap_or(&store.semester.id)
        .to_string();

    let course_id = Uuid::new_v4().to_string();
    store.courses.push(Course {
        id: course_id.clone(),
        code,
        title,
        description,
        lecturer,
        lecturer_email,
        credit_units: credit_units as u32,
        semester,
        materials: Vec::new(),
    });

    Ok(json!({ "courseId": course_id }))
}

fn admin_delete_course(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    if !store.remove_course(&course_id) {
        return Err(HandlerErr {
            code: "not_found",
            message: "course not found".to_string(),
            details: None,
        });
    }
    Ok(json!({ "deleted": true }))
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
        "users.list" => Some(handle(state, req, users_list)),
        "admin.createCourse" => Some(handle(state, req, admin_create_course)),
        "admin.deleteCourse" => Some(handle(state, req, admin_delete_course)),
        _ => None,
    }
}
