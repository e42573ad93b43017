use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request, Role};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "role": state.role.map(Role::as_str),
            "semester": &state.store.semester,
        }),
    )
}

fn handle_select_role(state: &mut AppState, req: &Request) -> serde_json::Value {
    let role = req
        .params
        .get("role")
        .and_then(|v| v.as_str())
        .and_then(Role::parse);
    let Some(role) = role else {
        return err(
            &req.id,
            "bad_params",
            "role must be one of student, staff, admin",
            None,
        );
    };

    state.role = Some(role);
    ok(&req.id, json!({ "role": role.as_str() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "session.selectRole" => Some(handle_select_role(state, req)),
        _ => None,
    }
}
