use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{Announcement, AuthorRole, PublishStatus, Store};
use chrono::{SecondsFormat, Utc};
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

fn sorted_desc<'a>(items: impl Iterator<Item = &'a Announcement>) -> Vec<&'a Announcement> {
    let mut out: Vec<&Announcement> = items.collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

fn announcements_list(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let filter = params
        .get("filter")
        .and_then(|v| v.as_str())
        .unwrap_or("all");
    let important_only = match filter {
        "all" => false,
        "important" => true,
        _ => {
            return Err(HandlerErr {
                code: "bad_params",
                message: "filter must be all or important".to_string(),
                details: None,
            })
        }
    };

    let rows = sorted_desc(store.announcements.iter().filter(|a| {
        a.status == PublishStatus::Published && (!important_only || a.is_important)
    }));
    let important_count = store
        .announcements
        .iter()
        .filter(|a| a.status == PublishStatus::Published && a.is_important)
        .count();

    Ok(json!({
        "announcements": rows,
        "importantCount": important_count,
    }))
}

/// Staff view: drafts included.
fn announcements_authored(
    store: &mut Store,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let rows = sorted_desc(store.announcements.iter());
    Ok(json!({ "announcements": rows }))
}

fn announcements_create(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let title = get_required_str(params, "title")?;
    let content = get_required_str(params, "content")?;
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(HandlerErr {
            code: "bad_params",
            message: "title and content must not be empty".to_string(),
            details: None,
        });
    }

    let target = params
        .get("target")
        .and_then(|v| v.as_str())
        .unwrap_or("all")
        .to_string();
    if target != "all" && store.course_by_id(&target).is_none() {
        return Err(HandlerErr {
            code: "bad_params",
            message: "target must be 'all' or a course id".to_string(),
            details: Some(json!({ "target": target })),
        });
    }
    let is_important = params
        .get("isImportant")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let publish = params
        .get("publish")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let author = format!(
        "{} {} {}",
        store.staff.title, store.staff.first_name, store.staff.last_name
    );
    let announcement = Announcement {
        id: Uuid::new_v4().to_string(),
        title: title.trim().to_string(),
        content: content.trim().to_string(),
        author,
        author_role: AuthorRole::Lecturer,
        target,
        is_important,
        status: if publish {
            PublishStatus::Published
        } else {
            PublishStatus::Draft
        },
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    store.announcements.push(announcement.clone());

    Ok(json!({ "announcement": announcement }))
}

fn announcements_publish(
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let announcement_id = get_required_str(params, "announcementId")?;
    let Some(announcement) = store
        .announcements
        .iter_mut()
        .find(|a| a.id == announcement_id)
    else {
        return Err(HandlerErr {
            code: "not_found",
            message: "announcement not found".to_string(),
            details: None,
        });
    };
    announcement.status = PublishStatus::Published;

    Ok(json!({
        "announcementId": announcement_id,
        "status": PublishStatus::Published,
    }))
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
        "announcements.list" => Some(handle(state, req, announcements_list)),
        "announcements.authored" => Some(handle(state, req, announcements_authored)),
        "announcements.create" => Some(handle(state, req, announcements_create)),
        "announcements.publish" => Some(handle(state, req, announcements_publish)),
        _ => None,
    }
}
