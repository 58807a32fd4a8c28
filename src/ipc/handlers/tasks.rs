use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{no_workspace, parse_params, today_param};
use crate::ipc::types::{AppState, Request};
use crate::model::NewTask;
use crate::views::{self, TaskFilter};
use serde_json::json;

fn handle_tasks_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_ref() else {
        return no_workspace(req);
    };
    let filter: TaskFilter = match parse_params::<TaskFilter>(req) {
        Ok(v) => v.normalized(),
        Err(resp) => return resp,
    };
    // Status is per student.
    if filter.status.is_some() && filter.assigned_to.is_none() {
        return err(&req.id, "bad_params", "status requires assignedTo", None);
    }
    let today = match today_param(req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let snapshot = portal.data.snapshot();
    let tasks: Vec<serde_json::Value> = views::filter_tasks(&snapshot, &filter, today)
        .into_iter()
        .map(|t| {
            let mut v = json!(t);
            if let Some(sid) = filter.assigned_to.as_deref() {
                v["status"] = json!(views::task_status(&snapshot, t, sid, today));
            }
            v
        })
        .collect();
    ok(&req.id, json!({ "tasks": tasks }))
}

fn handle_tasks_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_mut() else {
        return no_workspace(req);
    };
    let fields: NewTask = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let task = portal.data.add_task(fields);
    ok(&req.id, json!({ "task": task }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "tasks.list" => Some(handle_tasks_list(state, req)),
        "tasks.create" => Some(handle_tasks_create(state, req)),
        _ => None,
    }
}
