use crate::ipc::error::ok;
use crate::ipc::helpers::{no_workspace, opt_str, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::model::NewGrade;
use crate::views;
use serde_json::json;

fn handle_grades_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_ref() else {
        return no_workspace(req);
    };
    let student_id = opt_str(req, "studentId");
    let task_id = opt_str(req, "taskId");
    let snapshot = portal.data.snapshot();
    let grades = views::filter_grades(&snapshot, student_id.as_deref(), task_id.as_deref());
    ok(&req.id, json!({ "grades": grades }))
}

fn handle_grades_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_mut() else {
        return no_workspace(req);
    };
    let fields: NewGrade = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let grade = portal.data.add_grade(fields);
    ok(&req.id, json!({ "grade": grade }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_grades_list(state, req)),
        "grades.create" => Some(handle_grades_create(state, req)),
        _ => None,
    }
}
