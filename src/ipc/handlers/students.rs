use crate::ipc::error::ok;
use crate::ipc::helpers::{no_workspace, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::model::NewStudent;
use crate::views;
use serde_json::json;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_ref() else {
        return no_workspace(req);
    };
    let snapshot = portal.data.snapshot();
    let term = req
        .params
        .get("search")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let students: Vec<serde_json::Value> = views::search_students(&snapshot, term)
        .into_iter()
        .map(|s| {
            let mut v = json!(s);
            v["band"] = json!(views::grade_band(s.overall_grade));
            v
        })
        .collect();
    ok(&req.id, json!({ "students": students }))
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_mut() else {
        return no_workspace(req);
    };
    let fields: NewStudent = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let student = portal.data.add_student(fields);
    ok(&req.id, json!({ "student": student }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        _ => None,
    }
}
