use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{no_workspace, opt_str, today_param};
use crate::ipc::types::{AppState, Request};
use crate::views;
use serde_json::json;

fn handle_dashboard_teacher(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_ref() else {
        return no_workspace(req);
    };
    ok(&req.id, json!(views::teacher_dashboard(&portal.data.snapshot())))
}

fn handle_dashboard_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_ref() else {
        return no_workspace(req);
    };
    // Fall back to the signed-in user when no student is named.
    let student_id = opt_str(req, "studentId").or_else(|| {
        portal
            .session
            .current()
            .user
            .as_ref()
            .map(|u| u.id.clone())
    });
    let Some(student_id) = student_id else {
        return err(
            &req.id,
            "bad_params",
            "missing studentId and no signed-in user",
            None,
        );
    };
    let today = match today_param(req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!(views::student_dashboard(&portal.data.snapshot(), &student_id, today)),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.teacher" => Some(handle_dashboard_teacher(state, req)),
        "dashboard.student" => Some(handle_dashboard_student(state, req)),
        _ => None,
    }
}
