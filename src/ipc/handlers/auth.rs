use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{no_workspace, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::model::Role;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct LoginParams {
    email: String,
    password: String,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct RegisterParams {
    name: String,
    email: String,
    password: String,
    role: Role,
}

fn handle_session_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_ref() else {
        return no_workspace(req);
    };
    ok(&req.id, json!(portal.session.current()))
}

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_mut() else {
        return no_workspace(req);
    };
    let p: LoginParams = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match portal.session.login(&p.email, &p.password, p.role) {
        Ok(_) => ok(&req.id, json!(portal.session.current())),
        Err(e) => err(&req.id, "auth_failed", e.to_string(), None),
    }
}

fn handle_register(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_mut() else {
        return no_workspace(req);
    };
    let p: RegisterParams = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match portal.session.register(&p.name, &p.email, &p.password, p.role) {
        Ok(_) => ok(&req.id, json!(portal.session.current())),
        Err(e) => err(&req.id, "auth_failed", e.to_string(), None),
    }
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_mut() else {
        return no_workspace(req);
    };
    portal.session.logout();
    ok(&req.id, json!(portal.session.current()))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.get" => Some(handle_session_get(state, req)),
        "auth.login" => Some(handle_login(state, req)),
        "auth.register" => Some(handle_register(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        _ => None,
    }
}
