use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{no_workspace, opt_str, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::model::NewMessage;
use crate::views;
use serde_json::json;

fn handle_messages_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_ref() else {
        return no_workspace(req);
    };
    let to = opt_str(req, "to");
    let unread_only = req
        .params
        .get("unreadOnly")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let snapshot = portal.data.snapshot();
    let messages = views::inbox(&snapshot, to.as_deref(), unread_only);
    let unread = messages.iter().filter(|m| !m.read).count();
    ok(
        &req.id,
        json!({ "messages": messages, "unreadCount": unread }),
    )
}

fn handle_messages_send(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_mut() else {
        return no_workspace(req);
    };
    let fields: NewMessage = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let message = portal.data.send_message(fields);
    ok(&req.id, json!({ "message": message }))
}

fn handle_messages_mark_read(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_mut() else {
        return no_workspace(req);
    };
    let Some(message_id) = opt_str(req, "messageId") else {
        return err(&req.id, "bad_params", "missing messageId", None);
    };
    // Unknown ids are a no-op, not an error.
    let found = portal.data.mark_message_as_read(&message_id);
    ok(&req.id, json!({ "messageId": message_id, "found": found }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "messages.list" => Some(handle_messages_list(state, req)),
        "messages.send" => Some(handle_messages_send(state, req)),
        "messages.markRead" => Some(handle_messages_mark_read(state, req)),
        _ => None,
    }
}
