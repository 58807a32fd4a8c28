use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::no_workspace;
use crate::ipc::types::{AppState, Request};
use crate::portal::Portal;
use crate::storage::{SqliteStorage, StateStorage};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;

/// Open (or create) the workspace database and rehydrate both stores from it.
pub fn open_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;
    let storage: Rc<dyn StateStorage> = Rc::new(SqliteStorage::new(conn)?);
    state.portal = Some(Portal::open(storage, state.auth_delay));
    state.workspace = Some(path.to_path_buf());
    info!(workspace = %path.display(), "workspace opened");
    Ok(())
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match open_workspace(state, &path) {
        Ok(()) => ok(&req.id, json!({ "workspacePath": path.to_string_lossy() })),
        Err(e) => err(&req.id, "db_open_failed", format!("{e:?}"), None),
    }
}

fn handle_data_snapshot(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(portal) = state.portal.as_ref() else {
        return no_workspace(req);
    };
    ok(&req.id, json!(*portal.data.snapshot()))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "data.snapshot" => Some(handle_data_snapshot(state, req)),
        _ => None,
    }
}
