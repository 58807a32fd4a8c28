use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::ipc::error::err;
use crate::ipc::types::Request;

/// Decode `req.params` into a typed payload, or build a `bad_params` reply.
pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Value> {
    let params = if req.params.is_null() {
        json!({})
    } else {
        req.params.clone()
    };
    serde_json::from_value(params).map_err(|e| err(&req.id, "bad_params", e.to_string(), None))
}

/// Optional string param; blank strings count as absent.
pub fn opt_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}

/// `params.today` as `YYYY-MM-DD`, defaulting to the current UTC date.
pub fn today_param(req: &Request) -> Result<NaiveDate, serde_json::Value> {
    match opt_str(req, "today") {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
            err(
                &req.id,
                "bad_params",
                "today must be YYYY-MM-DD",
                Some(json!({ "today": raw })),
            )
        }),
        None => Ok(Utc::now().date_naive()),
    }
}

pub fn no_workspace(req: &Request) -> serde_json::Value {
    err(&req.id, "no_workspace", "select a workspace first", None)
}
