use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::portal::Portal;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub portal: Option<Portal>,
    pub auth_delay: Duration,
}

impl AppState {
    pub fn new(auth_delay: Duration) -> Self {
        Self {
            workspace: None,
            portal: None,
            auth_delay,
        }
    }
}
