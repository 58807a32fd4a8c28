mod config;
mod data;
mod db;
mod ipc;
mod logging;
mod model;
mod portal;
mod session;
mod storage;
mod views;

use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::{error, info};

fn main() {
    let cfg = config::Config::parse();
    if let Err(e) = logging::init_logging(&cfg) {
        eprintln!("portald: {e:#}");
        std::process::exit(2);
    }

    let mut state = ipc::AppState::new(cfg.auth_delay());
    if let Some(path) = cfg.workspace.as_ref() {
        if let Err(e) = ipc::open_workspace(&mut state, path) {
            // Keep serving; the client can still pick another workspace.
            error!(error = %format!("{e:#}"), "failed to open startup workspace");
        }
    }
    info!(version = env!("CARGO_PKG_VERSION"), "portald ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
