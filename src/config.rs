use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Education portal state sidecar. Speaks line-delimited JSON on stdin/stdout.
#[derive(Debug, Clone, Parser)]
#[command(name = "portald", version)]
pub struct Config {
    /// Open this workspace at startup instead of waiting for `workspace.select`.
    #[arg(long, env = "PORTALD_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Simulated login/register latency in milliseconds.
    #[arg(long, env = "PORTALD_AUTH_DELAY_MS", default_value_t = 1000)]
    pub auth_delay_ms: u64,

    /// Log filter directive (stderr), e.g. `info` or `portald=debug`.
    #[arg(long, env = "PORTALD_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "PORTALD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth_delay_ms)
    }
}
