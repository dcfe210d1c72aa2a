//! Daemon configuration, read from `ROSTER_*` environment variables

use anyhow::{Context, Result};
use roster_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use roster_api_rpc::RpcServerConfig;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "~/.roster/roster.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// SQLite file path or `sqlite:` URL
    pub db_path: String,
    pub rpc: RpcServerConfig,
    pub log_format: LogFormat,
    /// Also write JSON logs to a daily-rolling file in this directory
    pub log_dir: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("ROSTER_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = shellexpand::tilde(&db_path).into_owned();

        let host = lookup("ROSTER_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());
        let port = match lookup("ROSTER_RPC_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("ROSTER_RPC_PORT is not a valid port: {raw:?}"))?,
            None => DEFAULT_RPC_PORT,
        };

        let log_format = match lookup("ROSTER_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let log_dir = lookup("ROSTER_LOG_DIR")
            .filter(|dir| !dir.is_empty())
            .map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned()));

        Ok(Self {
            db_path,
            rpc: RpcServerConfig { host, port },
            log_format,
            log_dir,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.contains(":memory:")
    }
}
