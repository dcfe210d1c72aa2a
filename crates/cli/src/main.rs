//! Roster CLI - Command-line interface for the Roster daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster employee and role directory CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "ROSTER_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage employees
    Employee {
        #[command(subcommand)]
        action: EntityCommand,
    },

    /// Manage roles
    Role {
        #[command(subcommand)]
        action: EntityCommand,
    },
}

#[derive(Subcommand)]
enum EntityCommand {
    /// Create a new entry (name must be unique)
    Create {
        /// Name, 2 to 100 characters after trimming
        name: String,
    },

    /// Show one entry
    Get { id: i64 },

    /// List all entries
    List,

    /// Show several entries; unknown IDs are skipped
    GetMany {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Delete one entry
    Delete { id: i64 },

    /// Delete several entries
    DeleteMany {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    data: Option<serde_json::Value>,
}

#[derive(Deserialize, Tabled)]
struct EntityRow {
    id: i64,
    name: String,
}

#[derive(Deserialize)]
struct EntityList {
    items: Vec<EntityRow>,
    count: usize,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        let mut msg = format!("RPC error ({}): {}", error.code, error.message);
        if let Some(data) = error.data {
            msg.push_str(&format!("\n{}", serde_json::to_string_pretty(&data)?));
        }
        anyhow::bail!(msg);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn print_list(list: EntityList) {
    if list.items.is_empty() {
        println!("{}", "No entries".yellow());
        return;
    }
    println!("{}", Table::new(list.items));
    println!("{} {}", "Total:".bold(), list.count);
}

async fn run(url: &str, kind: &str, action: EntityCommand) -> Result<()> {
    let method = |op: &str| format!("{kind}.{op}.v1");

    match action {
        EntityCommand::Create { name } => {
            let result = call_rpc(url, &method("create"), json!({ "name": name })).await?;
            let row: EntityRow = serde_json::from_value(result)?;

            println!("{}", format!("✓ {} created", kind).green().bold());
            println!();
            println!("{}", Table::new(vec![row]));
        }

        EntityCommand::Get { id } => {
            let result = call_rpc(url, &method("get"), json!({ "id": id })).await?;
            let row: EntityRow = serde_json::from_value(result)?;
            println!("{}", Table::new(vec![row]));
        }

        EntityCommand::List => {
            let result = call_rpc(url, &method("list"), json!({})).await?;
            print_list(serde_json::from_value(result)?);
        }

        EntityCommand::GetMany { ids } => {
            let result = call_rpc(url, &method("get_many"), json!({ "ids": ids })).await?;
            print_list(serde_json::from_value(result)?);
        }

        EntityCommand::Delete { id } => {
            call_rpc(url, &method("delete"), json!({ "id": id })).await?;
            println!("{}", format!("✓ {} {} deleted", kind, id).green().bold());
        }

        EntityCommand::DeleteMany { ids } => {
            let requested = ids.len();
            let result = call_rpc(url, &method("delete_many"), json!({ "ids": ids })).await?;
            let deleted = result["deleted"].as_u64().unwrap_or(0);

            println!(
                "{}",
                format!("✓ {} of {} {}s deleted", deleted, requested, kind)
                    .green()
                    .bold()
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Employee { action } => run(&cli.rpc_url, "employee", action).await,
        Commands::Role { action } => run(&cli.rpc_url, "role", action).await,
    }
}
