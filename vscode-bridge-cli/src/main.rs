//! bridgectl - talk to running vscode-bridge instances
//!
//! Commands:
//! - `bridgectl list` - Show registered instances
//! - `bridgectl message <text> [items...]` - Show a notification
//! - `bridgectl eval <expression>` - Evaluate an expression (bridge needs --allow-eval)
//! - `bridgectl query <name>` - List member names of a root object
//! - `bridgectl inspect [path]` - Describe members at a dotted path

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::time::{timeout, Duration};
use vscode_bridge_cli::{select_instance, BridgeClient};
use vscode_bridge_proto::{CommandEnvelope, CommandName, Members, Reply, RegistryStore};

#[derive(Parser)]
#[command(name = "bridgectl")]
#[command(about = "Talk to running vscode-bridge instances", long_about = None)]
#[command(version)]
struct Cli {
    /// Registry file (default: ~/.vscode_instances.json)
    #[arg(long, env = "VSCODE_BRIDGE_REGISTRY", global = true)]
    registry: Option<PathBuf>,

    /// Target the instance with this process id
    #[arg(long, global = true)]
    pid: Option<u32>,

    /// Connect to this port on localhost, bypassing the registry
    #[arg(long, global = true, conflicts_with = "pid")]
    port: Option<u16>,

    /// Seconds to wait for a connection or reply
    #[arg(long, default_value = "5", global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show registered instances
    List,
    /// Show a notification in the editor
    Message {
        text: String,
        /// Action items offered with the notification
        items: Vec<String>,
    },
    /// Evaluate an expression in the bridge
    Eval { expression: String },
    /// List member names of a root object
    Query { name: String },
    /// Describe the members at a dotted path
    Inspect {
        #[arg(default_value = "")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = match &cli.registry {
        Some(path) => RegistryStore::new(path.clone()),
        None => RegistryStore::at_default_path().context("Failed to locate registry file")?,
    };

    let envelope = match cli.command {
        Commands::List => {
            list_instances(&store);
            return Ok(());
        }
        Commands::Message { text, items } => {
            let mut args = vec![text];
            args.extend(items);
            CommandEnvelope::new(CommandName::ShowMessage, args)
        }
        Commands::Eval { expression } => CommandEnvelope::new(CommandName::Eval, vec![expression]),
        Commands::Query { name } => CommandEnvelope::new(CommandName::QueryApi, vec![name]),
        Commands::Inspect { path } => CommandEnvelope::new(CommandName::Inspect, vec![path]),
    };

    let url = match cli.port {
        Some(port) => format!("ws://localhost:{}", port),
        None => {
            let instances = store.load().instances();
            select_instance(&instances, cli.pid)?.url()
        }
    };

    let wait = Duration::from_secs(cli.timeout);
    let mut client = timeout(wait, BridgeClient::connect(&url))
        .await
        .context("Connection timeout - is the bridge running?")?
        .with_context(|| format!("Failed to connect to {}", url))?;

    let reply = timeout(wait, client.request(&envelope))
        .await
        .context("Timed out waiting for a reply")??;
    let _ = client.close().await;

    print_reply(&reply)
}

fn list_instances(store: &RegistryStore) {
    let instances = store.load().instances();
    if instances.is_empty() {
        println!("No bridge instances registered.");
        return;
    }

    println!("{:<10} {:<25} NAME", "PID", "URL");
    println!("{}", "-".repeat(60));
    for instance in instances {
        println!(
            "{:<10} {:<25} {}",
            instance.process_id,
            instance.url(),
            instance.display_name
        );
    }
}

fn print_reply(reply: &Reply) -> Result<()> {
    match reply {
        Reply::Error { message } => anyhow::bail!("Bridge error: {}", message),
        Reply::Ok { result, members } => {
            if let Some(result) = result {
                println!("{}", serde_json::to_string_pretty(result)?);
            }
            match members {
                Some(Members::Names(names)) => {
                    for name in names {
                        println!("{}", name);
                    }
                }
                Some(Members::Described(described)) => {
                    println!("{:<32} {:<10} PARAMS", "NAME", "TYPE");
                    println!("{}", "-".repeat(70));
                    for member in described.values() {
                        let params = member
                            .params
                            .as_ref()
                            .map(|p| format!("({})", p.join(", ")))
                            .unwrap_or_default();
                        println!("{:<32} {:<10} {}", member.name, member.type_tag, params);
                    }
                }
                None if result.is_none() => println!("OK"),
                None => {}
            }
            Ok(())
        }
    }
}
