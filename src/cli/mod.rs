pub mod commands;

use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vscode-bridge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drive and introspect an editor instance over a local WebSocket", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run a standalone bridge until interrupted")]
    Serve {
        #[arg(long, default_value = "127.0.0.1", help = "Address to listen on")]
        bind: IpAddr,

        #[arg(
            short,
            long,
            default_value_t = 0,
            env = "VSCODE_BRIDGE_PORT",
            help = "Port to listen on (0 picks a free port)"
        )]
        port: u16,

        #[arg(short, long, help = "Workspace name to advertise")]
        workspace: Option<String>,

        #[arg(
            long,
            env = "VSCODE_BRIDGE_REGISTRY",
            help = "Registry file (default: ~/.vscode_instances.json)"
        )]
        registry: Option<PathBuf>,

        #[arg(long, help = "Accept eval commands from connected clients")]
        allow_eval: bool,
    },
    #[command(about = "List bridge instances from the registry")]
    Instances {
        #[arg(
            long,
            env = "VSCODE_BRIDGE_REGISTRY",
            help = "Registry file (default: ~/.vscode_instances.json)"
        )]
        registry: Option<PathBuf>,
    },
}
