use crate::cli::Commands;
use crate::host::ConsoleHost;
use crate::namespace::{editor_namespace, Value};
use crate::{Bridge, BridgeConfig, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use vscode_bridge_proto::RegistryStore;

pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Serve {
            bind,
            port,
            workspace,
            registry,
            allow_eval,
        } => {
            let config = BridgeConfig {
                bind_addr: bind,
                port,
                workspace_name: workspace,
                registry_path: registry,
                allow_eval,
            };
            handle_serve(config).await
        }
        Commands::Instances { registry } => handle_instances(registry),
    }
}

async fn handle_serve(config: BridgeConfig) -> Result<()> {
    let host = Arc::new(ConsoleHost::new(config.workspace_name.clone()));
    let root = Value::from(editor_namespace(host.clone()));

    let bridge = Bridge::activate(&config, host, root).await?;
    println!(
        "Bridge {} listening on ws://localhost:{} (Ctrl+C to stop)",
        bridge.process_id(),
        bridge.port()
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    bridge.deactivate().await;
    Ok(())
}

fn handle_instances(registry: Option<PathBuf>) -> Result<()> {
    let store = match registry {
        Some(path) => RegistryStore::new(path),
        None => RegistryStore::at_default_path()?,
    };
    info!("Reading instances from {}", store.path().display());

    let instances = store.load().instances();
    if instances.is_empty() {
        println!("No bridge instances registered.");
        return Ok(());
    }

    println!("{:<10} {:<25} {:<8} NAME", "PID", "URL", "PORT");
    println!("{}", "-".repeat(70));
    for instance in instances {
        println!(
            "{:<10} {:<25} {:<8} {}",
            instance.process_id,
            instance.url(),
            instance.port,
            instance.display_name
        );
    }

    Ok(())
}
