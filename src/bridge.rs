//! Activation and deactivation of a bridge instance
//!
//! `activate` binds the listener, publishes the instance in the registry and
//! starts serving; `deactivate` stops serving and withdraws the registry
//! entry. Dropping an active [`Bridge`] also withdraws the entry.

use crate::config::BridgeConfig;
use crate::dispatch::Dispatcher;
use crate::eval::ExpressionEvaluator;
use crate::host::Host;
use crate::lifecycle::{InstanceLifecycle, Registration};
use crate::namespace::Value;
use crate::server::BridgeServer;
use crate::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct Bridge {
    port: u16,
    process_id: u32,
    shutdown: CancellationToken,
    server: Option<JoinHandle<()>>,
    registration: Option<Registration>,
}

impl Bridge {
    pub async fn activate(config: &BridgeConfig, host: Arc<dyn Host>, root: Value) -> Result<Self> {
        config.validate()?;
        let store = config.registry_store()?;

        let mut dispatcher = Dispatcher::new(root, Arc::clone(&host));
        if config.allow_eval {
            warn!("eval is enabled: connected clients can run expressions against the namespace");
            dispatcher = dispatcher.with_evaluator(Arc::new(ExpressionEvaluator::new()));
        }

        let server = BridgeServer::bind(config.listen_addr(), dispatcher).await?;
        let port = server.local_addr()?.port();
        host.show_message("Bridge activated!", &[]);

        let lifecycle = InstanceLifecycle::new(store);
        let workspace = config
            .workspace_name
            .clone()
            .or_else(|| host.workspace_name());
        let registration = lifecycle.on_start(port, workspace.as_deref());
        let process_id = lifecycle.process_id();

        let shutdown = CancellationToken::new();
        let server = tokio::spawn(server.run(shutdown.clone()));

        let announcement = format!(
            "Registered VSCode bridge instance {} on port {}",
            process_id, port
        );
        info!("{}", announcement);
        host.show_message(&announcement, &[]);

        Ok(Self {
            port,
            process_id,
            shutdown,
            server: Some(server),
            registration: Some(registration),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Stop serving and remove the registry entry
    pub async fn deactivate(mut self) {
        self.shutdown.cancel();

        if let Some(server) = self.server.take() {
            if let Err(e) = server.await {
                warn!("Bridge server task failed: {}", e);
            }
        }

        if let Some(registration) = self.registration.take() {
            registration.release();
        }

        info!("Unregistered VSCode bridge instance {}", self.process_id);
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
