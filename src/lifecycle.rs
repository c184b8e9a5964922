//! Registration of this process in the discovery registry
//!
//! `on_start` adds (or overwrites) the entry for the current process id and
//! hands back a [`Registration`]. Dropping or releasing the registration runs
//! `on_stop`, so the entry is removed on every orderly exit path. A killed
//! process leaves its entry behind.

use tracing::{debug, info};
use vscode_bridge_proto::{InstanceDescriptor, RegistryStore, NO_PROJECT};

/// Host name advertised to clients
pub const ADVERTISED_HOST: &str = "localhost";

#[derive(Debug, Clone)]
pub struct InstanceLifecycle {
    store: RegistryStore,
    process_id: u32,
}

impl InstanceLifecycle {
    /// Lifecycle for the current process
    pub fn new(store: RegistryStore) -> Self {
        Self::with_process_id(store, std::process::id())
    }

    pub fn with_process_id(store: RegistryStore, process_id: u32) -> Self {
        Self { store, process_id }
    }

    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Publish this process as listening on `port`
    pub fn on_start(&self, port: u16, workspace_name: Option<&str>) -> Registration {
        let mut registry = self.store.load();
        registry.insert(InstanceDescriptor {
            process_id: self.process_id,
            display_name: workspace_name.unwrap_or(NO_PROJECT).to_string(),
            host: ADVERTISED_HOST.to_string(),
            port,
        });
        self.store.save(&registry);

        info!(
            "Registered instance {} on port {} in {}",
            self.process_id,
            port,
            self.store.path().display()
        );

        Registration {
            lifecycle: self.clone(),
            port,
            released: false,
        }
    }

    /// Remove this process's entry; a missing entry is left alone
    pub fn on_stop(&self) {
        let mut registry = self.store.load();
        if registry.remove(self.process_id) {
            self.store.save(&registry);
            info!("Unregistered instance {}", self.process_id);
        } else {
            debug!("Instance {} was not registered", self.process_id);
        }
    }
}

/// Scoped registry entry; removed exactly once when released or dropped
#[derive(Debug)]
pub struct Registration {
    lifecycle: InstanceLifecycle,
    port: u16,
    released: bool,
}

impl Registration {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn process_id(&self) -> u32 {
        self.lifecycle.process_id()
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.lifecycle.on_stop();
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.release_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vscode_bridge_proto::{Registry, REGISTRY_FILE_NAME};

    fn lifecycle(dir: &tempfile::TempDir, pid: u32) -> InstanceLifecycle {
        InstanceLifecycle::with_process_id(
            RegistryStore::new(dir.path().join(REGISTRY_FILE_NAME)),
            pid,
        )
    }

    fn seed_other_instance(store: &RegistryStore) -> Registry {
        let mut registry = Registry::new();
        registry.insert(InstanceDescriptor {
            process_id: 1,
            display_name: "/other/project".to_string(),
            host: ADVERTISED_HOST.to_string(),
            port: 40000,
        });
        store.save(&registry);
        registry
    }

    #[test]
    fn test_start_registers_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = lifecycle(&dir, 4242);

        let registration = lifecycle.on_start(5555, Some("/work/app"));
        assert_eq!(registration.port(), 5555);

        let entry = lifecycle.store().load().get(4242).unwrap();
        assert_eq!(entry.display_name, "/work/app");
        assert_eq!(entry.host, "localhost");
        assert_eq!(entry.port, 5555);

        registration.release();
    }

    #[test]
    fn test_start_without_workspace_uses_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = lifecycle(&dir, 7);

        let _registration = lifecycle.on_start(1234, None);
        let entry = lifecycle.store().load().get(7).unwrap();
        assert_eq!(entry.display_name, "[no_project]");
    }

    #[test]
    fn test_start_then_stop_keeps_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = lifecycle(&dir, 4242);
        let before = seed_other_instance(lifecycle.store());

        let registration = lifecycle.on_start(5555, None);
        assert!(lifecycle.store().load().contains(4242));

        registration.release();

        let after = lifecycle.store().load();
        assert!(!after.contains(4242));
        assert_eq!(after, before);
    }

    #[test]
    fn test_start_overwrites_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = lifecycle(&dir, 9);

        let first = lifecycle.on_start(1000, None);
        std::mem::forget(first);
        let _second = lifecycle.on_start(2000, Some("again"));

        let registry = lifecycle.store().load();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(9).unwrap().port, 2000);
    }

    #[test]
    fn test_drop_unregisters() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = lifecycle(&dir, 11);

        {
            let _registration = lifecycle.on_start(3000, None);
            assert!(lifecycle.store().load().contains(11));
        }

        assert!(!lifecycle.store().load().contains(11));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = lifecycle(&dir, 12);
        let before = seed_other_instance(lifecycle.store());

        lifecycle.on_stop();
        lifecycle.on_stop();

        assert_eq!(lifecycle.store().load(), before);
    }

    #[test]
    fn test_stop_without_file_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = lifecycle(&dir, 13);

        lifecycle.on_stop();
        assert!(!lifecycle.store().path().exists());
    }
}
