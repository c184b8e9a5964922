//! Discovery registry shared by every bridge-enabled process
//!
//! The registry is a single JSON object stored in the user's home directory.
//! Keys are process ids in string form, values describe where that process
//! is listening:
//!
//! ```json
//! {
//!   "4242": { "pid": 4242, "name": "/home/me/project", "host": "localhost", "port": 51234 }
//! }
//! ```
//!
//! Writes are whole-file and unsynchronized: concurrent writers race and the
//! last one wins. Entries that do not look like an instance descriptor are
//! carried through untouched so other tools sharing the file are not clobbered.

use crate::{ProtoError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// File name of the registry inside the home directory
pub const REGISTRY_FILE_NAME: &str = ".vscode_instances.json";

/// Display name used when the editor has no workspace open
pub const NO_PROJECT: &str = "[no_project]";

/// Connection info for one running bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    #[serde(rename = "pid")]
    pub process_id: u32,
    #[serde(rename = "name")]
    pub display_name: String,
    pub host: String,
    pub port: u16,
}

impl InstanceDescriptor {
    /// WebSocket URL a client should connect to
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

/// In-memory view of the registry file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: Map<String, Value>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry keyed by the descriptor's process id
    pub fn insert(&mut self, descriptor: InstanceDescriptor) {
        match serde_json::to_value(&descriptor) {
            Ok(value) => {
                self.entries.insert(descriptor.process_id.to_string(), value);
            }
            Err(e) => error!("Failed to encode instance {}: {}", descriptor.process_id, e),
        }
    }

    /// Remove the entry for `process_id`, returning whether one existed
    pub fn remove(&mut self, process_id: u32) -> bool {
        self.entries.remove(&process_id.to_string()).is_some()
    }

    pub fn contains(&self, process_id: u32) -> bool {
        self.entries.contains_key(&process_id.to_string())
    }

    pub fn get(&self, process_id: u32) -> Option<InstanceDescriptor> {
        self.entries
            .get(&process_id.to_string())
            .and_then(|value| InstanceDescriptor::deserialize(value).ok())
    }

    /// Every entry that parses as a descriptor, ordered by process id
    pub fn instances(&self) -> Vec<InstanceDescriptor> {
        let mut instances: Vec<InstanceDescriptor> = self
            .entries
            .iter()
            .filter_map(|(key, value)| match InstanceDescriptor::deserialize(value) {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    debug!("Skipping registry entry {}: {}", key, e);
                    None
                }
            })
            .collect();
        instances.sort_by_key(|d| d.process_id);
        instances
    }

    /// Number of raw entries, including ones that are not descriptors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-space indented JSON, the layout every writer of the file uses
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// Reads and writes the registry file
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.vscode_instances.json`
    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(REGISTRY_FILE_NAME))
            .ok_or(ProtoError::NoHomeDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry, treating a missing or unreadable file as empty
    pub fn load(&self) -> Registry {
        match self.try_load() {
            Ok(registry) => registry,
            Err(e) => {
                warn!(
                    "Failed to read instance file {}: {}",
                    self.path.display(),
                    e
                );
                Registry::default()
            }
        }
    }

    /// Load the registry, surfacing read and parse failures
    pub fn try_load(&self) -> Result<Registry> {
        if !self.path.exists() {
            debug!("Instance file {} does not exist yet", self.path.display());
            return Ok(Registry::default());
        }

        let data = fs::read_to_string(&self.path)?;
        let registry = serde_json::from_str(&data)?;
        Ok(registry)
    }

    /// Overwrite the file with `registry`; failures are logged, not returned
    pub fn save(&self, registry: &Registry) {
        if let Err(e) = self.try_save(registry) {
            error!(
                "Failed to write instance file {}: {}",
                self.path.display(),
                e
            );
        }
    }

    pub fn try_save(&self, registry: &Registry) -> Result<()> {
        let data = registry.to_pretty_json()?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
