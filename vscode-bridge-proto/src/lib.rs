//! Wire protocol and discovery registry for vscode-bridge
//!
//! Defines:
//! - `CommandEnvelope` - inbound request shape (`{command, args}`)
//! - `Reply` - outbound result envelope (`{status: "OK" | "ERROR", ...}`)
//! - `MemberDescriptor` - one entry of an `inspect` reply
//! - `RegistryStore` - the shared `~/.vscode_instances.json` discovery file
//!
//! Shared by the bridge server and the `bridgectl` client.

pub mod command;
pub mod error;
pub mod registry;
pub mod reply;

pub use command::{CommandEnvelope, CommandName};
pub use error::{ProtoError, Result};
pub use registry::{InstanceDescriptor, Registry, RegistryStore, NO_PROJECT, REGISTRY_FILE_NAME};
pub use reply::{MemberDescriptor, MemberMap, Members, Reply};
