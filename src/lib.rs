pub mod bridge;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod eval;
pub mod host;
pub mod inspector;
pub mod lifecycle;
pub mod namespace;
pub mod server;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use dispatch::Dispatcher;
pub use error::{BridgeError, Result};
pub use host::{ConsoleHost, Host};
pub use inspector::Inspector;
pub use namespace::{Inspectable, Namespace, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
