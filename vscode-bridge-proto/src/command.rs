//! Inbound command envelope

use serde::{Deserialize, Serialize};

/// One request sent by a client: `{"command": "...", "args": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandEnvelope {
    pub fn new(command: CommandName, args: Vec<String>) -> Self {
        Self {
            command: command.as_str().to_string(),
            args,
        }
    }

    /// Positional argument, if the client sent one
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Commands understood by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    ShowMessage,
    Eval,
    QueryApi,
    Inspect,
}

impl CommandName {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CommandName::ShowMessage => "showMessage",
            CommandName::Eval => "eval",
            CommandName::QueryApi => "queryApi",
            CommandName::Inspect => "inspect",
        }
    }

    /// Exact, case-sensitive match against the wire name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "showMessage" => Some(CommandName::ShowMessage),
            "eval" => Some(CommandName::Eval),
            "queryApi" => Some(CommandName::QueryApi),
            "inspect" => Some(CommandName::Inspect),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
