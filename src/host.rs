//! Editor-side APIs the bridge calls into
//!
//! The real editor owns its notification and workspace APIs; the bridge only
//! talks to them through [`Host`].

use tracing::info;

pub trait Host: Send + Sync {
    /// Surface a notification with optional action items
    fn show_message(&self, text: &str, items: &[String]);

    /// Name of the open workspace, if any
    fn workspace_name(&self) -> Option<String>;
}

/// Host for a standalone bridge: notifications go to the log
#[derive(Debug, Clone, Default)]
pub struct ConsoleHost {
    workspace: Option<String>,
}

impl ConsoleHost {
    pub fn new(workspace: Option<String>) -> Self {
        Self { workspace }
    }
}

impl Host for ConsoleHost {
    fn show_message(&self, text: &str, items: &[String]) {
        if items.is_empty() {
            info!("[message] {}", text);
        } else {
            info!("[message] {} ({})", text, items.join(" | "));
        }
    }

    fn workspace_name(&self) -> Option<String> {
        self.workspace.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Host;
    use std::sync::Mutex;

    /// Records every notification for assertions
    #[derive(Default)]
    pub struct RecordingHost {
        pub workspace: Option<String>,
        messages: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl RecordingHost {
        pub fn messages(&self) -> Vec<(String, Vec<String>)> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Host for RecordingHost {
        fn show_message(&self, text: &str, items: &[String]) {
            self.messages
                .lock()
                .unwrap()
                .push((text.to_string(), items.to_vec()));
        }

        fn workspace_name(&self) -> Option<String> {
            self.workspace.clone()
        }
    }
}
