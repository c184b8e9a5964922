//! Built-in root namespace for a standalone bridge
//!
//! Mirrors the shape clients expect from the editor: a `vscode` object with
//! `window`, `workspace` and `env`, plus a `process` object.

use super::{Namespace, ScriptError, Value};
use crate::host::Host;
use std::sync::Arc;

pub fn editor_namespace(host: Arc<dyn Host>) -> Namespace {
    let window = {
        let host = Arc::clone(&host);
        Namespace::new()
            .with_function(
                "showInformationMessage",
                "function showInformationMessage(message, ...items) { [native code] }",
                move |args| {
                    let mut texts = args.iter().map(display);
                    let message = texts
                        .next()
                        .ok_or_else(|| ScriptError::new("message is required"))?;
                    let items: Vec<String> = texts.collect();
                    host.show_message(&message, &items);
                    Ok(Value::Undefined)
                },
            )
            .with("activeTextEditor", Value::Undefined)
    };

    let workspace_name = host.workspace_name();
    let workspace = Namespace::new()
        .with("name", workspace_name.clone())
        .with("rootPath", workspace_name);

    let env = Namespace::new()
        .with("appName", "vscode-bridge")
        .with("appHost", "standalone")
        .with("language", "en");

    let vscode = Namespace::new()
        .with("version", crate::VERSION)
        .with("window", window)
        .with("workspace", workspace)
        .with("env", env);

    let process = Namespace::new()
        .with("pid", std::process::id())
        .with("platform", std::env::consts::OS)
        .with("arch", std::env::consts::ARCH)
        .with_function("cwd", "function cwd() { [native code] }", |_| {
            std::env::current_dir()
                .map(|dir| Value::from(dir.display().to_string()))
                .map_err(|e| ScriptError::new(e.to_string()))
        });

    Namespace::new()
        .with("vscode", vscode)
        .with("process", process)
}

/// String form of an argument, as a notification would show it
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        other => other
            .to_json()
            .map(|json| json.to_string())
            .unwrap_or_else(|| other.type_tag().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use crate::namespace::Inspectable;

    #[test]
    fn test_root_exposes_vscode_and_process() {
        let ns = editor_namespace(Arc::new(RecordingHost::default()));
        assert_eq!(ns.list_members(), vec!["vscode", "process"]);
    }

    #[test]
    fn test_show_information_message_reaches_host() {
        let host = Arc::new(RecordingHost::default());
        let root = Value::from(editor_namespace(host.clone()));

        let show = root
            .member("vscode")
            .and_then(|v| v.member("window"))
            .and_then(|w| w.member("showInformationMessage"))
            .unwrap();
        let Value::Function(show) = show else {
            panic!("expected a function");
        };

        show.call(&[Value::from("hello"), Value::from("Yes"), Value::from(2i64)])
            .unwrap();
        assert_eq!(
            host.messages(),
            vec![(
                "hello".to_string(),
                vec!["Yes".to_string(), "2".to_string()]
            )]
        );
        assert!(show.call(&[]).is_err());
    }

    #[test]
    fn test_workspace_name_defaults_to_undefined() {
        let root = Value::from(editor_namespace(Arc::new(RecordingHost::default())));
        let name = root
            .member("vscode")
            .and_then(|v| v.member("workspace"))
            .and_then(|w| w.member("name"))
            .unwrap();
        assert!(name.is_undefined());
    }
}
