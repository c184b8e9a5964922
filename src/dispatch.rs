//! Command routing
//!
//! Every inbound message produces exactly one [`Reply`]. Parse failures and
//! handler errors are turned into `{"status":"ERROR"}` replies here, so a bad
//! message never tears down the connection it arrived on.

use crate::eval::Evaluator;
use crate::host::Host;
use crate::inspector::Inspector;
use crate::namespace::Value;
use crate::{BridgeError, Result};
use std::sync::Arc;
use tracing::{debug, error};
use vscode_bridge_proto::{CommandEnvelope, CommandName, Reply};

pub struct Dispatcher {
    inspector: Inspector,
    host: Arc<dyn Host>,
    evaluator: Option<Arc<dyn Evaluator>>,
}

impl Dispatcher {
    /// Dispatcher over `root` with `eval` disabled
    pub fn new(root: Value, host: Arc<dyn Host>) -> Self {
        Self {
            inspector: Inspector::new(root),
            host,
            evaluator: None,
        }
    }

    /// Enable `eval`; only for bridges reachable by trusted local clients
    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn eval_enabled(&self) -> bool {
        self.evaluator.is_some()
    }

    /// Handle one raw message and build its reply
    pub fn dispatch(&self, raw: &str) -> Reply {
        let outcome = serde_json::from_str::<CommandEnvelope>(raw)
            .map_err(BridgeError::from)
            .and_then(|envelope| self.execute(&envelope));
        self.finish(outcome)
    }

    /// Handle one binary frame; the payload must be UTF-8 encoded JSON
    pub fn dispatch_bytes(&self, raw: &[u8]) -> Reply {
        match std::str::from_utf8(raw) {
            Ok(text) => self.dispatch(text),
            Err(e) => self.finish(Err(BridgeError::from(e))),
        }
    }

    fn finish(&self, outcome: Result<Reply>) -> Reply {
        match outcome {
            Ok(reply) => reply,
            Err(BridgeError::UnknownCommand(name)) => {
                error!("Unknown command: {}", name);
                Reply::error(BridgeError::UnknownCommand(name).to_string())
            }
            Err(e) => {
                error!("Error handling message: {}", e);
                Reply::error(e.to_string())
            }
        }
    }

    pub fn execute(&self, envelope: &CommandEnvelope) -> Result<Reply> {
        let command = CommandName::parse(&envelope.command)
            .ok_or_else(|| BridgeError::UnknownCommand(envelope.command.clone()))?;
        debug!("Handling {} with {} arg(s)", command, envelope.args.len());

        match command {
            CommandName::ShowMessage => self.show_message(envelope),
            CommandName::Eval => self.eval(envelope),
            CommandName::QueryApi => self.query_api(envelope),
            CommandName::Inspect => self.inspect(envelope),
        }
    }

    fn show_message(&self, envelope: &CommandEnvelope) -> Result<Reply> {
        let (text, items) = envelope
            .args
            .split_first()
            .ok_or(BridgeError::MissingArgument {
                command: CommandName::ShowMessage.as_str(),
                name: "text",
            })?;

        self.host.show_message(text, items);
        Ok(Reply::ok())
    }

    fn eval(&self, envelope: &CommandEnvelope) -> Result<Reply> {
        let evaluator = self.evaluator.as_ref().ok_or(BridgeError::EvalDisabled)?;
        let expression = envelope.arg(0).ok_or(BridgeError::MissingArgument {
            command: CommandName::Eval.as_str(),
            name: "expression",
        })?;

        let value = evaluator.evaluate(expression, self.inspector.root())?;
        Ok(Reply::with_result(value.to_json()))
    }

    fn query_api(&self, envelope: &CommandEnvelope) -> Result<Reply> {
        let name = envelope.arg(0).ok_or(BridgeError::MissingArgument {
            command: CommandName::QueryApi.as_str(),
            name: "name",
        })?;

        let object = self.inspector.root().member(name)?;
        if object.is_nullish() {
            return Err(BridgeError::ObjectNotFound(name.to_string()));
        }

        Ok(Reply::with_names(object.member_names()))
    }

    fn inspect(&self, envelope: &CommandEnvelope) -> Result<Reply> {
        let path = envelope.arg(0).unwrap_or_default();
        let members = self.inspector.inspect(path)?;
        Ok(Reply::with_descriptors(members))
    }
}
