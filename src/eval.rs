//! Expression evaluation for the `eval` command
//!
//! Evaluation runs with the bridge's full access to the namespace, so the
//! dispatcher only wires an [`Evaluator`] in when the bridge was started
//! with `--allow-eval`.
//!
//! The built-in [`ExpressionEvaluator`] understands:
//! - JSON literals and `undefined`
//! - dotted references: `vscode.workspace.name`
//! - calls with JSON literal arguments: `vscode.window.showInformationMessage("hi", "Ok")`

use crate::namespace::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("SyntaxError: {0}")]
    Syntax(String),

    #[error("ReferenceError: {0} is not defined")]
    Reference(String),

    #[error("TypeError: {0}")]
    Type(String),

    #[error("Error: {0}")]
    Thrown(String),
}

pub trait Evaluator: Send + Sync {
    fn evaluate(&self, expression: &str, root: &Value) -> Result<Value, EvalError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn resolve(&self, reference: &str, root: &Value) -> Result<Value, EvalError> {
        let mut segments = reference.split('.');
        let first = segments.next().unwrap_or_default();
        validate_identifier(first, reference)?;

        let mut current = read(root, first)?;
        if current.is_undefined() {
            return Err(EvalError::Reference(first.to_string()));
        }

        for segment in segments {
            validate_identifier(segment, reference)?;
            if current.is_nullish() {
                return Err(EvalError::Type(format!(
                    "Cannot read properties of {:?} (reading '{}')",
                    current, segment
                )));
            }
            current = read(&current, segment)?;
        }

        Ok(current)
    }
}

impl Evaluator for ExpressionEvaluator {
    fn evaluate(&self, expression: &str, root: &Value) -> Result<Value, EvalError> {
        let expression = expression.trim().trim_end_matches(';').trim_end();
        debug!("Evaluating: {}", expression);

        if expression.is_empty() || expression == "undefined" {
            return Ok(Value::Undefined);
        }

        if let Ok(literal) = serde_json::from_str::<serde_json::Value>(expression) {
            return Ok(Value::from_json(literal));
        }

        let Some(open) = expression.find('(') else {
            return self.resolve(expression, root);
        };
        if !expression.ends_with(')') {
            return Err(EvalError::Syntax(format!(
                "Unexpected token in '{}'",
                expression
            )));
        }

        let target = expression[..open].trim();
        let args = parse_arguments(&expression[open + 1..expression.len() - 1])?;

        match self.resolve(target, root)? {
            Value::Function(callable) => callable
                .call(&args)
                .map_err(|e| EvalError::Thrown(e.to_string())),
            _ => Err(EvalError::Type(format!("{} is not a function", target))),
        }
    }
}

fn read(value: &Value, name: &str) -> Result<Value, EvalError> {
    value
        .member(name)
        .map_err(|e| EvalError::Thrown(e.to_string()))
}

fn validate_identifier(segment: &str, reference: &str) -> Result<(), EvalError> {
    let mut chars = segment.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_alphabetic() || c == '_' || c == '$')
        .unwrap_or(false);

    if valid_start && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        Ok(())
    } else {
        Err(EvalError::Syntax(format!(
            "Invalid or unexpected token in '{}'",
            reference
        )))
    }
}

fn parse_arguments(text: &str) -> Result<Vec<Value>, EvalError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let args: Vec<serde_json::Value> = serde_json::from_str(&format!("[{}]", text))
        .map_err(|_| EvalError::Syntax(format!("Unsupported arguments '{}'", text.trim())))?;

    Ok(args.into_iter().map(Value::from_json).collect())
}
