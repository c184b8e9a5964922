//! Ordered, builder-style object used for namespaces and JSON objects

use super::{Inspectable, ScriptError, Value};
use std::sync::Arc;

type Getter = dyn Fn() -> Result<Value, ScriptError> + Send + Sync;

#[derive(Clone)]
enum Slot {
    Value(Value),
    Getter(Arc<Getter>),
}

/// Plain object whose members keep their insertion order
#[derive(Clone, Default)]
pub struct Namespace {
    members: Vec<(String, Slot)>,
    signature: Option<String>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a member holding a fixed value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_function<F>(self, name: impl Into<String>, signature: &str, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ScriptError> + Send + Sync + 'static,
    {
        self.with(name, Value::function(signature, body))
    }

    /// Add a member computed on every read; the getter may fail
    pub fn with_getter<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn() -> Result<Value, ScriptError> + Send + Sync + 'static,
    {
        self.put(name.into(), Slot::Getter(Arc::new(getter)));
        self
    }

    /// Textual signature reported when this object is inspected as a member
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.put(name.into(), Slot::Value(value.into()));
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn put(&mut self, name: String, slot: Slot) {
        match self.members.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = slot,
            None => self.members.push((name, slot)),
        }
    }
}

impl Inspectable for Namespace {
    fn list_members(&self) -> Vec<String> {
        self.members.iter().map(|(name, _)| name.clone()).collect()
    }

    fn get_member(&self, name: &str) -> Result<Value, ScriptError> {
        match self.members.iter().find(|(existing, _)| existing == name) {
            Some((_, Slot::Value(value))) => Ok(value.clone()),
            Some((_, Slot::Getter(getter))) => getter(),
            None => Ok(Value::Undefined),
        }
    }

    fn signature(&self) -> Option<String> {
        self.signature.clone()
    }
}
