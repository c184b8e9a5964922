//! Dotted-path object inspection
//!
//! `inspect("vscode.window")` walks the root one segment at a time and then
//! reports every own member of the object it lands on:
//!
//! ```json
//! { "showInformationMessage": { "name": "showInformationMessage", "type": "function",
//!                               "params": ["message", "...items"] } }
//! ```
//!
//! Parameter names come from a purely textual reading of the member's
//! signature, so defaults, destructuring and rest parameters are passed
//! through as written.

use crate::namespace::Value;
use crate::{BridgeError, Result};
use tracing::debug;
use vscode_bridge_proto::{MemberDescriptor, MemberMap};

#[derive(Clone, Debug)]
pub struct Inspector {
    root: Value,
}

impl Inspector {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Follow `path` from the root; empty segments are skipped
    pub fn resolve(&self, path: &str) -> Result<Value> {
        let mut current = self.root.clone();

        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = current.member(segment)?;
            if current.is_undefined() {
                return Err(BridgeError::NotFound {
                    segment: segment.to_string(),
                    path: path.to_string(),
                });
            }
        }

        Ok(current)
    }

    /// Describe every own member of the value at `path`
    pub fn inspect(&self, path: &str) -> Result<MemberMap> {
        let target = self.resolve(path)?;
        Ok(describe_members(&target))
    }
}

/// Member descriptors for one value in listing order; unreadable members are reported as undefined
pub fn describe_members(target: &Value) -> MemberMap {
    let mut members = MemberMap::new();

    for name in target.member_names() {
        let value = match target.member(&name) {
            Ok(value) => value,
            Err(e) => {
                debug!("Reading member '{}' failed: {}", name, e);
                Value::Undefined
            }
        };

        let type_tag = value.type_tag();
        let params = match type_tag {
            "object" | "function" => Some(
                value
                    .signature()
                    .map(|signature| parse_params(&signature))
                    .unwrap_or_default(),
            ),
            _ => None,
        };

        members.insert(
            name.clone(),
            MemberDescriptor {
                name,
                type_tag: type_tag.to_string(),
                params,
            },
        );
    }

    members
}

/// Parameter names between the first `(` and the next `)` of a signature
pub fn parse_params(signature: &str) -> Vec<String> {
    let stripped = strip_block_comments(signature);

    let Some(open) = stripped.find('(') else {
        return Vec::new();
    };
    let rest = &stripped[open + 1..];
    let Some(close) = rest.find(')') else {
        return Vec::new();
    };

    rest[..close]
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(String::from)
        .collect()
}

fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("/*") {
        match rest[start + 2..].find("*/") {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + 2 + end + 2..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{Namespace, ScriptError};

    fn sample_root() -> Value {
        Value::from(
            Namespace::new()
                .with("a", 1i64)
                .with_function("b", "function(x,y){}", |_| Ok(Value::Undefined)),
        )
    }

    #[test]
    fn test_inspect_root() {
        let members = Inspector::new(sample_root()).inspect("").unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(
            members["a"],
            MemberDescriptor {
                name: "a".to_string(),
                type_tag: "number".to_string(),
                params: None,
            }
        );
        assert_eq!(
            members["b"],
            MemberDescriptor {
                name: "b".to_string(),
                type_tag: "function".to_string(),
                params: Some(vec!["x".to_string(), "y".to_string()]),
            }
        );
    }

    #[test]
    fn test_missing_segment_stops_walk() {
        let err = Inspector::new(sample_root())
            .inspect("missing.path")
            .unwrap_err();

        match &err {
            BridgeError::NotFound { segment, path } => {
                assert_eq!(segment, "missing");
                assert_eq!(path, "missing.path");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_empty_segments_are_ignored() {
        let root = Value::from(Namespace::new().with("outer", Namespace::new().with("inner", "x")));
        let inspector = Inspector::new(root);

        for path in ["outer", ".outer", "outer.", "..outer..", "outer"] {
            let members = inspector.inspect(path).unwrap();
            assert_eq!(members["inner"].type_tag, "string");
        }
    }

    #[test]
    fn test_failing_member_is_isolated() {
        let root = Value::from(
            Namespace::new()
                .with_getter("broken", || Err(ScriptError::new("nope")))
                .with("fine", true),
        );

        let members = Inspector::new(root).inspect("").unwrap();
        assert_eq!(members["broken"].type_tag, "undefined");
        assert_eq!(members["broken"].params, None);
        assert_eq!(members["fine"].type_tag, "boolean");
    }

    #[test]
    fn test_objects_get_params_from_signature() {
        let root = Value::from(
            Namespace::new()
                .with("plain", Namespace::new())
                .with("ctor", Namespace::new().with_signature("class Uri(scheme, authority)"))
                .with("nothing", Value::Null),
        );

        let members = Inspector::new(root).inspect("").unwrap();
        assert_eq!(members["plain"].params, Some(vec![]));
        assert_eq!(
            members["ctor"].params,
            Some(vec!["scheme".to_string(), "authority".to_string()])
        );
        assert_eq!(members["nothing"].type_tag, "object");
        assert_eq!(members["nothing"].params, Some(vec![]));
    }

    #[test]
    fn test_members_follow_listing_order() {
        let root = Value::from(
            Namespace::new()
                .with("window", Namespace::new())
                .with("commands", Namespace::new())
                .with("env", Namespace::new()),
        );

        let members = Inspector::new(root).inspect("").unwrap();
        let names: Vec<&str> = members.keys().map(String::as_str).collect();
        assert_eq!(names, ["window", "commands", "env"]);
    }

    #[test]
    fn test_primitive_target_has_no_members() {
        let members = Inspector::new(sample_root()).inspect("a").unwrap();
        assert!(members.is_empty());
    }

    #[test]
    fn test_walk_into_primitive_is_not_found() {
        let err = Inspector::new(sample_root()).inspect("a.b").unwrap_err();
        assert!(matches!(err, BridgeError::NotFound { ref segment, .. } if segment == "b"));
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(parse_params("function(x,y){}"), vec!["x", "y"]);
        assert_eq!(parse_params("function f() {}"), Vec::<String>::new());
        assert_eq!(parse_params("[object Object]"), Vec::<String>::new());
        assert_eq!(
            parse_params("function (a /* first */, /* second */ b = 2, ...rest) {}"),
            vec!["a", "b = 2", "...rest"]
        );
        assert_eq!(parse_params("(a, b) => a + b"), vec!["a", "b"]);
        assert_eq!(
            parse_params("function({ x, y }, [z]) {}"),
            vec!["{ x", "y }", "[z]"]
        );
        assert_eq!(
            parse_params("function /* (bogus, params) */ real(\n  one,\n  two\n) {}"),
            vec!["one", "two"]
        );
        assert_eq!(parse_params("function broken(a, b"), Vec::<String>::new());
    }
}
