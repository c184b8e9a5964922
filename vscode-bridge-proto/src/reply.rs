//! Outbound result envelope

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reply written back for every command
///
/// Serializes as `{"status":"OK", ...payload}` or
/// `{"status":"ERROR","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Reply {
    #[serde(rename = "OK")]
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        members: Option<Members>,
    },
    #[serde(rename = "ERROR")]
    Error { message: String },
}

/// Member descriptors keyed by name, in the order the object lists them
pub type MemberMap = IndexMap<String, MemberDescriptor>;

/// `members` payload: plain names for `queryApi`, descriptors for `inspect`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Members {
    Names(Vec<String>),
    Described(MemberMap),
}

/// Shape of one member as reported by `inspect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<String>>,
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Ok {
            result: None,
            members: None,
        }
    }

    /// `eval` reply; `None` means the expression produced no serializable value
    pub fn with_result(result: Option<serde_json::Value>) -> Self {
        Reply::Ok {
            result,
            members: None,
        }
    }

    pub fn with_names(names: Vec<String>) -> Self {
        Reply::Ok {
            result: None,
            members: Some(Members::Names(names)),
        }
    }

    pub fn with_descriptors(descriptors: MemberMap) -> Self {
        Reply::Ok {
            result: None,
            members: Some(Members::Described(descriptors)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error {
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok { .. })
    }

    /// Wire text for this reply
    ///
    /// Falls back to a fixed error envelope if the payload cannot be encoded.
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("Failed to encode reply: {}", e);
            r#"{"status":"ERROR","message":"failed to encode reply"}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_ok_has_only_status() {
        let json = serde_json::to_value(Reply::ok()).unwrap();
        assert_eq!(json, json!({"status": "OK"}));
    }

    #[test]
    fn test_error_shape() {
        let json = serde_json::to_value(Reply::error("Unknown command")).unwrap();
        assert_eq!(json, json!({"status": "ERROR", "message": "Unknown command"}));
    }

    #[test]
    fn test_undefined_result_is_omitted() {
        let json = serde_json::to_value(Reply::with_result(None)).unwrap();
        assert!(json.get("result").is_none());

        let json = serde_json::to_value(Reply::with_result(Some(json!(42)))).unwrap();
        assert_eq!(json, json!({"status": "OK", "result": 42}));
    }

    #[test]
    fn test_descriptor_params_only_when_present() {
        let mut members = MemberMap::new();
        members.insert(
            "a".to_string(),
            MemberDescriptor {
                name: "a".to_string(),
                type_tag: "number".to_string(),
                params: None,
            },
        );
        members.insert(
            "b".to_string(),
            MemberDescriptor {
                name: "b".to_string(),
                type_tag: "function".to_string(),
                params: Some(vec!["x".to_string(), "y".to_string()]),
            },
        );

        let json = serde_json::to_value(Reply::with_descriptors(members)).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "OK",
                "members": {
                    "a": {"name": "a", "type": "number"},
                    "b": {"name": "b", "type": "function", "params": ["x", "y"]}
                }
            })
        );
    }

    #[test]
    fn test_client_decodes_both_member_shapes() {
        let names: Reply = serde_json::from_str(r#"{"status":"OK","members":["a","b"]}"#).unwrap();
        assert_eq!(
            names,
            Reply::with_names(vec!["a".to_string(), "b".to_string()])
        );

        let described: Reply = serde_json::from_str(
            r#"{"status":"OK","members":{"a":{"name":"a","type":"string"}}}"#,
        )
        .unwrap();
        match described {
            Reply::Ok {
                members: Some(Members::Described(map)),
                ..
            } => assert_eq!(map["a"].type_tag, "string"),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_descriptors_keep_insertion_order() {
        let mut members = MemberMap::new();
        for name in ["zeta", "alpha", "mid"] {
            members.insert(
                name.to_string(),
                MemberDescriptor {
                    name: name.to_string(),
                    type_tag: "string".to_string(),
                    params: None,
                },
            );
        }

        let text = Reply::with_descriptors(members).to_text();
        let zeta = text.find("\"zeta\"").unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        let mid = text.find("\"mid\"").unwrap();
        assert!(zeta < alpha && alpha < mid, "order lost: {}", text);

        let decoded: Reply = serde_json::from_str(&text).unwrap();
        match decoded {
            Reply::Ok {
                members: Some(Members::Described(map)),
                ..
            } => assert_eq!(map.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]),
            other => panic!("unexpected reply: {:?}", other),
        }
    }
}
