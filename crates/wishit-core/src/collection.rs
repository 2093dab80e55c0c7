//! Normalization of backend collection responses
//!
//! The backend wraps list responses inconsistently: a bare array, or an
//! object carrying the array under `data`, `users`, `posts` or `gifts`.
//! Every fetch goes through [`unwrap_collection`] so screens only ever see a
//! plain ordered sequence.

use crate::{Error, Result, types::CollectionKind};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Envelope keys probed, in order, when the body is an object
pub const ENVELOPE_KEYS: [&str; 4] = ["data", "users", "posts", "gifts"];

/// Extract the record array from a response body, whatever its wrapping
///
/// # Errors
///
/// Returns [`Error::UnexpectedShape`] when the body is neither an array nor an
/// object holding an array under one of [`ENVELOPE_KEYS`].
pub fn unwrap_collection(kind: CollectionKind, body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                if matches!(map.get(key), Some(Value::Array(_)))
                    && let Some(Value::Array(items)) = map.remove(key)
                {
                    return Ok(items);
                }
            }
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            Err(Error::UnexpectedShape {
                collection: kind.to_string(),
                found: format!("object with keys [{}]", keys.join(", ")),
            })
        }
        other => Err(Error::UnexpectedShape {
            collection: kind.to_string(),
            found: json_type_name(&other).to_string(),
        }),
    }
}

/// Normalize and decode a response body into typed records, preserving order
///
/// # Errors
///
/// Returns an error if the shape is unrecognized or a record cannot be decoded.
pub fn decode_collection<T: DeserializeOwned>(kind: CollectionKind, body: Value) -> Result<Vec<T>> {
    unwrap_collection(kind, body)?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Error::from))
        .collect()
}

/// Outcome of fetching one collection
///
/// A failed collection never discards the others: screens render what loaded
/// and show `reason` for the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Collection<T> {
    /// Records fetched and decoded
    Loaded {
        /// Records in backend order
        records: Vec<T>,
    },
    /// Fetch rejected or body unusable
    Failed {
        /// Human readable failure reason
        reason: String,
    },
}

impl<T> Collection<T> {
    /// Build from a fetch result
    pub fn from_result<E: std::fmt::Display>(result: std::result::Result<Vec<T>, E>) -> Self {
        match result {
            Ok(records) => Self::Loaded { records },
            Err(err) => Self::Failed {
                reason: err.to_string(),
            },
        }
    }

    /// Loaded records, empty when the fetch failed
    #[must_use]
    pub fn records(&self) -> &[T] {
        match self {
            Self::Loaded { records } => records,
            Self::Failed { .. } => &[],
        }
    }

    /// Number of loaded records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Whether no records are available
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Failure reason, if the fetch failed
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Loaded { .. } => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::User;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn records() -> Value {
        json!([{"_id": "1", "email": "a@wishit.app"}, {"_id": "2", "email": "b@wishit.app"}])
    }

    #[test]
    fn test_all_shapes_yield_same_sequence() {
        let bare = unwrap_collection(CollectionKind::Users, records()).unwrap();
        let shapes = [
            json!({"data": records()}),
            json!({"users": records()}),
            json!({"posts": records()}),
            json!({"gifts": records(), "success": true}),
        ];

        for shape in shapes {
            assert_eq!(unwrap_collection(CollectionKind::Users, shape).unwrap(), bare);
        }
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[0]["_id"], "1");
    }

    #[test]
    fn test_non_array_envelope_value_is_skipped() {
        let body = json!({"data": {"count": 2}, "users": records()});
        let items = unwrap_collection(CollectionKind::Users, body).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_unrecognized_shapes_fail() {
        let err = unwrap_collection(CollectionKind::Gifts, json!({"message": "ok"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected response shape for gifts: object with keys [message]"
        );

        let err = unwrap_collection(CollectionKind::Posts, json!("nope")).unwrap_err();
        assert!(matches!(err, Error::UnexpectedShape { .. }));
        assert!(unwrap_collection(CollectionKind::Posts, Value::Null).is_err());
    }

    #[test]
    fn test_decode_collection_typed() {
        let users: Vec<User> =
            decode_collection(CollectionKind::Users, json!({"data": records()})).unwrap();
        assert_eq!(users.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(), ["1", "2"]);

        let bad: Result<Vec<User>> = decode_collection(CollectionKind::Users, json!([{"email": 3}]));
        assert!(matches!(bad, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_collection_outcome_accessors() {
        let loaded: Collection<u8> = Collection::from_result::<Error>(Ok(vec![1, 2, 3]));
        assert_eq!(loaded.len(), 3);
        assert!(loaded.failure().is_none());

        let failed: Collection<u8> =
            Collection::from_result(Err("backend down"));
        assert!(failed.is_empty());
        assert_eq!(failed.failure(), Some("backend down"));
    }

    #[test]
    fn test_collection_serializes_with_status_tag() {
        let failed: Collection<u8> = Collection::Failed {
            reason: "HTTP 500".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"status": "failed", "reason": "HTTP 500"})
        );
    }
}
