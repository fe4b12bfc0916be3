use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes an optional opaque field so that a present JSON `null` stays
/// `Some(Value::Null)`. Pair with `#[serde(default)]` so a missing field
/// becomes `None`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
