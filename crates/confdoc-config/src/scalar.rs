//! Lenient deserialization of required string fields.
//!
//! YAML reads `key: 1234` as a number and JSON may carry `null`. Both should
//! reach validation instead of failing the parse: `null` becomes an empty
//! string (reported as missing) and numbers or booleans keep their text.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Deserialize a scalar or `null` into a `String`.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Str(s)) => s,
        Some(Scalar::Int(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    };
    Ok(value)
}
