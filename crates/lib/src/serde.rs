use serde::{Deserialize, Deserializer};

/// Deserialize an optional string or number as an optional string.
pub(crate) fn string_or_number<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        String(String),
        Number(serde_json::Number),
    }

    Option::deserialize(d).map(|o| {
        o.map(|value| match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
        })
    })
}

/// Deserialize a null value as its default.
pub(crate) fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::deserialize(d).map(Option::unwrap_or_default)
}
