use serde::{Deserialize, Deserializer};

// the key has to be present, but `null` is a valid value. Without `deserialize_with`
// serde treats a missing `Option` field as `None`
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

// `question` and `answer` must carry text: `""` or whitespace alone counts as missing
pub fn deserialize_non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
