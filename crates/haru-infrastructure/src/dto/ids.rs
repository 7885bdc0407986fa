//! Lenient id decoding.
//!
//! Ids written by older clients may be JSON numbers (millisecond
//! timestamps) where the schema now uses strings, and agent ids may appear
//! as numeric strings.

use haru_core::agent::AgentId;
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

/// Accepts a string or a number and yields its string form.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Text(text) => Ok(text),
        RawId::Number(number) => Ok(number.to_string()),
    }
}

fn parse_agent_id<E: de::Error>(raw: RawId) -> Result<AgentId, E> {
    match raw {
        RawId::Number(number) => number
            .as_u64()
            .map(AgentId)
            .ok_or_else(|| E::custom(format!("agent id {} is not a non-negative integer", number))),
        RawId::Text(text) => text
            .trim()
            .parse::<u64>()
            .map(AgentId)
            .map_err(|_| E::custom(format!("agent id {:?} is not numeric", text))),
    }
}

/// Accepts `7` or `"7"` as an agent id.
pub fn agent_id<'de, D>(deserializer: D) -> Result<AgentId, D::Error>
where
    D: Deserializer<'de>,
{
    parse_agent_id(RawId::deserialize(deserializer)?)
}

/// Optional variant of [`agent_id`]; `null` reads as `None`.
pub fn optional_agent_id<'de, D>(deserializer: D) -> Result<Option<AgentId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        Some(raw) => parse_agent_id(raw).map(Some),
        None => Ok(None),
    }
}

/// List variant of [`agent_id`].
pub fn agent_id_list<'de, D>(deserializer: D) -> Result<Option<Vec<AgentId>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Vec<RawId>>::deserialize(deserializer)? {
        Some(raws) => raws
            .into_iter()
            .map(parse_agent_id)
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        None => Ok(None),
    }
}

/// Decodes a value that older clients may have stored in an unexpected
/// shape; anything unreadable becomes `None` instead of failing the record.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// `null` reads as the type's default instead of failing the record.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
