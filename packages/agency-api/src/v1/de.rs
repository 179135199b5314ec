//! Lenient field decoders for the inconsistent shapes the backend emits.

use jiff::civil::Date;
use serde::{Deserialize, Deserializer, de::Error as _};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInteger {
    Number(u64),
    Text(String),
}

/// Decode a `u64` sent either as a JSON number or as a numeric string.
pub fn u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawInteger::deserialize(deserializer)? {
        RawInteger::Number(value) => Ok(value),
        RawInteger::Text(text) => text
            .trim()
            .parse()
            .map_err(|err| D::Error::custom(format!("invalid identifier {text:?}: {err}"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBool {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// Decode an optional boolean sent as `true`/`false`, `0`/`1` or a string
/// spelling of either.
pub fn bool_lenient<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<RawBool>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw {
        RawBool::Bool(value) => Ok(Some(value)),
        RawBool::Number(value) => Ok(Some(value != 0)),
        RawBool::Text(text) => match text.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" | "oui" | "yes" | "actif" => Ok(Some(true)),
            "0" | "false" | "non" | "no" | "inactif" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("invalid boolean {text:?}"))),
        },
    }
}

/// Decode an optional date sent either as `YYYY-MM-DD` or as a timestamp
/// whose first ten characters are the date. Empty strings decode as `None`.
pub fn date_lenient<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    parse_date(text)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid date {text:?}")))
}

/// Parse the date part of a date or timestamp string.
pub fn parse_date(text: &str) -> Option<Date> {
    text.get(..10)
        .unwrap_or(text)
        .parse::<Date>()
        .ok()
}

/// Decode an optional string, treating blank strings as absent.
pub fn string_non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Decode an optional string-backed value (such as a status), treating
/// blank strings as absent.
pub fn non_blank<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    string_non_blank(deserializer).map(|value| value.map(T::from))
}

/// Decode a list that the backend may send as `null`.
pub fn vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    List(Vec<String>),
    Joined(String),
}

/// Decode a list of string-backed values sent either as an array or as a
/// single comma-separated string.
pub fn list_lenient<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let values = match Option::<RawList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawList::List(values)) => values,
        Some(RawList::Joined(joined)) => joined.split(',').map(String::from).collect(),
    };
    Ok(values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(T::from)
        .collect())
}
