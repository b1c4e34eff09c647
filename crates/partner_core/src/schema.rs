use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a demand. The web client mints numeric millisecond ids,
/// other producers use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DemandId {
    Number(u64),
    Text(String),
}

impl fmt::Display for DemandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandId::Number(value) => write!(f, "{value}"),
            DemandId::Text(value) => write!(f, "{value}"),
        }
    }
}

/// Desired number of participants, as submitted by a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum HeadCount {
    Count(i64),
    Fractional(f64),
    Text(String),
}

impl HeadCount {
    /// Positive integer value, if any. Strings use their leading integer
    /// ("4人" -> 4), floats are truncated. Zero, negative, non-finite or
    /// unparsable values carry no information.
    pub fn as_count(&self) -> Option<i64> {
        let count = match self {
            HeadCount::Count(value) => *value,
            HeadCount::Fractional(value) if value.is_finite() => value.trunc() as i64,
            HeadCount::Fractional(_) => return None,
            HeadCount::Text(value) => leading_integer(value)?,
        };
        (count > 0).then_some(count)
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|value| sign * value)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Demand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DemandId>,
    /// Activity category, free text ("羽毛球", "badminton").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    /// Natural-language time description ("周六下午2点", "Saturday afternoon 14:00").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people_count: Option<HeadCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<DemandId>,
}

/// An existing demand scored against a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Match {
    #[serde(flatten)]
    pub demand: Demand,
    pub similarity: u8,
}
