use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order in which a registry hands matching rules to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrdering {
    /// Rules are visited in the order they were registered.
    #[default]
    Registration,
    /// Lowest priority value first; ties keep registration order.
    #[serde(rename = "priority_asc")]
    PriorityAscending,
    /// Highest priority value first; ties keep registration order.
    #[serde(rename = "priority_desc")]
    PriorityDescending,
}

impl RuleOrdering {
    /// Sorts `items` in place. The sort is stable, so equal priorities keep their order.
    pub fn sort<T>(self, items: &mut [T], priority: impl Fn(&T) -> i32) {
        match self {
            RuleOrdering::Registration => {}
            RuleOrdering::PriorityAscending => items.sort_by_key(|item| priority(item)),
            RuleOrdering::PriorityDescending => {
                items.sort_by(|a, b| priority(b).cmp(&priority(a)))
            }
        }
    }

    /// Name used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleOrdering::Registration => "registration",
            RuleOrdering::PriorityAscending => "priority_asc",
            RuleOrdering::PriorityDescending => "priority_desc",
        }
    }
}

impl fmt::Display for RuleOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a textual ordering is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrdering(pub String);

impl fmt::Display for UnknownOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown rule ordering: {}", self.0)
    }
}

impl std::error::Error for UnknownOrdering {}

impl FromStr for RuleOrdering {
    type Err = UnknownOrdering;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "registration" | "" => Ok(RuleOrdering::Registration),
            "priority_asc" | "ascending" | "asc" => Ok(RuleOrdering::PriorityAscending),
            "priority_desc" | "descending" | "desc" => Ok(RuleOrdering::PriorityDescending),
            other => Err(UnknownOrdering(other.to_string())),
        }
    }
}
