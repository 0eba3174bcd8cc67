use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clinical bucket a concern phrase is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcernCategory {
    Anxiety,
    Depression,
    Stress,
    Insomnia,
    #[serde(rename = "Eating Disorder")]
    EatingDisorder,
    /// Fallback when no category keyword matches.
    Other,
}

impl ConcernCategory {
    /// The five matchable categories, in the order the built-in table lists them.
    pub const CLINICAL: [ConcernCategory; 5] = [
        Self::Anxiety,
        Self::Depression,
        Self::Stress,
        Self::Insomnia,
        Self::EatingDisorder,
    ];

    /// Display name used in results and table files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Anxiety => "Anxiety",
            Self::Depression => "Depression",
            Self::Stress => "Stress",
            Self::Insomnia => "Insomnia",
            Self::EatingDisorder => "Eating Disorder",
            Self::Other => "Other",
        }
    }

    /// Returns `true` for the fallback category.
    #[must_use]
    pub fn is_other(self) -> bool {
        matches!(self, Self::Other)
    }
}

impl fmt::Display for ConcernCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConcernCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Anxiety" => Ok(Self::Anxiety),
            "Depression" => Ok(Self::Depression),
            "Stress" => Ok(Self::Stress),
            "Insomnia" => Ok(Self::Insomnia),
            "Eating Disorder" => Ok(Self::EatingDisorder),
            "Other" => Ok(Self::Other),
            other => Err(format!("unknown concern category: {other:?}")),
        }
    }
}
