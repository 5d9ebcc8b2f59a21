//! # Generator Behavior
//!
//! How the host merges the generated Secret with one of the same name.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Create,
    Replace,
    Merge,
}

impl Behavior {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Create => "create",
            Behavior::Replace => "replace",
            Behavior::Merge => "merge",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Behavior {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Behavior::Create),
            "replace" => Ok(Behavior::Replace),
            "merge" => Ok(Behavior::Merge),
            other => Err(ConfigError::InvalidBehavior {
                found: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_round_trips_through_str() {
        for behavior in [Behavior::Create, Behavior::Replace, Behavior::Merge] {
            assert_eq!(behavior.as_str().parse::<Behavior>().unwrap(), behavior);
        }
    }

    #[test]
    fn test_behavior_rejects_unknown() {
        assert!(matches!(
            "upsert".parse::<Behavior>(),
            Err(ConfigError::InvalidBehavior { found }) if found == "upsert"
        ));
    }
}
