//! Sport catalog
//!
//! The fixed set of movements the analysis service can compare against a
//! professional reference clip.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported sport: {0}")]
pub struct UnknownSport(pub String);

/// Sport selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Basketball,
    Soccer,
    Boxing,
    Golf,
}

impl Sport {
    pub const ALL: [Sport; 4] = [Sport::Basketball, Sport::Soccer, Sport::Boxing, Sport::Golf];

    /// Identifier used in the service path
    pub fn id(&self) -> &'static str {
        match self {
            Sport::Basketball => "basketball",
            Sport::Soccer => "soccer",
            Sport::Boxing => "boxing",
            Sport::Golf => "golf",
        }
    }

    /// Name of the analyzed movement
    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::Basketball => "Basketball Shot",
            Sport::Soccer => "Soccer Penalty Kick",
            Sport::Boxing => "Boxing Uppercut",
            Sport::Golf => "Golf Swing",
        }
    }

    /// Professional whose clip the service compares against
    pub fn reference_athlete(&self) -> &'static str {
        match self {
            Sport::Basketball => "Stephen Curry",
            Sport::Soccer => "Cristiano Ronaldo",
            Sport::Boxing => "Mike Tyson",
            Sport::Golf => "Tiger Woods",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Sport {
    type Err = UnknownSport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownSport(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Golf".parse::<Sport>().unwrap(), Sport::Golf);
        assert_eq!(" soccer ".parse::<Sport>().unwrap(), Sport::Soccer);
        assert_eq!(
            "curling".parse::<Sport>().unwrap_err(),
            UnknownSport("curling".to_string())
        );
    }

    #[test]
    fn test_serde_uses_ids() {
        assert_eq!(serde_json::to_string(&Sport::Boxing).unwrap(), "\"boxing\"");
        let sport: Sport = serde_json::from_str("\"basketball\"").unwrap();
        assert_eq!(sport, Sport::Basketball);
    }
}
