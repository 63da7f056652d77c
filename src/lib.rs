pub mod classifier;
pub mod error;
pub mod features;
pub mod label;
pub mod live;
pub mod offline;
pub mod settings;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use classifier::classify;
pub use error::{AegisError, Result};
pub use features::FeatureVector;
pub use label::MacroLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Radiant,
    Dire,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Radiant => Side::Dire,
            Side::Dire => Side::Radiant,
        }
    }

    pub fn from_team_code(code: i64) -> Option<Side> {
        match code {
            2 => Some(Side::Radiant),
            3 => Some(Side::Dire),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Side> {
        match name.trim().to_ascii_lowercase().as_str() {
            "radiant" | "goodguys" => Some(Side::Radiant),
            "dire" | "badguys" => Some(Side::Dire),
            _ => None,
        }
    }

    pub fn radiant_sign(self) -> i64 {
        match self {
            Side::Radiant => 1,
            Side::Dire => -1,
        }
    }

    pub fn structure_marker(self) -> &'static str {
        match self {
            Side::Radiant => "goodguys",
            Side::Dire => "badguys",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Radiant => write!(f, "radiant"),
            Side::Dire => write!(f, "dire"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Side::from_name(value).ok_or_else(|| format!("Unknown side: {value}. Use radiant or dire."))
    }
}
