use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

use crate::error::{AegisError, Result};
use crate::Side;

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    pub match_id: u64,
    pub duration: i64,
    pub players: Vec<PlayerRecord>,
    #[serde(default, deserialize_with = "lenient")]
    pub objectives: Vec<ObjectiveEvent>,
    #[serde(default, deserialize_with = "lenient")]
    pub tower_status_radiant: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub tower_status_dire: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "isRadiant")]
    pub is_radiant: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub gold_t: Vec<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub xp_t: Vec<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub death_times: Vec<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub respawn_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_gold: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectiveEvent {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<f64>,
}

impl PlayerRecord {
    pub fn side(&self) -> Side {
        if self.is_radiant {
            Side::Radiant
        } else {
            Side::Dire
        }
    }
}

impl MatchRecord {
    pub fn from_json_str(raw_json: &str) -> Result<Self> {
        let record = serde_json::from_str::<MatchRecord>(raw_json)
            .map_err(|error| AegisError::MalformedMatch(error.to_string()))?;
        record.validate()?;
        Ok(record)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw_json = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw_json)
    }

    fn validate(&self) -> Result<()> {
        if self.players.is_empty() {
            return Err(AegisError::MalformedMatch(format!(
                "match {} has no players",
                self.match_id
            )));
        }

        Ok(())
    }

    pub fn tower_status(&self, side: Side) -> Option<u32> {
        match side {
            Side::Radiant => self.tower_status_radiant,
            Side::Dire => self.tower_status_dire,
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
