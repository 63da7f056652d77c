use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::Side;

pub type CombatantId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveCombatant {
    pub team: Option<Side>,
    pub alive: bool,
    pub net_worth: i64,
}

impl Default for LiveCombatant {
    fn default() -> Self {
        Self {
            team: None,
            alive: true,
            net_worth: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    pub name: String,
    pub health: Option<i64>,
}

impl Structure {
    pub fn is_destroyed(&self) -> bool {
        self.health == Some(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSnapshot {
    pub combatants: HashMap<CombatantId, LiveCombatant>,
    pub own_team: Option<Side>,
    pub clock_time: Option<i64>,
    pub radiant_gold_adv: Option<i64>,
    pub radiant_xp_adv: Option<i64>,
    pub roshan_state: Option<String>,
    pub structures: Vec<Structure>,
}

impl LiveSnapshot {
    pub fn from_json_str(raw_json: &str) -> Result<Self> {
        let value = serde_json::from_str::<Value>(raw_json)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw_json = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw_json)
    }

    pub fn from_value(value: &Value) -> Self {
        let map_block = value.get("map");
        let field = |name: &str| map_block.and_then(|block| block.get(name));

        let combatants = value
            .get("allplayers")
            .and_then(Value::as_object)
            .map(parse_combatants)
            .unwrap_or_default();

        let own_team = value.get("player").and_then(|player| {
            parse_team(player.get("team")).or_else(|| parse_team(player.get("team_name")))
        });

        let mut structures = Vec::new();
        for buildings in [field("buildings"), value.get("buildings")].into_iter().flatten() {
            collect_structures(buildings, None, &mut structures);
        }

        Self {
            combatants,
            own_team,
            clock_time: parse_integer(field("clock_time")),
            radiant_gold_adv: parse_integer(field("radiant_gold_adv")),
            radiant_xp_adv: parse_integer(field("radiant_xp_adv")),
            roshan_state: field("roshan_state")
                .and_then(Value::as_str)
                .map(|state| state.trim().to_ascii_lowercase()),
            structures,
        }
    }
}

fn parse_combatants(players: &Map<String, Value>) -> HashMap<CombatantId, LiveCombatant> {
    players
        .iter()
        .filter(|(_, player)| player.is_object())
        .map(|(id, player)| {
            let combatant = LiveCombatant {
                team: parse_team(player.get("team")).or_else(|| parse_team(player.get("team2"))),
                alive: parse_flag(player.get("alive")).unwrap_or(true),
                net_worth: parse_integer(player.get("net_worth"))
                    .or_else(|| parse_integer(player.get("gold")))
                    .unwrap_or(0),
            };
            (id.clone(), combatant)
        })
        .collect()
}

fn collect_structures(value: &Value, name: Option<&str>, structures: &mut Vec<Structure>) {
    match value {
        Value::Array(entries) => {
            for entry in entries {
                let entry_name = entry.get("name").and_then(Value::as_str);
                if let Some(entry_name) = entry_name {
                    structures.push(Structure {
                        name: entry_name.to_string(),
                        health: parse_integer(entry.get("health")),
                    });
                }
            }
        }
        Value::Object(entries) if entries.contains_key("health") => {
            if let Some(name) = name {
                structures.push(Structure {
                    name: name.to_string(),
                    health: parse_integer(entries.get("health")),
                });
            }
        }
        Value::Object(entries) => {
            for (key, child) in entries {
                collect_structures(child, Some(key), structures);
            }
        }
        _ => {}
    }
}

fn parse_team(value: Option<&Value>) -> Option<Side> {
    match value? {
        Value::Number(number) => number.as_i64().and_then(Side::from_team_code),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(Side::from_team_code)
            .or_else(|| Side::from_name(text)),
        _ => None,
    }
}

fn parse_flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|number| number != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}
