use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureVector {
    pub gold_adv: i64,
    pub xp_adv: i64,
    pub own_alive: u32,
    pub enemy_alive: u32,
    pub own_dead_total: u32,
    pub enemy_dead_total: u32,
    pub own_core_alive: u32,
    pub enemy_core_alive: u32,
    pub enemy_core_dead: u32,
    pub boss_alive: bool,
    pub recent_deaths: u32,
    pub enemy_t3_down: bool,
}

impl FeatureVector {
    pub const COLUMNS: [&'static str; 12] = [
        "gold_adv",
        "xp_adv",
        "our_alive",
        "enemy_alive",
        "our_dead_tot",
        "enemy_dead_tot",
        "our_core_alive",
        "enemy_core_alive",
        "enemy_core_dead",
        "roshan_alive",
        "recent_deaths",
        "towers_dire_t3_down",
    ];

    pub fn values(&self) -> [i64; 12] {
        [
            self.gold_adv,
            self.xp_adv,
            i64::from(self.own_alive),
            i64::from(self.enemy_alive),
            i64::from(self.own_dead_total),
            i64::from(self.enemy_dead_total),
            i64::from(self.own_core_alive),
            i64::from(self.enemy_core_alive),
            i64::from(self.enemy_core_dead),
            i64::from(self.boss_alive),
            i64::from(self.recent_deaths),
            i64::from(self.enemy_t3_down),
        ]
    }

    pub fn to_json_map(&self) -> Map<String, Value> {
        Self::COLUMNS
            .iter()
            .zip(self.values())
            .map(|(column, value)| (column.to_string(), Value::from(value)))
            .collect()
    }
}
