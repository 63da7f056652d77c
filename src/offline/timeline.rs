use crate::features::FeatureVector;
use crate::offline::record::{MatchRecord, PlayerRecord};
use crate::Side;

pub const DEFAULT_RESPAWN_SECONDS: f64 = 40.0;
pub const ROSHAN_RESPAWN_WINDOW_SECONDS: f64 = 600.0;
pub const HINDSIGHT_HALF_WINDOW_SECONDS: f64 = 7.0;

const ROSHAN_KILL_OBJECTIVE: &str = "CHAT_MESSAGE_ROSHAN_KILL";
const TIER3_TOWER_MASK: u32 = 0b111000;
const CORES_PER_SIDE: usize = 2;
const SECONDS_PER_BUCKET: i64 = 60;

#[derive(Debug, Clone)]
struct TimelineCombatant {
    side: Side,
    death_times: Vec<f64>,
    respawn_seconds: f64,
    is_core: bool,
}

impl TimelineCombatant {
    fn is_dead_at(&self, t: f64) -> bool {
        self.death_times
            .iter()
            .any(|&death| death <= t && t < death + self.respawn_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct MatchTimeline {
    own_side: Side,
    gold_adv: Vec<i64>,
    xp_adv: Vec<i64>,
    combatants: Vec<TimelineCombatant>,
    roshan_kills: Vec<f64>,
    enemy_t3_down: bool,
}

impl MatchTimeline {
    pub fn new(record: &MatchRecord, own_side: Side) -> Self {
        let series_length = record
            .players
            .iter()
            .map(|player| player.gold_t.len())
            .max()
            .unwrap_or(0)
            .max(1);

        let core_indices = richest_indices(&record.players);
        let combatants = record
            .players
            .iter()
            .enumerate()
            .map(|(index, player)| TimelineCombatant {
                side: player.side(),
                death_times: player.death_times.clone(),
                respawn_seconds: player.respawn_time.unwrap_or(DEFAULT_RESPAWN_SECONDS),
                is_core: core_indices.contains(&index),
            })
            .collect();

        let roshan_kills = record
            .objectives
            .iter()
            .filter(|objective| objective.kind == ROSHAN_KILL_OBJECTIVE)
            .filter_map(|objective| objective.time)
            .collect();

        let enemy_t3_down = record
            .tower_status(own_side.opponent())
            .map(|status| status & TIER3_TOWER_MASK == 0)
            .unwrap_or(false);

        Self {
            own_side,
            gold_adv: differential_series(&record.players, own_side, series_length, |player| {
                &player.gold_t
            }),
            xp_adv: differential_series(&record.players, own_side, series_length, |player| {
                &player.xp_t
            }),
            combatants,
            roshan_kills,
            enemy_t3_down,
        }
    }

    pub fn features_at(&self, t: i64) -> FeatureVector {
        let bucket = bucket_index(t, self.gold_adv.len());
        let instant = t as f64;

        let mut features = FeatureVector {
            gold_adv: self.gold_adv[bucket],
            xp_adv: self.xp_adv[bucket],
            boss_alive: self.boss_alive_at(instant),
            recent_deaths: self.recent_deaths_at(instant),
            enemy_t3_down: self.enemy_t3_down,
            ..FeatureVector::default()
        };

        for combatant in &self.combatants {
            let dead = combatant.is_dead_at(instant);
            let own = combatant.side == self.own_side;
            match (own, dead) {
                (true, true) => features.own_dead_total += 1,
                (true, false) => features.own_alive += 1,
                (false, true) => features.enemy_dead_total += 1,
                (false, false) => features.enemy_alive += 1,
            }

            if !combatant.is_core {
                continue;
            }
            match (own, dead) {
                (true, false) => features.own_core_alive += 1,
                (false, false) => features.enemy_core_alive += 1,
                (false, true) => features.enemy_core_dead += 1,
                (true, true) => {}
            }
        }

        features
    }

    pub fn boss_alive_at(&self, t: f64) -> bool {
        !self
            .roshan_kills
            .iter()
            .any(|&kill| kill <= t && t < kill + ROSHAN_RESPAWN_WINDOW_SECONDS)
    }

    // Symmetric around `t`: labeling has full hindsight.
    pub fn recent_deaths_at(&self, t: f64) -> u32 {
        let count = self
            .combatants
            .iter()
            .flat_map(|combatant| combatant.death_times.iter())
            .filter(|&&death| {
                t - HINDSIGHT_HALF_WINDOW_SECONDS <= death
                    && death <= t + HINDSIGHT_HALF_WINDOW_SECONDS
            })
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

fn bucket_index(t: i64, series_length: usize) -> usize {
    let bucket = usize::try_from(t.max(0) / SECONDS_PER_BUCKET).unwrap_or(usize::MAX);
    bucket.min(series_length.saturating_sub(1))
}

fn differential_series<F>(
    players: &[PlayerRecord],
    own_side: Side,
    series_length: usize,
    samples: F,
) -> Vec<i64>
where
    F: Fn(&PlayerRecord) -> &Vec<i64>,
{
    let mut series = vec![0_i64; series_length];
    for player in players {
        let sign = if player.side() == own_side { 1 } else { -1 };
        for (bucket, value) in samples(player).iter().take(series_length).enumerate() {
            series[bucket] = series[bucket].saturating_add(value.saturating_mul(sign));
        }
    }
    series
}

fn richest_indices(players: &[PlayerRecord]) -> Vec<usize> {
    let mut cores = Vec::with_capacity(CORES_PER_SIDE * 2);
    for side in [Side::Radiant, Side::Dire] {
        let mut ranked = players
            .iter()
            .enumerate()
            .filter(|(_, player)| player.side() == side)
            .collect::<Vec<_>>();
        ranked.sort_by(|(_, left), (_, right)| right.total_gold.cmp(&left.total_gold));
        cores.extend(ranked.into_iter().take(CORES_PER_SIDE).map(|(index, _)| index));
    }
    cores
}
