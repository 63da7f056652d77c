use crate::features::FeatureVector;
use crate::live::death_tracker::DeathTracker;
use crate::live::snapshot::LiveSnapshot;
use crate::Side;

pub const DEFAULT_RECENT_WINDOW_SECONDS: f64 = 15.0;

const CORES_PER_SIDE: usize = 2;
const TIER3_TOWER_NAME_MARKER: &str = "_tower3_";
const ROSHAN_ALIVE_STATE: &str = "alive";

pub fn extract_live_features(
    snapshot: &LiveSnapshot,
    own_side: Side,
    tracker: &DeathTracker,
    recent_window_seconds: f64,
    now: f64,
) -> FeatureVector {
    let orientation = own_side.radiant_sign();
    let mut features = FeatureVector {
        gold_adv: radiant_gold_adv(snapshot).saturating_mul(orientation),
        xp_adv: snapshot.radiant_xp_adv.unwrap_or(0).saturating_mul(orientation),
        boss_alive: snapshot.roshan_state.as_deref() == Some(ROSHAN_ALIVE_STATE),
        recent_deaths: tracker.recent_count(recent_window_seconds, now),
        enemy_t3_down: enemy_tier3_down(snapshot, own_side.opponent()),
        ..FeatureVector::default()
    };

    for combatant in snapshot.combatants.values() {
        let Some(team) = combatant.team else {
            continue;
        };
        match (team == own_side, combatant.alive) {
            (true, true) => features.own_alive += 1,
            (true, false) => features.own_dead_total += 1,
            (false, true) => features.enemy_alive += 1,
            (false, false) => features.enemy_dead_total += 1,
        }
    }

    for id in core_ids(snapshot, own_side) {
        if tracker.is_alive(id) {
            features.own_core_alive += 1;
        }
    }
    for id in core_ids(snapshot, own_side.opponent()) {
        if tracker.is_alive(id) {
            features.enemy_core_alive += 1;
        } else {
            features.enemy_core_dead += 1;
        }
    }

    features
}

fn radiant_gold_adv(snapshot: &LiveSnapshot) -> i64 {
    if let Some(gold_adv) = snapshot.radiant_gold_adv {
        return gold_adv;
    }

    // Summed wide so the result does not depend on map iteration order.
    let total = snapshot
        .combatants
        .values()
        .filter_map(|combatant| {
            combatant
                .team
                .map(|team| i128::from(combatant.net_worth) * i128::from(team.radiant_sign()))
        })
        .sum::<i128>();
    i64::try_from(total).unwrap_or(if total > 0 { i64::MAX } else { i64::MIN })
}

// Ties go to the larger id so the ranking does not depend on map iteration order.
fn core_ids(snapshot: &LiveSnapshot, side: Side) -> Vec<&str> {
    let mut ranked = snapshot
        .combatants
        .iter()
        .filter(|(_, combatant)| combatant.team == Some(side))
        .map(|(id, combatant)| (combatant.net_worth, id.as_str()))
        .collect::<Vec<_>>();
    ranked.sort_unstable_by(|left, right| right.cmp(left));
    ranked
        .into_iter()
        .take(CORES_PER_SIDE)
        .map(|(_, id)| id)
        .collect()
}

fn enemy_tier3_down(snapshot: &LiveSnapshot, enemy: Side) -> bool {
    let other_marker = enemy.opponent().structure_marker();
    let mut tier3_towers = snapshot
        .structures
        .iter()
        .filter(|structure| structure.name.contains(TIER3_TOWER_NAME_MARKER))
        .filter(|structure| !structure.name.contains(other_marker))
        .peekable();

    if tier3_towers.peek().is_none() {
        return false;
    }

    tier3_towers.all(|structure| structure.is_destroyed())
}
