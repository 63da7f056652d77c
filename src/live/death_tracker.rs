use std::collections::{HashMap, VecDeque};

use crate::live::snapshot::{CombatantId, LiveSnapshot};

pub const DEFAULT_DEATH_BUFFER_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct DeathEvent {
    pub combatant: CombatantId,
    pub timestamp: f64,
}

#[derive(Debug, Clone)]
pub struct DeathTracker {
    last_alive: HashMap<CombatantId, bool>,
    deaths: VecDeque<DeathEvent>,
    capacity: usize,
}

impl Default for DeathTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DEATH_BUFFER_CAPACITY)
    }
}

impl DeathTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            last_alive: HashMap::new(),
            deaths: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    // A combatant seen for the first time has no alive baseline, so it never produces a death.
    pub fn observe(&mut self, snapshot: &LiveSnapshot, now: f64) -> usize {
        let mut recorded = 0;
        for (id, combatant) in &snapshot.combatants {
            let previously_alive = self.last_alive.insert(id.clone(), combatant.alive);
            if previously_alive == Some(true) && !combatant.alive {
                self.push_death(DeathEvent {
                    combatant: id.clone(),
                    timestamp: now,
                });
                recorded += 1;
            }
        }
        recorded
    }

    fn push_death(&mut self, event: DeathEvent) {
        while self.deaths.len() >= self.capacity {
            self.deaths.pop_front();
        }
        self.deaths.push_back(event);
    }

    pub fn recent_count(&self, window_seconds: f64, now: f64) -> u32 {
        let cutoff = now - window_seconds;
        let count = self
            .deaths
            .iter()
            .filter(|event| event.timestamp >= cutoff && event.timestamp <= now)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub fn is_alive(&self, id: &str) -> bool {
        self.last_alive.get(id).copied().unwrap_or(true)
    }
}

#[cfg(test)]
impl DeathTracker {
    pub(crate) fn events(&self) -> impl Iterator<Item = &DeathEvent> {
        self.deaths.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.deaths.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.deaths.is_empty()
    }
}
