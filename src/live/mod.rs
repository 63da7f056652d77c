pub mod death_tracker;
pub mod evaluator;
pub mod extract;
pub mod hint;
pub mod ingest;
pub mod model_client;
pub mod snapshot;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::features::FeatureVector;
use crate::Side;

pub use death_tracker::DeathTracker;
pub use evaluator::Evaluator;
pub use hint::{Hint, SharedHint};
pub use model_client::{HttpModel, TacticalModel};
pub use snapshot::LiveSnapshot;

#[derive(Debug, Clone, Copy)]
pub struct LiveClock {
    start_time: Instant,
}

impl LiveClock {
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

#[derive(Debug, Default)]
pub struct LiveState {
    latest: Option<LiveSnapshot>,
    tracker: DeathTracker,
    own_side: Option<Side>,
}

pub type SharedLiveState = Arc<Mutex<LiveState>>;

pub fn new_shared_state(death_buffer_capacity: usize) -> SharedLiveState {
    Arc::new(Mutex::new(LiveState::new(death_buffer_capacity)))
}

impl LiveState {
    pub fn new(death_buffer_capacity: usize) -> Self {
        Self {
            latest: None,
            tracker: DeathTracker::new(death_buffer_capacity),
            own_side: None,
        }
    }

    pub fn ingest(&mut self, snapshot: LiveSnapshot, now: f64) -> usize {
        let recorded_deaths = self.tracker.observe(&snapshot, now);
        self.latest = Some(snapshot);
        recorded_deaths
    }

    pub fn evaluate_features(
        &mut self,
        recent_window_seconds: f64,
        now: f64,
    ) -> Option<(FeatureVector, Option<i64>)> {
        let snapshot = self.latest.as_ref()?;
        let own_side = *self
            .own_side
            .get_or_insert(snapshot.own_team.unwrap_or(Side::Radiant));
        let features = extract::extract_live_features(
            snapshot,
            own_side,
            &self.tracker,
            recent_window_seconds,
            now,
        );
        Some((features, snapshot.clock_time))
    }
}

#[cfg(test)]
impl LiveState {
    pub(crate) fn own_side(&self) -> Option<Side> {
        self.own_side
    }

    pub(crate) fn tracker(&self) -> &DeathTracker {
        &self.tracker
    }

    pub(crate) fn has_snapshot(&self) -> bool {
        self.latest.is_some()
    }
}

pub(crate) fn lock_state(state: &SharedLiveState) -> Option<MutexGuard<'_, LiveState>> {
    match state.lock() {
        Ok(guard) => Some(guard),
        Err(error) => {
            tracing::error!(lock_error = %error, "Live state lock is poisoned");
            None
        }
    }
}

pub fn ingest_snapshot(state: &SharedLiveState, snapshot: LiveSnapshot, now: f64) -> usize {
    let Some(mut live_state) = lock_state(state) else {
        return 0;
    };
    live_state.ingest(snapshot, now)
}
