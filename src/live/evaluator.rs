use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::classifier::classify;
use crate::label::MacroLabel;
use crate::live::extract::DEFAULT_RECENT_WINDOW_SECONDS;
use crate::live::hint::{write_hint_file, Hint, SharedHint};
use crate::live::model_client::{resolve_label, TacticalModel};
use crate::live::{lock_state, LiveClock, SharedLiveState};
use crate::settings::DEFAULT_MODEL_TIMEOUT_MS;

pub struct Evaluator<M> {
    state: SharedLiveState,
    hint: SharedHint,
    model: Option<M>,
    clock: LiveClock,
    recent_window_seconds: f64,
    model_timeout: Duration,
    hint_path: Option<PathBuf>,
    last_published: Option<MacroLabel>,
}

impl<M: TacticalModel> Evaluator<M> {
    pub fn new(state: SharedLiveState, hint: SharedHint, clock: LiveClock) -> Self {
        Self {
            state,
            hint,
            model: None,
            clock,
            recent_window_seconds: DEFAULT_RECENT_WINDOW_SECONDS,
            model_timeout: Duration::from_millis(DEFAULT_MODEL_TIMEOUT_MS),
            hint_path: None,
            last_published: None,
        }
    }

    pub fn with_model(mut self, model: Option<M>, model_timeout: Duration) -> Self {
        self.model = model;
        self.model_timeout = model_timeout;
        self
    }

    pub fn with_recent_window(mut self, recent_window_seconds: f64) -> Self {
        self.recent_window_seconds = recent_window_seconds;
        self
    }

    pub fn with_hint_file(mut self, hint_path: Option<PathBuf>) -> Self {
        self.hint_path = hint_path;
        self
    }

    pub async fn tick(&mut self) -> Option<MacroLabel> {
        let now = self.clock.elapsed_seconds();
        let (features, clock_time) = {
            let mut live_state = lock_state(&self.state)?;
            live_state.evaluate_features(self.recent_window_seconds, now)?
        };

        let rule_label = classify(&features);
        let label = match &self.model {
            Some(model) => {
                let model_label = resolve_label(model, &features, self.model_timeout).await;
                if model_label != rule_label {
                    tracing::debug!(
                        rule_label = %rule_label,
                        model_label = %model_label,
                        clock_time = ?clock_time,
                        "Rules and model disagree"
                    );
                }
                model_label
            }
            None => rule_label,
        };

        self.publish(label, clock_time).await;
        Some(label)
    }

    async fn publish(&mut self, label: MacroLabel, clock_time: Option<i64>) {
        let hint = Hint::for_label(label, clock_time);

        if self.last_published != Some(label) {
            tracing::info!(label = %label, clock_time = ?clock_time, "{}", hint.hint);
            self.last_published = Some(label);
        }

        if let Some(hint_path) = &self.hint_path {
            if let Err(error) = write_hint_file(hint_path, &hint) {
                tracing::warn!(
                    hint_path = %hint_path.display(),
                    write_error = %error,
                    "Failed to write hint file"
                );
            }
        }

        *self.hint.write().await = hint;
    }

    pub async fn run(mut self, tick_interval: Duration) {
        let mut interval = tokio::time::interval(tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }
}
