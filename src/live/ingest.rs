use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::live::snapshot::LiveSnapshot;
use crate::live::{ingest_snapshot, LiveClock, SharedLiveState};
use crate::offline::dataset::is_json_file;

pub async fn watch_snapshots(
    watch_dir: PathBuf,
    state: SharedLiveState,
    clock: LiveClock,
) -> Result<()> {
    std::fs::create_dir_all(&watch_dir)?;

    let (notify_sender, mut notify_receiver) =
        mpsc::unbounded_channel::<std::result::Result<Event, notify::Error>>();

    let mut watcher = notify::recommended_watcher(move |result| {
        if notify_sender.send(result).is_err() {
            tracing::debug!("Snapshot watcher notification receiver dropped");
        }
    })?;
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
    tracing::info!(watch_dir = %watch_dir.display(), "Watching for game-state snapshots");

    while let Some(notification_result) = notify_receiver.recv().await {
        match notification_result {
            Ok(event) => {
                if !is_relevant_notification(&event) {
                    continue;
                }
                for snapshot_path in event.paths.iter().filter(|path| is_json_file(path)) {
                    ingest_snapshot_file(snapshot_path, &state, clock.elapsed_seconds());
                }
            }
            Err(error) => {
                tracing::warn!(watch_error = %error, "Snapshot watcher error");
            }
        }
    }

    Ok(())
}

fn is_relevant_notification(event: &Event) -> bool {
    let relevant_kind = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
    relevant_kind && event.paths.iter().any(|path| is_json_file(path))
}

pub fn ingest_snapshot_file(snapshot_path: &Path, state: &SharedLiveState, now: f64) -> usize {
    match LiveSnapshot::from_path(snapshot_path) {
        Ok(snapshot) => {
            let recorded_deaths = ingest_snapshot(state, snapshot, now);
            if recorded_deaths > 0 {
                tracing::debug!(
                    snapshot = %snapshot_path.display(),
                    deaths = recorded_deaths,
                    "Recorded deaths from snapshot"
                );
            }
            recorded_deaths
        }
        Err(error) => {
            tracing::warn!(
                snapshot = %snapshot_path.display(),
                parse_error = %error,
                "Skipping unreadable snapshot"
            );
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ingest_snapshot_file, is_relevant_notification, watch_snapshots};
    use crate::live::{new_shared_state, LiveClock, SharedLiveState};
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind};
    use notify::{Event, EventKind};
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    fn recorded_deaths(state: &SharedLiveState) -> usize {
        state.lock().unwrap().tracker().len()
    }

    #[test]
    fn only_json_creates_and_modifications_are_relevant() {
        let json_path = PathBuf::from("gsi_logs/1700000000.json");
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path(json_path.clone());
        let modified = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(json_path.clone());
        let accessed = Event::new(EventKind::Access(AccessKind::Read)).add_path(json_path);
        let temp_file = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("gsi_logs/partial.tmp"));

        assert!(is_relevant_notification(&created));
        assert!(is_relevant_notification(&modified));
        assert!(!is_relevant_notification(&accessed));
        assert!(!is_relevant_notification(&temp_file));
    }

    #[test]
    fn ingests_snapshot_files_and_skips_malformed_ones() {
        let directory = tempfile::tempdir().unwrap();
        let state = new_shared_state(10);

        let first = directory.path().join("0001.json");
        std::fs::write(&first, r#"{"allplayers": {"a": {"team": 2, "alive": true}}}"#).unwrap();
        let broken = directory.path().join("0002.json");
        std::fs::write(&broken, r#"{"allplayers": "#).unwrap();
        let second = directory.path().join("0003.json");
        std::fs::write(&second, r#"{"allplayers": {"a": {"team": 2, "alive": false}}}"#).unwrap();

        assert_eq!(ingest_snapshot_file(&first, &state, 1.0), 0);
        assert_eq!(ingest_snapshot_file(&broken, &state, 1.5), 0);
        assert_eq!(ingest_snapshot_file(&second, &state, 2.0), 1);
        assert_eq!(
            ingest_snapshot_file(&directory.path().join("missing.json"), &state, 3.0),
            0
        );

        let live_state = state.lock().unwrap();
        assert_eq!(live_state.tracker().len(), 1);
        assert!(!live_state.tracker().is_alive("a"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn watcher_records_deaths_from_snapshots_written_into_the_directory() {
        let directory = tempfile::tempdir().unwrap();
        let watch_dir = directory.path().join("gsi_logs");
        std::fs::create_dir_all(&watch_dir).unwrap();
        let state = new_shared_state(10);
        let watch_task = tokio::spawn(watch_snapshots(
            watch_dir.clone(),
            state.clone(),
            LiveClock::start(),
        ));

        tokio::time::sleep(Duration::from_millis(300)).await;
        std::fs::write(
            watch_dir.join("0001.json"),
            r#"{"allplayers": {"a": {"team": 2, "alive": true}}}"#,
        )
        .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        std::fs::write(
            watch_dir.join("0002.json"),
            r#"{"allplayers": {"a": {"team": 2, "alive": false}}}"#,
        )
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while recorded_deaths(&state) == 0 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert!(!watch_task.is_finished());
        watch_task.abort();
        assert_eq!(recorded_deaths(&state), 1);
        assert!(!state.lock().unwrap().tracker().is_alive("a"));
    }
}
