//! Source watching: filesystem events classified into task triggers.

use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use sitewright_pipeline::{BuildTask, Paths};

/// Watches the source root and emits the task each change re-triggers.
///
/// Detection and invocation are decoupled: the coordinator only classifies
/// events onto a channel; the dispatcher decides what to do with them.
pub struct WatchCoordinator {
    _watcher: RecommendedWatcher,
}

impl WatchCoordinator {
    /// Start watching the source root of `paths`.
    ///
    /// Returns the coordinator and the channel of triggered tasks. The
    /// coordinator must stay alive for events to keep flowing.
    pub fn new(paths: &Paths) -> Result<(Self, async_mpsc::Receiver<BuildTask>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        if paths.src_root.exists() {
            watcher
                .watch(&paths.src_root, RecursiveMode::Recursive)
                .map_err(std::io::Error::other)?;
        }

        // Classification compares prefixes, so resolve the roots to the
        // absolute form notify reports.
        let canonical_src = paths
            .src_root
            .canonicalize()
            .unwrap_or_else(|_| paths.src_root.clone());
        let class_paths = Paths::resolve(canonical_src, &paths.dist_root);

        // Forward events on a dedicated thread, skipping rapid repeats.
        std::thread::spawn(move || {
            let mut last_event_time = std::time::Instant::now();
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                let now = std::time::Instant::now();
                if now.duration_since(last_event_time) < debounce_duration {
                    continue;
                }
                last_event_time = now;

                if !is_change(&event.kind) {
                    continue;
                }

                for path in event.paths {
                    if let Some(task) = BuildTask::for_change(&class_paths, &path) {
                        let _ = async_tx.blocking_send(task);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Whether an event kind represents a content change worth rebuilding for.
fn is_change(kind: &notify::EventKind) -> bool {
    use notify::EventKind;

    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn stylesheet_change_triggers_styles() {
        let temp = tempfile::tempdir().unwrap();
        let paths = Paths::resolve(temp.path().join("src"), temp.path().join("dist"));
        fs::create_dir_all(&paths.style_dir).unwrap();

        let (coordinator, mut rx) = WatchCoordinator::new(&paths).unwrap();

        // Give the backend time to set up before producing the event.
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(paths.style_dir.join("main.scss"), ".card { margin: 0; }").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(coordinator);

        assert!(event.is_ok(), "timeout waiting for watch event");
        assert_eq!(event.unwrap(), Some(BuildTask::Styles));
    }
}
