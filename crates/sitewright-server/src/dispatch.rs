//! Task dispatch: run build tasks off the async runtime and emit their
//! reload signals.

use sitewright_pipeline::{BuildTask, Paths, SeverityGate};

use crate::reload::{ReloadHub, ReloadMessage};
use crate::watcher::WatchCoordinator;

/// Errors from the watch loop.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to watch source root: {0}")]
    SetupError(String),
}

/// Run one task on a blocking worker, then signal its reload message.
///
/// Transform failures exit through the severity gate inside the task; plain
/// I/O failures are logged here so a long-running watch session survives
/// them.
pub async fn run_task(task: BuildTask, paths: Paths, gate: SeverityGate, hub: ReloadHub) {
    let result = tokio::task::spawn_blocking(move || task.run(&paths, &gate)).await;

    match result {
        Ok(Ok(report)) => {
            tracing::info!(
                task = %report.task,
                outputs = report.outputs,
                duration_ms = report.duration_ms,
                "Task finished"
            );
            if let Some(msg) = reload_message(task) {
                hub.send(msg);
            }
        }
        Ok(Err(err)) => {
            tracing::error!(task = %task, error = %err, "Task failed");
        }
        Err(err) => {
            tracing::error!(task = %task, error = %err, "Task worker panicked");
        }
    }
}

/// Consume watch events until the coordinator dies, rebuilding one task per
/// event.
pub async fn watch_and_rebuild(
    paths: Paths,
    gate: SeverityGate,
    hub: ReloadHub,
) -> Result<(), WatchError> {
    let (coordinator, mut rx) =
        WatchCoordinator::new(&paths).map_err(|e| WatchError::SetupError(e.to_string()))?;

    tracing::info!("Watching {}", paths.src_root.display());

    while let Some(task) = rx.recv().await {
        tracing::info!(task = %task, "Source changed");
        run_task(task, paths.clone(), gate, hub.clone()).await;
    }

    drop(coordinator);
    Ok(())
}

/// The reload signal a completed task sends, if any.
///
/// Styles refresh in place; templates and scripts need a full reload; plain
/// copies signal nothing.
fn reload_message(task: BuildTask) -> Option<ReloadMessage> {
    match task {
        BuildTask::Styles => Some(ReloadMessage::UpdateStyles {
            href: "/css/main.css".to_string(),
        }),
        BuildTask::Templates | BuildTask::Scripts => Some(ReloadMessage::Reload),
        BuildTask::Images | BuildTask::Files => None,
    }
}
