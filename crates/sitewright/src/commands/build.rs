//! One-shot build task invocation.

use anyhow::Result;
use sitewright_pipeline::{BuildTask, Paths, SeverityGate};

/// Run a single build task and report its outcome.
pub fn run(task: BuildTask, paths: &Paths, gate: &SeverityGate) -> Result<()> {
    let report = task.run(paths, gate)?;

    tracing::info!(
        "{}: {} outputs in {}ms",
        report.task,
        report.outputs,
        report.duration_ms
    );

    Ok(())
}
