//! The closed set of build tasks and their dispatch.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use crate::paths::{
    has_extension, Paths, IMAGE_EXTENSIONS, PAGE_EXTENSIONS, SCRIPT_EXTENSION, STYLE_EXTENSION,
    TEMPLATE_EXTENSION,
};
use crate::severity::SeverityGate;
use crate::{copy, scripts, styles, templates};

/// Errors from the I/O side of a task.
///
/// Transform failures do not surface here; they are reported through the
/// [`SeverityGate`] at the point they occur.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Failed to read source: {0}")]
    ReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// An independently invokable build task.
///
/// The set is closed; the CLI maps task names onto these variants, and the
/// watch coordinator maps changed paths back onto them via [`for_change`].
///
/// [`for_change`]: BuildTask::for_change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTask {
    Styles,
    Templates,
    Scripts,
    Images,
    Files,
}

/// Outcome of one task invocation.
#[derive(Debug)]
pub struct TaskReport {
    /// The task that ran.
    pub task: BuildTask,

    /// Number of output files produced.
    pub outputs: usize,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl BuildTask {
    /// Every asset task, in the order the default aggregate triggers them.
    pub const ALL: [BuildTask; 5] = [
        BuildTask::Images,
        BuildTask::Files,
        BuildTask::Styles,
        BuildTask::Scripts,
        BuildTask::Templates,
    ];

    /// Stable task name as used on the command line and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            BuildTask::Styles => "styles",
            BuildTask::Templates => "templates",
            BuildTask::Scripts => "scripts",
            BuildTask::Images => "images",
            BuildTask::Files => "files",
        }
    }

    /// Run the task once.
    ///
    /// Tasks are stateless between invocations; each run pulls from the
    /// resolved source paths and pushes to the resolved destination.
    pub fn run(&self, paths: &Paths, gate: &SeverityGate) -> Result<TaskReport, TaskError> {
        let start = Instant::now();

        let outputs = match self {
            BuildTask::Styles => styles::run(paths, gate)?,
            BuildTask::Templates => templates::run(paths, gate)?,
            BuildTask::Scripts => scripts::run(paths, gate)?,
            BuildTask::Images => copy::images(paths)?,
            BuildTask::Files => copy::files(paths)?,
        };

        Ok(TaskReport {
            task: *self,
            outputs,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// The task a changed source path re-triggers, if any.
    ///
    /// This is the watch-binding relation: the stylesheet tree maps to
    /// `Styles`, script sources to `Scripts`, any template file to
    /// `Templates`, the image tree to `Images`, and top-level pages to
    /// `Files`. Paths outside the source contract map to `None`.
    pub fn for_change(paths: &Paths, changed: &Path) -> Option<BuildTask> {
        if changed.starts_with(&paths.style_dir) && has_extension(changed, &[STYLE_EXTENSION]) {
            Some(BuildTask::Styles)
        } else if changed.starts_with(&paths.script_dir)
            && has_extension(changed, &[SCRIPT_EXTENSION])
        {
            Some(BuildTask::Scripts)
        } else if changed.starts_with(&paths.src_root)
            && has_extension(changed, &[TEMPLATE_EXTENSION])
        {
            Some(BuildTask::Templates)
        } else if changed.starts_with(&paths.image_dir) && has_extension(changed, &IMAGE_EXTENSIONS)
        {
            Some(BuildTask::Images)
        } else if changed.parent() == Some(paths.src_root.as_path())
            && has_extension(changed, &PAGE_EXTENSIONS)
        {
            Some(BuildTask::Files)
        } else {
            None
        }
    }
}

impl fmt::Display for BuildTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> Paths {
        Paths::resolve("src", "dist")
    }

    #[test]
    fn aggregate_covers_every_asset_task_once() {
        assert_eq!(BuildTask::ALL.len(), 5);
        for task in [
            BuildTask::Styles,
            BuildTask::Templates,
            BuildTask::Scripts,
            BuildTask::Images,
            BuildTask::Files,
        ] {
            assert_eq!(BuildTask::ALL.iter().filter(|t| **t == task).count(), 1);
        }
    }

    #[test]
    fn stylesheet_changes_map_to_styles() {
        let got = BuildTask::for_change(&paths(), Path::new("src/scss/components/_card.scss"));
        assert_eq!(got, Some(BuildTask::Styles));
    }

    #[test]
    fn script_changes_map_to_scripts() {
        let got = BuildTask::for_change(&paths(), Path::new("src/js/lib/nav.js"));
        assert_eq!(got, Some(BuildTask::Scripts));
    }

    #[test]
    fn template_changes_anywhere_map_to_templates() {
        let p = paths();
        assert_eq!(
            BuildTask::for_change(&p, Path::new("src/index.jinja")),
            Some(BuildTask::Templates)
        );
        assert_eq!(
            BuildTask::for_change(&p, Path::new("src/partials/header.jinja")),
            Some(BuildTask::Templates)
        );
    }

    #[test]
    fn image_changes_map_to_images() {
        let got = BuildTask::for_change(&paths(), Path::new("src/images/icons/logo.svg"));
        assert_eq!(got, Some(BuildTask::Images));
    }

    #[test]
    fn top_level_pages_map_to_files() {
        let p = paths();
        assert_eq!(
            BuildTask::for_change(&p, Path::new("src/robots.txt")),
            Some(BuildTask::Files)
        );
        // Only the top level counts as a copied page.
        assert_eq!(BuildTask::for_change(&p, Path::new("src/deep/page.html")), None);
    }

    #[test]
    fn unrelated_paths_map_to_nothing() {
        let p = paths();
        assert_eq!(BuildTask::for_change(&p, Path::new("dist/css/main.css")), None);
        assert_eq!(BuildTask::for_change(&p, Path::new("src/js/readme.md")), None);
        assert_eq!(BuildTask::for_change(&p, Path::new("src/scss/main.css")), None);
    }
}
