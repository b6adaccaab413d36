//! Asset build pipeline: path resolution, the task set, the severity gate,
//! and the deploy publisher.

mod copy;
mod paths;
mod publish;
mod scripts;
mod severity;
mod styles;
mod task;
mod templates;

pub use paths::{
    Paths, IMAGE_EXTENSIONS, PAGE_EXTENSIONS, SCRIPT_EXTENSION, STYLE_EXTENSION,
    TEMPLATE_EXTENSION,
};
pub use publish::{publish, PublishError, PublishSummary, DEFAULT_BRANCH};
pub use severity::{Severity, SeverityGate};
pub use task::{BuildTask, TaskError, TaskReport};
