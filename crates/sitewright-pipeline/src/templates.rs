//! Page template rendering against the partials directory.

use std::fs;
use std::path::PathBuf;

use minijinja::{context, Environment};

use crate::paths::{has_extension, Paths, TEMPLATE_EXTENSION};
use crate::severity::{Severity, SeverityGate};
use crate::task::TaskError;

/// Render every top-level template into the destination root.
///
/// Each `{src}/*.jinja` file is rendered against `{src}/partials`, renamed to
/// `.html`, and written to `{dist}`. Render failures report at `Error` level;
/// an unresolved partial include renders as empty instead of failing.
pub(crate) fn run(paths: &Paths, gate: &SeverityGate) -> Result<usize, TaskError> {
    if !paths.src_root.is_dir() {
        return Ok(0);
    }

    let env = partial_env(paths.partials_dir.clone());
    let mut rendered = 0;

    for page in top_level_templates(paths)? {
        let source =
            fs::read_to_string(&page).map_err(|e| TaskError::ReadError(e.to_string()))?;

        let html = match env.render_str(&source, context! {}) {
            Ok(html) => html,
            Err(err) => {
                gate.report(
                    Severity::Error,
                    &format!("templates: {}: {err}", page.display()),
                );
                continue;
            }
        };

        let stem = page
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");
        let dest = paths.dist_root.join(format!("{stem}.html"));

        fs::create_dir_all(&paths.dist_root)
            .map_err(|e| TaskError::WriteError(e.to_string()))?;
        fs::write(&dest, html).map_err(|e| TaskError::WriteError(e.to_string()))?;

        tracing::debug!("Rendered {}", dest.display());
        rendered += 1;
    }

    Ok(rendered)
}

/// Template environment whose includes resolve against the partials
/// directory, with unresolved names rendering as empty.
fn partial_env(partials_dir: PathBuf) -> Environment<'static> {
    let mut env = Environment::new();

    env.set_loader(move |name| {
        if name.contains("..") {
            return Ok(Some(String::new()));
        }
        match fs::read_to_string(partials_dir.join(name)) {
            Ok(source) => Ok(Some(source)),
            Err(_) => Ok(Some(String::new())),
        }
    });

    env
}

/// The top-level template files, in sorted order.
fn top_level_templates(paths: &Paths) -> Result<Vec<PathBuf>, TaskError> {
    let entries =
        fs::read_dir(&paths.src_root).map_err(|e| TaskError::ReadError(e.to_string()))?;

    let mut pages: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_extension(path, &[TEMPLATE_EXTENSION]))
        .collect();

    pages.sort();
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_paths() -> (tempfile::TempDir, Paths) {
        let temp = tempfile::tempdir().unwrap();
        let paths = Paths::resolve(temp.path().join("src"), temp.path().join("dist"));
        fs::create_dir_all(&paths.src_root).unwrap();
        (temp, paths)
    }

    #[test]
    fn renders_pages_with_partials() {
        let (_temp, paths) = temp_paths();

        fs::create_dir_all(&paths.partials_dir).unwrap();
        fs::write(paths.partials_dir.join("header.jinja"), "<header>Site</header>").unwrap();
        fs::write(
            paths.src_root.join("index.jinja"),
            "{% include \"header.jinja\" %}\n<main>Home</main>",
        )
        .unwrap();

        let rendered = run(&paths, &SeverityGate::default()).unwrap();

        assert_eq!(rendered, 1);
        let html = fs::read_to_string(paths.dist_root.join("index.html")).unwrap();
        assert!(html.contains("<header>Site</header>"));
        assert!(html.contains("<main>Home</main>"));
    }

    #[test]
    fn unresolved_partials_render_empty() {
        let (_temp, paths) = temp_paths();

        fs::write(
            paths.src_root.join("about.jinja"),
            "before {% include \"missing.jinja\" %} after",
        )
        .unwrap();

        let rendered = run(&paths, &SeverityGate::default()).unwrap();

        assert_eq!(rendered, 1);
        let html = fs::read_to_string(paths.dist_root.join("about.html")).unwrap();
        assert!(html.contains("before"));
        assert!(html.contains("after"));
    }

    #[test]
    fn nested_templates_are_not_rendered_as_pages() {
        let (_temp, paths) = temp_paths();

        fs::create_dir_all(&paths.partials_dir).unwrap();
        fs::write(paths.partials_dir.join("nav.jinja"), "<nav></nav>").unwrap();
        fs::write(paths.src_root.join("index.jinja"), "<main></main>").unwrap();

        let rendered = run(&paths, &SeverityGate::default()).unwrap();

        assert_eq!(rendered, 1);
        assert!(!paths.dist_root.join("nav.html").exists());
    }
}
