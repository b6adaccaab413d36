//! Resolution of every source and destination location from the two roots.

use std::path::{Path, PathBuf};

/// Image formats copied verbatim by the images task.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "svg", "png", "gif"];

/// Top-level files copied verbatim to the destination root.
pub const PAGE_EXTENSIONS: [&str; 2] = ["html", "txt"];

/// Extension of renderable page templates.
pub const TEMPLATE_EXTENSION: &str = "jinja";

/// Extension of bundled script sources.
pub const SCRIPT_EXTENSION: &str = "js";

/// Extension of stylesheet sources.
pub const STYLE_EXTENSION: &str = "scss";

/// The resolved path set.
///
/// Built once at startup from the two configured roots and passed by
/// reference to every component; nothing mutates it afterwards. Every field
/// is a fixed suffix joined onto one of the roots, so resolution is pure and
/// cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Source root directory.
    pub src_root: PathBuf,

    /// Destination root directory; rendered pages and copied top-level
    /// files land here directly.
    pub dist_root: PathBuf,

    /// Stylesheet entry file, `{src}/scss/main.scss`.
    pub stylesheet_entry: PathBuf,

    /// Stylesheet tree, `{src}/scss`; also the compiler include path.
    pub style_dir: PathBuf,

    /// Partial-template directory, `{src}/partials`.
    pub partials_dir: PathBuf,

    /// Script source tree, `{src}/js`.
    pub script_dir: PathBuf,

    /// Image source tree, `{src}/images`.
    pub image_dir: PathBuf,

    /// Compiled stylesheet destination, `{dist}/css`.
    pub dist_css: PathBuf,

    /// Bundled script destination, `{dist}/js`.
    pub dist_js: PathBuf,

    /// Copied image destination, `{dist}/images`.
    pub dist_images: PathBuf,
}

impl Paths {
    /// Derive the full path set from the two roots.
    pub fn resolve(src_root: impl Into<PathBuf>, dist_root: impl Into<PathBuf>) -> Self {
        let src_root = src_root.into();
        let dist_root = dist_root.into();

        Self {
            stylesheet_entry: src_root.join("scss").join("main.scss"),
            style_dir: src_root.join("scss"),
            partials_dir: src_root.join("partials"),
            script_dir: src_root.join("js"),
            image_dir: src_root.join("images"),
            dist_css: dist_root.join("css"),
            dist_js: dist_root.join("js"),
            dist_images: dist_root.join("images"),
            src_root,
            dist_root,
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::resolve("src", "dist")
    }
}

/// Whether `path` carries one of the listed extensions (ASCII
/// case-insensitive).
pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
