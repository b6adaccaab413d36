//! Stylesheet compilation and vendor prefixing.

use std::fs;
use std::sync::{Arc, RwLock};

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::paths::Paths;
use crate::severity::{Severity, SeverityGate};
use crate::task::TaskError;

/// Browser support range for vendor prefixing.
const BROWSER_RANGE: &str = "last 2 versions";

/// Compile the stylesheet entry, prefix it, and write `{dist}/css/main.css`.
///
/// Compile failures report at `Error` level and skip the destination write.
/// Prefixer problems report at `Warning` level; if the prefixer fails
/// outright, the unprefixed compile output is written instead.
pub(crate) fn run(paths: &Paths, gate: &SeverityGate) -> Result<usize, TaskError> {
    let options = grass::Options::default().load_path(&paths.style_dir);

    let compiled = match grass::from_path(&paths.stylesheet_entry, &options) {
        Ok(css) => css,
        Err(err) => {
            gate.report(Severity::Error, &format!("styles: {err}"));
            return Ok(0);
        }
    };

    let css = match prefix(&compiled) {
        Ok((css, warnings)) => {
            for warning in warnings {
                gate.report(Severity::Warning, &format!("styles: {warning}"));
            }
            css
        }
        Err(err) => {
            gate.report(Severity::Warning, &format!("styles: prefixer: {err}"));
            compiled
        }
    };

    fs::create_dir_all(&paths.dist_css).map_err(|e| TaskError::WriteError(e.to_string()))?;

    let dest = paths.dist_css.join("main.css");
    fs::write(&dest, css).map_err(|e| TaskError::WriteError(e.to_string()))?;

    tracing::debug!("Wrote {}", dest.display());
    Ok(1)
}

/// Vendor-prefix a compiled stylesheet for the fixed support range.
///
/// Returns the printed stylesheet and any parse warnings collected while
/// processing it.
fn prefix(css: &str) -> Result<(String, Vec<String>), String> {
    let browsers =
        Browsers::from_browserslist([BROWSER_RANGE]).map_err(|e| format!("browser range: {e}"))?;
    let targets = Targets {
        browsers,
        ..Targets::default()
    };

    let warnings = Arc::new(RwLock::new(Vec::new()));

    let mut stylesheet = StyleSheet::parse(
        css,
        ParserOptions {
            error_recovery: true,
            warnings: Some(warnings.clone()),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| format!("CSS parse error: {e}"))?;

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| format!("CSS transform error: {e}"))?;

    let printed = stylesheet
        .to_css(PrinterOptions {
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| format!("CSS print error: {e}"))?;

    let collected = warnings
        .read()
        .map(|w| w.iter().map(|e| e.to_string()).collect())
        .unwrap_or_default();

    Ok((printed.code, collected))
}
