//! Script bundling and minification.

use std::fs;
use std::path::PathBuf;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use walkdir::WalkDir;

use crate::paths::{has_extension, Paths, SCRIPT_EXTENSION};
use crate::severity::{Severity, SeverityGate};
use crate::task::TaskError;

/// The single output bundle name.
const BUNDLE_NAME: &str = "bundle.js";

/// Bundle every script source into one minified file.
///
/// Sources under `{src}/js` are gathered in sorted order, syntax-checked one
/// by one, concatenated, minified, and written to `{dist}/js/bundle.js`.
/// Parse and minify failures report at `Error` level. An empty source set
/// still produces the (empty) bundle without any fatal report.
pub(crate) fn run(paths: &Paths, gate: &SeverityGate) -> Result<usize, TaskError> {
    let mut bundle = String::new();

    for source_path in script_sources(paths) {
        let source =
            fs::read_to_string(&source_path).map_err(|e| TaskError::ReadError(e.to_string()))?;

        if let Err(err) = check_syntax(&source) {
            gate.report(
                Severity::Error,
                &format!("scripts: {}: {err}", source_path.display()),
            );
            continue;
        }

        bundle.push_str(&source);
        if !source.ends_with('\n') {
            bundle.push('\n');
        }
    }

    let minified = match minify(&bundle) {
        Ok(code) => code,
        Err(err) => {
            gate.report(Severity::Error, &format!("scripts: {err}"));
            return Ok(0);
        }
    };

    fs::create_dir_all(&paths.dist_js).map_err(|e| TaskError::WriteError(e.to_string()))?;

    let dest = paths.dist_js.join(BUNDLE_NAME);
    fs::write(&dest, minified).map_err(|e| TaskError::WriteError(e.to_string()))?;

    tracing::debug!("Wrote {}", dest.display());
    Ok(1)
}

/// Every script source under the script tree, in sorted order.
///
/// A missing tree yields no sources, matching an empty source glob.
fn script_sources(paths: &Paths) -> Vec<PathBuf> {
    WalkDir::new(&paths.script_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && has_extension(path, &[SCRIPT_EXTENSION]))
        .collect()
}

/// Validate one source file without transforming it.
fn check_syntax(source: &str) -> Result<(), String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let messages: Vec<String> = ret.errors.iter().map(ToString::to_string).collect();
        return Err(messages.join("; "));
    }

    Ok(())
}

/// Minify the concatenated bundle.
fn minify(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let messages: Vec<String> = ret.errors.iter().map(ToString::to_string).collect();
        return Err(format!("bundle parse error: {}", messages.join("; ")));
    }

    let mut program = ret.program;
    let minified = Minifier::new(MinifierOptions::default()).build(&allocator, &mut program);

    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            ..CodegenOptions::default()
        })
        .with_scoping(minified.scoping)
        .build(&program)
        .code;

    Ok(code)
}
