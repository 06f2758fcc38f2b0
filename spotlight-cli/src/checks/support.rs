//! Shared helpers for the built-in checks

use crate::source::{SourceFile, SourceReader};
use anyhow::{Context, Result};
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Message returned by checks that only apply to production projects
pub const NOT_IN_PRODUCTION: &str = "Not in production environment";

/// Compile `pattern` once into `cell`, reporting bad patterns as errors
pub fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern).with_context(|| format!("invalid pattern: {pattern}"))?;
    Ok(cell.get_or_init(|| re))
}

/// 1-based line number of a byte offset
pub fn line_number(content: &str, offset: usize) -> usize {
    let end = floor_char_boundary(content, offset);
    content[..end].matches('\n').count() + 1
}

/// Up to `len` lines starting at `start`, joined with newlines
pub fn window(lines: &[&str], start: usize, len: usize) -> String {
    let start = start.min(lines.len());
    let end = start.saturating_add(len).min(lines.len());
    lines[start..end].join("\n")
}

/// Largest char boundary at or below `index`
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Path of `file` relative to `dir` (falls back to the project-relative path)
pub fn relative_to<'a>(file: &'a SourceFile, dir: &str) -> &'a str {
    let dir = dir.trim_matches('/');
    file.relative
        .strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(&file.relative)
}

/// Every file under `dir` ending in `suffix`, with its content
pub fn read_all(
    source: &dyn SourceReader,
    dir: &str,
    suffix: &str,
) -> Result<Vec<(SourceFile, Arc<String>)>> {
    source
        .files_with_suffix(dir, suffix)
        .into_iter()
        .map(|file| {
            let content = source.read(&file)?;
            Ok((file, content))
        })
        .collect()
}

static METHOD_CALL: OnceLock<Regex> = OnceLock::new();

/// Method calls (`->name(`) whose name does not start with an excluded prefix
pub fn count_method_calls(content: &str, excluded_prefixes: &[&str]) -> Result<usize> {
    let re = compiled(&METHOD_CALL, r"->(\w+)\(")?;
    Ok(re
        .captures_iter(content)
        .filter(|caps| {
            let name = caps[1].to_lowercase();
            !excluded_prefixes.iter().any(|p| name.starts_with(p))
        })
        .count())
}

/// Conditionals and loops, counted the simple textual way
pub fn control_flow_count(content: &str) -> usize {
    content.matches("if (").count() + content.matches("foreach").count() + content.matches("while").count()
}
