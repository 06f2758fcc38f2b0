//! Missing chunking check

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, read_all, relative_to, window};
use crate::models::{CheckType, Outcome, Severity};
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const SCANNED_DIRS: [&str; 2] = ["app/Http/Controllers", "app/Models"];

static UNCHUNKED_GET: OnceLock<Regex> = OnceLock::new();
static CHUNKED: OnceLock<Regex> = OnceLock::new();
static ASSIGNED_GET: OnceLock<Regex> = OnceLock::new();
static FOREACH_SOURCE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Serialize)]
struct ChunkingIssue {
    file: String,
    line: usize,
    pattern: &'static str,
    code: String,
}

/// Finds `->get()` on unbounded queries that are never chunked or streamed
pub struct MissingChunkingCheck {
    meta: CheckMeta,
}

impl MissingChunkingCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("MissingChunkingCheck", module_path!())
                .named("Missing Chunking for Large Datasets")
                .described(
                    "Identifies potential memory issues from loading large datasets without chunking",
                )
                .severity(Severity::High)
                .check_type(CheckType::Objective),
        }
    }

    fn file_issues(&self, content: &str, file: &str) -> Result<Vec<ChunkingIssue>> {
        let unchunked = compiled(
            &UNCHUNKED_GET,
            r"(?i)(\w+)::(all|where|whereIn|whereHas|has)\([^)]*\)->get\(\)",
        )?;
        let chunked = compiled(&CHUNKED, r"(?i)->(chunk|cursor)\(")?;
        let assigned = compiled(
            &ASSIGNED_GET,
            r"(?i)\$(\w+)\s*=\s*\w+::(all|get|where)\([^)]*\)->get\(\)",
        )?;
        let foreach_source = compiled(&FOREACH_SOURCE, r"(?i)foreach\s*\(\s*\$(\w+)\s+as")?;

        let lines: Vec<&str> = content.split('\n').collect();
        let mut issues = Vec::new();

        for (n, line) in lines.iter().enumerate() {
            if unchunked.is_match(line) && !chunked.is_match(&window(&lines, n, 5)) {
                issues.push(ChunkingIssue {
                    file: file.to_string(),
                    line: n + 1,
                    pattern: "Large dataset query without chunking",
                    code: line.trim().to_string(),
                });
            }

            if let Some(caps) = assigned.captures(line) {
                let following = window(&lines, n, 10);
                let iterated = foreach_source
                    .captures_iter(&following)
                    .any(|loop_caps| loop_caps[1].eq_ignore_ascii_case(&caps[1]));
                if iterated {
                    issues.push(ChunkingIssue {
                        file: file.to_string(),
                        line: n + 1,
                        pattern: "Large dataset loaded into memory for iteration",
                        code: line.trim().to_string(),
                    });
                }
            }
        }

        Ok(issues)
    }
}

impl Default for MissingChunkingCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for MissingChunkingCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        let mut issues = Vec::new();
        for dir in SCANNED_DIRS {
            for (file, content) in read_all(source, dir, "")? {
                issues.extend(self.file_issues(&content, relative_to(&file, dir))?);
            }
        }

        if !issues.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} potential large dataset operation(s) without chunking",
                    issues.len()
                ))
                .with_meta("issues", serde_json::to_value(&issues)?)
                .with_recommendation(
                    "Use ->chunk() or ->cursor() for large datasets to prevent memory issues. Example: Model::chunk(500, function ($items) { ... });",
                ));
        }

        Ok(self.pass("No obvious chunking issues detected"))
    }
}
