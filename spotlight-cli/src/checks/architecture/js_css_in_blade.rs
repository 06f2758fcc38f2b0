//! Inline JavaScript and CSS in Blade templates

use super::VIEWS;
use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

static SCRIPT_OPEN: OnceLock<Regex> = OnceLock::new();
static STYLE_OPEN: OnceLock<Regex> = OnceLock::new();
static INLINE_HANDLER: OnceLock<Regex> = OnceLock::new();
static ASSET_STACK: OnceLock<Regex> = OnceLock::new();

pub struct JsCssInBladeCheck {
    meta: CheckMeta,
}

impl JsCssInBladeCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("JsCssInBladeCheck", module_path!())
                .named("JS/CSS in Blade Check")
                .described(
                    "Identifies JavaScript and CSS code in Blade templates that should be in separate files",
                ),
        }
    }
}

impl Default for JsCssInBladeCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// True when some opening tag is followed by its closing tag with no
/// `@push`/`@stack` anywhere after it. `lowered` must already be lowercase.
fn has_inline_block(lowered: &str, open: &Regex, close: &str) -> bool {
    open.find_iter(lowered).any(|tag| {
        let rest = &lowered[tag.end()..];
        rest.contains(close) && !rest.contains("@push") && !rest.contains("@stack")
    })
}

impl Check for JsCssInBladeCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(VIEWS) {
            return Ok(self.pass("Views directory not found"));
        }

        let script = compiled(&SCRIPT_OPEN, r"<script[^>]*>")?;
        let style = compiled(&STYLE_OPEN, r"<style[^>]*>")?;
        let handler = compiled(&INLINE_HANDLER, r"(?i)onclick\s*=|onchange\s*=|onload\s*=")?;
        let stack = compiled(&ASSET_STACK, r"(?i)@push|@stack")?;

        let mut views = Vec::new();
        for (file, content) in read_all(source, VIEWS, "")? {
            let lowered = content.to_lowercase();

            let has_js = has_inline_block(&lowered, script, "</script>")
                || (handler.is_match(&content) && !stack.is_match(&content));
            let has_css = has_inline_block(&lowered, style, "</style>");

            if has_js || has_css {
                let mut issues = Vec::new();
                if has_js {
                    issues.push("JavaScript");
                }
                if has_css {
                    issues.push("CSS");
                }
                views.push(json!({
                    "file": relative_to(&file, VIEWS),
                    "issues": issues,
                }));
            }
        }

        if !views.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} Blade template(s) with inline JS/CSS",
                    views.len()
                ))
                .with_meta("views", views)
                .with_recommendation(
                    "Move JavaScript and CSS to separate files. Use @push/@stack for including assets, or use Laravel Mix/Vite for asset compilation.",
                ));
        }

        Ok(self.pass("No inline JavaScript or CSS found in Blade templates"))
    }
}
