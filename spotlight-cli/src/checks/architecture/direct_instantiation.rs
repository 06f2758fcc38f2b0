//! Direct class instantiation check
//!
//! Flags `new Foo(...)` close to a constructor, where the dependency could be
//! injected instead.

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, floor_char_boundary, line_number, read_all, relative_to};
use crate::models::Outcome;
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::collections::HashSet;
use std::sync::OnceLock;

const APP: &str = "app";

/// Bytes inspected ahead of each instantiation when looking for a constructor
const CONSTRUCTOR_LOOKBEHIND: usize = 200;

/// Framework value objects that are fine to construct directly
const ALLOWED_CLASSES: [&str; 13] = [
    "Request",
    "Response",
    "Collection",
    "Carbon",
    "DateTime",
    "Exception",
    "InvalidArgumentException",
    "ModelNotFoundException",
    "RedirectResponse",
    "View",
    "JsonResponse",
    "File",
    "Storage",
];

static NEW_EXPR: OnceLock<Regex> = OnceLock::new();
static CONSTRUCTOR: OnceLock<Regex> = OnceLock::new();

pub struct DirectInstantiationCheck {
    meta: CheckMeta,
}

impl DirectInstantiationCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("DirectInstantiationCheck", module_path!())
                .named("Direct Class Instantiation Check")
                .described("Identifies direct class instantiation that should use dependency injection"),
        }
    }
}

impl Default for DirectInstantiationCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// The inspection window for an instantiation at `offset`.
///
/// Near the top of a file the window is the first bytes of the file, which
/// may extend past the match itself.
fn lookbehind(content: &str, offset: usize) -> &str {
    let start = floor_char_boundary(content, offset.saturating_sub(CONSTRUCTOR_LOOKBEHIND));
    let end = floor_char_boundary(content, start + CONSTRUCTOR_LOOKBEHIND);
    &content[start..end]
}

impl Check for DirectInstantiationCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        if !source.exists(APP) {
            return Ok(self.pass("App directory not found"));
        }

        let new_expr = compiled(&NEW_EXPR, r"(?i)new\s+([A-Z]\w+)\s*\(")?;
        let constructor = compiled(&CONSTRUCTOR, r"(?i)function\s+__construct\s*\(")?;

        let mut instantiations = Vec::new();
        let mut files = HashSet::new();

        for (file, content) in read_all(source, APP, "")? {
            let path = &file.relative;
            if path.contains("vendor") || path.contains("Tests") || path.contains("config") {
                continue;
            }

            for caps in new_expr.captures_iter(&content) {
                let Some(class) = caps.get(1) else { continue };
                if ALLOWED_CLASSES.contains(&class.as_str()) {
                    continue;
                }
                if constructor.is_match(lookbehind(&content, class.start())) {
                    let rel = relative_to(&file, APP);
                    files.insert(rel.to_string());
                    instantiations.push(json!({
                        "file": rel,
                        "line": line_number(&content, class.start()),
                        "class": class.as_str(),
                    }));
                }
            }
        }

        if !instantiations.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} file(s) with direct class instantiation ({} total)",
                    files.len(),
                    instantiations.len()
                ))
                .with_meta("instantiations", instantiations)
                .with_recommendation(
                    "Use dependency injection via constructor instead of direct instantiation. This improves testability and follows Laravel best practices.",
                ));
        }

        Ok(self.pass("No direct class instantiation issues found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::source::MockSource;

    #[test]
    fn test_instantiation_in_constructor() {
        let service = r#"<?php
class OrderService
{
    public function __construct()
    {
        $this->gateway = new StripeGateway();
        $this->items = new Collection();
    }
}
"#;
        let source = MockSource::new(vec![("app/Services/OrderService.php", service)]);
        let outcome = DirectInstantiationCheck::new().scan(&source).unwrap();

        assert_eq!(outcome.status, Status::Suggestion);
        assert_eq!(
            outcome.message,
            "Found 1 file(s) with direct class instantiation (1 total)"
        );
        let found = &outcome.metadata["instantiations"][0];
        assert_eq!(found["file"], "Services/OrderService.php");
        assert_eq!(found["class"], "StripeGateway");
        assert_eq!(found["line"], 6);
    }

    #[test]
    fn test_instantiation_far_from_constructor_passes() {
        let padding = "    // ...\n".repeat(30);
        let service = format!(
            "<?php\nclass A\n{{\n    public function __construct() {{}}\n{padding}    public function run() {{ return new Report(); }}\n}}\n"
        );
        let source = MockSource::new(vec![("app/Services/A.php", service.as_str())]);
        let outcome = DirectInstantiationCheck::new().scan(&source).unwrap();
        assert_eq!(outcome.status, Status::Passed);
    }

    #[test]
    fn test_config_paths_are_skipped() {
        let content = "<?php function __construct() { $x = new Thing(); }";
        let source = MockSource::new(vec![("app/config/Setup.php", content)]);
        let outcome = DirectInstantiationCheck::new().scan(&source).unwrap();
        assert_eq!(outcome.status, Status::Passed);
    }
}
