//! N+1 query detection
//!
//! Heuristics over controller and model source:
//! - a model query without `->with(` followed by a `foreach` that touches
//!   properties of the loop variable
//! - a `foreach` whose loop variable dereferences a relationship with no
//!   eager loading in the preceding lines
//! - static model methods that return query results without eager loading

use crate::checks::base::{Check, CheckMeta};
use crate::checks::support::{compiled, line_number, read_all, relative_to, window};
use crate::models::{CheckType, Outcome, Severity};
use crate::source::SourceReader;
use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const CONTROLLERS: &str = "app/Http/Controllers";
const MODELS: &str = "app/Models";

static MODEL_QUERY: OnceLock<Regex> = OnceLock::new();
static FOREACH_BODY: OnceLock<Regex> = OnceLock::new();
static FOREACH_VAR: OnceLock<Regex> = OnceLock::new();
static EAGER_LOAD: OnceLock<Regex> = OnceLock::new();
static RELATIONSHIP: OnceLock<Regex> = OnceLock::new();
static STATIC_METHOD: OnceLock<Regex> = OnceLock::new();
static STATIC_QUERY: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Serialize)]
struct QueryIssue {
    file: String,
    line: usize,
    pattern: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

pub struct NPlusOneQueriesCheck {
    meta: CheckMeta,
}

impl NPlusOneQueriesCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::for_type("NPlusOneQueriesCheck", module_path!())
                .named("N+1 Query Detection")
                .described("Identifies potential N+1 query problems in controllers and models")
                .severity(Severity::High)
                .check_type(CheckType::Objective),
        }
    }

    fn controller_issues(&self, content: &str, file: &str) -> Result<Vec<QueryIssue>> {
        let model_query = compiled(&MODEL_QUERY, r"(?i)(\w+)::(all|get|where|find)\([^)]*\)")?;
        let foreach_body = compiled(&FOREACH_BODY, r"foreach\s*\([^)]*as\s+(\$\w+)\)\s*\{([^}]*)")?;
        let foreach_var = compiled(&FOREACH_VAR, r"(?i)foreach\s*\([^)]*as\s+(\$\w+)\)")?;
        let eager_load = compiled(&EAGER_LOAD, r"(?i)->with\s*\(")?;

        let lines: Vec<&str> = content.split('\n').collect();
        let mut issues = Vec::new();

        // Query without eager loading, then a loop over its results
        for (n, line) in lines.iter().enumerate() {
            let unloaded = model_query
                .find_iter(line)
                .any(|m| !line[m.end()..].to_lowercase().contains("->with("));
            if !unloaded {
                continue;
            }

            let following = window(&lines, n, 10);
            let mut touches_loop_var = false;
            for caps in foreach_body.captures_iter(&following) {
                if accesses_member(&caps[2], &caps[1]) {
                    touches_loop_var = true;
                    break;
                }
            }

            if touches_loop_var {
                issues.push(QueryIssue {
                    file: file.to_string(),
                    line: n + 1,
                    pattern: "Model query without eager loading followed by foreach loop".into(),
                    kind: "controller",
                });
            }
        }

        // Loop variable dereferencing a relationship
        for (n, line) in lines.iter().enumerate() {
            let Some(caps) = foreach_var.captures(line) else {
                continue;
            };
            let following = window(&lines, n, 20);
            if !dereferences_relation(&following, &caps[1]) {
                continue;
            }

            let start = n.saturating_sub(10);
            if !eager_load.is_match(&window(&lines, start, 10)) {
                issues.push(QueryIssue {
                    file: file.to_string(),
                    line: n + 1,
                    pattern: "foreach loop accessing relationships without eager loading".into(),
                    kind: "controller",
                });
            }
        }

        Ok(issues)
    }

    fn model_issues(&self, content: &str, file: &str) -> Result<Vec<QueryIssue>> {
        let relationship = compiled(
            &RELATIONSHIP,
            r"(?i)function\s+\w+\s*\(\)\s*\{[^}]*return\s+\$this->(belongsTo|hasMany|hasOne|belongsToMany|morphTo|morphMany)",
        )?;
        if !relationship.is_match(content) {
            return Ok(Vec::new());
        }

        let static_method = compiled(
            &STATIC_METHOD,
            r"public\s+static\s+function\s+(\w+)\s*\([^)]*\)\s*\{([^}]+)\}",
        )?;
        let static_query = compiled(&STATIC_QUERY, r"(?i)::(all|get|where|find)")?;

        let mut issues = Vec::new();
        for caps in static_method.captures_iter(content) {
            let body = &caps[2];
            if static_query.is_match(body) && !body.contains("->with(") {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                issues.push(QueryIssue {
                    file: file.to_string(),
                    line: line_number(content, start),
                    pattern: format!(
                        "Static method '{}' returns models without eager loading",
                        &caps[1]
                    ),
                    kind: "model",
                });
            }
        }
        Ok(issues)
    }
}

impl Default for NPlusOneQueriesCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for NPlusOneQueriesCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> Result<Outcome> {
        let mut issues = Vec::new();

        for (file, content) in read_all(source, CONTROLLERS, "")? {
            issues.extend(self.controller_issues(&content, relative_to(&file, CONTROLLERS))?);
        }
        for (file, content) in read_all(source, MODELS, "")? {
            issues.extend(self.model_issues(&content, relative_to(&file, MODELS))?);
        }

        if !issues.is_empty() {
            return Ok(self
                .suggest(format!(
                    "Found {} potential N+1 query pattern(s)",
                    issues.len()
                ))
                .with_meta("issues", serde_json::to_value(&issues)?)
                .with_recommendation(
                    "Use eager loading (->with(), ->load()) to prevent N+1 queries. Review the identified patterns and add eager loading where relationships are accessed in loops.",
                ));
        }

        Ok(self.pass("No obvious N+1 query patterns detected"))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `text` contains `<var>->` followed by a word character
fn accesses_member(text: &str, var: &str) -> bool {
    let needle = format!("{var}->");
    text.match_indices(&needle)
        .any(|(i, _)| text[i + needle.len()..].starts_with(is_word_char))
}

/// `text` reads a member of `var` (case-insensitive), ignoring `->with(` calls
fn dereferences_relation(text: &str, var: &str) -> bool {
    let haystack = text.to_ascii_lowercase();
    let needle = format!("{}->", var.to_ascii_lowercase());
    haystack.match_indices(&needle).any(|(i, _)| {
        let rest = &haystack[i + needle.len()..];
        let word_len = rest
            .find(|c: char| !is_word_char(c))
            .unwrap_or(rest.len());
        if word_len == 0 {
            return false;
        }
        let is_with_call = &rest[..word_len] == "with" && rest[word_len..].starts_with('(');
        !is_with_call
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::source::MockSource;

    const LAZY_CONTROLLER: &str = r#"<?php
class UserController extends Controller
{
    public function index()
    {
        $users = User::all();
        foreach ($users as $user) {
            echo $user->posts->count();
        }
    }
}
"#;

    const EAGER_CONTROLLER: &str = r#"<?php
class UserController extends Controller
{
    public function index()
    {
        $users = User::query()->with('posts')->get();
        foreach ($users as $user) {
            echo $user->posts->count();
        }
    }
}
"#;

    #[test]
    fn test_lazy_loop_is_flagged() {
        let source = MockSource::new(vec![(
            "app/Http/Controllers/UserController.php",
            LAZY_CONTROLLER,
        )]);
        let outcome = NPlusOneQueriesCheck::new().scan(&source).unwrap();

        assert_eq!(outcome.status, Status::Suggestion);
        let issues = outcome.metadata["issues"].as_array().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0]["file"], "UserController.php");
        assert_eq!(issues[0]["line"], 6);
        assert_eq!(issues[1]["line"], 7);
        assert_eq!(issues[1]["type"], "controller");
    }

    #[test]
    fn test_eager_loading_passes() {
        let source = MockSource::new(vec![(
            "app/Http/Controllers/UserController.php",
            EAGER_CONTROLLER,
        )]);
        let outcome = NPlusOneQueriesCheck::new().scan(&source).unwrap();
        assert_eq!(outcome.status, Status::Passed);
        assert_eq!(outcome.message, "No obvious N+1 query patterns detected");
    }

    #[test]
    fn test_with_call_on_loop_variable_is_not_a_dereference() {
        let controller = "foreach ($rows as $row) {\n    $row->with('x');\n}\n";
        let source = MockSource::new(vec![("app/Http/Controllers/A.php", controller)]);
        let outcome = NPlusOneQueriesCheck::new().scan(&source).unwrap();
        assert_eq!(outcome.status, Status::Passed);
    }

    #[test]
    fn test_static_model_method_without_eager_loading() {
        let model = r#"<?php
class Post extends Model
{
    public function author() { return $this->belongsTo(User::class); }

    public static function recent()
    {
        return static::where('published', true)->get();
    }
}
"#;
        let source = MockSource::new(vec![("app/Models/Post.php", model)]);
        let outcome = NPlusOneQueriesCheck::new().scan(&source).unwrap();

        assert_eq!(outcome.status, Status::Suggestion);
        let issues = outcome.metadata["issues"].as_array().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0]["type"], "model");
        assert_eq!(issues[0]["line"], 6);
        assert!(issues[0]["pattern"].as_str().unwrap().contains("'recent'"));
    }

    #[test]
    fn test_loop_variable_access_helpers() {
        assert!(accesses_member("echo $post->author;", "$post"));
        assert!(!accesses_member("echo $post-> ;", "$post"));
        assert!(!accesses_member("echo $other->name;", "$post"));

        assert!(dereferences_relation("$Post->comments", "$post"));
        assert!(dereferences_relation("$post->withCount('x')", "$post"));
        assert!(!dereferences_relation("$post->with('comments')", "$post"));
        assert!(!dereferences_relation("$post->", "$post"));
    }

    #[test]
    fn test_no_directories_passes() {
        let outcome = NPlusOneQueriesCheck::new()
            .scan(&MockSource::new(vec![]))
            .unwrap();
        assert_eq!(outcome.status, Status::Passed);
    }
}
