//! Scan engine with error containment and optional parallelism
//!
//! The ScanEngine drives one scan over a registry of checks:
//! - Selects the working set (all checks, or the requested categories)
//! - Runs each check inside a failure boundary (errors and panics)
//! - Folds outcomes into rules, category rollups and the summary
//! - Computes the health score
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      ScanEngine                         │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Resolve working set from the registry               │
//! │  2. Run checks (sequential, or rayon when workers > 1)  │
//! │  3. Contain failures (continue) or abort (stop)         │
//! │  4. Fold outcomes in working-set order                  │
//! │  5. Score the summary and return the report             │
//! └─────────────────────────────────────────────────────────┘
//! ```

use super::base::{outcome_for, Check};
use super::registry::CheckRegistry;
use crate::models::{CategoryReport, Outcome, ScanReport, Status};
use crate::scoring::health_score;
use crate::source::SourceReader;
use chrono::Utc;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Progress callback: (check id, completed, total)
pub type ProgressCallback = Box<dyn Fn(&str, usize, usize) + Send + Sync>;

/// What to do when a check fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorHandling {
    /// Record an error outcome and keep going
    #[default]
    Continue,
    /// Abort the scan on the first failure
    Stop,
}

impl FromStr for ErrorHandling {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(ErrorHandling::Continue),
            "stop" => Ok(ErrorHandling::Stop),
            _ => Err(anyhow::anyhow!(
                "Unknown error handling mode '{}'. Valid modes: continue, stop",
                s
            )),
        }
    }
}

impl std::fmt::Display for ErrorHandling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorHandling::Continue => write!(f, "continue"),
            ErrorHandling::Stop => write!(f, "stop"),
        }
    }
}

/// Errors that abort a scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("check '{id}' failed")]
    CheckFailed {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("check '{id}' panicked: {message}")]
    CheckPanicked { id: String, message: String },

    #[error("failed to start worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Raw result of running one check body
enum CheckRun {
    Completed(Outcome),
    Failed(anyhow::Error),
    Panicked(String),
}

/// Runs checks from a registry against one project
pub struct ScanEngine {
    registry: Arc<CheckRegistry>,
    source: Arc<dyn SourceReader>,
    error_handling: ErrorHandling,
    debug: bool,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl ScanEngine {
    /// Create an engine with default options (continue, sequential)
    pub fn new(registry: Arc<CheckRegistry>, source: Arc<dyn SourceReader>) -> Self {
        Self {
            registry,
            source,
            error_handling: ErrorHandling::default(),
            debug: false,
            workers: 1,
            progress_callback: None,
        }
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Run the checks of the requested categories (all checks when empty)
    pub fn scan(&self, categories: &[String]) -> Result<ScanReport, ScanError> {
        let mut report = ScanReport::new(Utc::now());
        let checks = self.working_set(categories);
        let start = Instant::now();

        info!(
            "Running {} checks ({} workers, error handling: {})",
            checks.len(),
            self.workers,
            self.error_handling
        );

        if self.workers > 1 && checks.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()?;
            let completed = AtomicUsize::new(0);
            let total = checks.len();

            let runs: Vec<CheckRun> = pool.install(|| {
                checks
                    .par_iter()
                    .map(|check| {
                        let run = self.run_single_check(check.as_ref());
                        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                        self.report_progress(check.id(), done, total);
                        run
                    })
                    .collect()
            });

            for (check, run) in checks.iter().zip(runs) {
                let outcome = self.contain(check.as_ref(), run)?;
                fold(&mut report, check.as_ref(), outcome);
            }
        } else {
            let total = checks.len();
            for (i, check) in checks.iter().enumerate() {
                let run = self.run_single_check(check.as_ref());
                let outcome = self.contain(check.as_ref(), run)?;
                fold(&mut report, check.as_ref(), outcome);
                self.report_progress(check.id(), i + 1, total);
            }
        }

        report.summary.health_score = health_score(&report.summary);

        info!(
            "Scan complete in {}ms: {} checks, {} passed, {} suggestions, {} errors, health score {}",
            start.elapsed().as_millis(),
            report.summary.total_rules,
            report.summary.passed,
            report.summary.suggestions,
            report.summary.errors,
            report.summary.health_score
        );

        Ok(report)
    }

    /// Checks to run: per requested category in request order, registry
    /// order within a category, each id once.
    fn working_set(&self, categories: &[String]) -> Vec<Arc<dyn Check>> {
        if categories.is_empty() {
            return self.registry.all().values().cloned().collect();
        }

        let mut selected: IndexMap<String, Arc<dyn Check>> = IndexMap::new();
        for category in categories {
            let matching = self.registry.by_category(category);
            if matching.is_empty() {
                debug!("No checks registered for category '{}'", category);
            }
            for (id, check) in matching {
                selected.entry(id).or_insert(check);
            }
        }
        selected.into_values().collect()
    }

    fn run_single_check(&self, check: &dyn Check) -> CheckRun {
        let start = Instant::now();
        if self.debug {
            debug!("Running check: {}", check.id());
        }

        let source = self.source.as_ref();
        let run = match catch_unwind(AssertUnwindSafe(|| check.scan(source))) {
            Ok(Ok(outcome)) => CheckRun::Completed(outcome),
            Ok(Err(e)) => CheckRun::Failed(e),
            Err(panic_info) => {
                let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                CheckRun::Panicked(message)
            }
        };

        if self.debug {
            let status = match &run {
                CheckRun::Completed(o) => o.status.to_string(),
                CheckRun::Failed(_) | CheckRun::Panicked(_) => Status::Error.to_string(),
            };
            debug!(
                "Check {} finished with status {} in {}ms",
                check.id(),
                status,
                start.elapsed().as_millis()
            );
        }

        run
    }

    /// Apply the error-handling policy to a raw run
    fn contain(&self, check: &dyn Check, run: CheckRun) -> Result<Outcome, ScanError> {
        match run {
            CheckRun::Completed(outcome) => Ok(stamp_identity(check, outcome)),
            CheckRun::Failed(e) => {
                let cause = e.root_cause().to_string();
                let trace = format!("{e:?}");
                warn!(
                    check = check.id(),
                    exception = "error",
                    cause = %cause,
                    trace = %trace,
                    "Check {} could not complete: {:#}",
                    check.id(),
                    e
                );

                if self.error_handling == ErrorHandling::Stop {
                    return Err(ScanError::CheckFailed {
                        id: check.id().to_string(),
                        source: e,
                    });
                }

                Ok(outcome_for(
                    check,
                    Status::Error,
                    format!("Rule could not complete: {e:#}"),
                )
                .with_meta("exception", "error")
                .with_meta("location", format!("{} ({})", check.id(), cause))
                .with_meta("trace", trace))
            }
            CheckRun::Panicked(message) => {
                error!(
                    check = check.id(),
                    exception = "panic",
                    "Check {} panicked: {}",
                    check.id(),
                    message
                );

                if self.error_handling == ErrorHandling::Stop {
                    return Err(ScanError::CheckPanicked {
                        id: check.id().to_string(),
                        message,
                    });
                }

                Ok(outcome_for(
                    check,
                    Status::Error,
                    format!("Rule could not complete: {message}"),
                )
                .with_meta("exception", "panic")
                .with_meta("location", check.id())
                .with_meta("trace", message))
            }
        }
    }

    fn report_progress(&self, id: &str, done: usize, total: usize) {
        if let Some(ref callback) = self.progress_callback {
            callback(id, done, total);
        }
    }
}

/// Identity fields always come from the check that produced the outcome
fn stamp_identity(check: &dyn Check, mut outcome: Outcome) -> Outcome {
    outcome.id = check.id().to_string();
    outcome.category = check.category().to_string();
    outcome.severity = Some(check.severity());
    outcome.check_type = check.check_type();
    outcome
}

/// Record one outcome in the rules map, its category rollup and the summary
fn fold(report: &mut ScanReport, check: &dyn Check, outcome: Outcome) {
    report.summary.record(&outcome);
    report
        .categories
        .entry(check.category().to_string())
        .or_insert_with(|| CategoryReport::new(check.category()))
        .record(outcome.clone());
    report.rules.insert(check.id().to_string(), outcome);
}

/// Builder for ScanEngine with fluent API
pub struct ScanEngineBuilder {
    registry: Arc<CheckRegistry>,
    source: Arc<dyn SourceReader>,
    error_handling: ErrorHandling,
    debug: bool,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl ScanEngineBuilder {
    pub fn new(registry: Arc<CheckRegistry>, source: Arc<dyn SourceReader>) -> Self {
        Self {
            registry,
            source,
            error_handling: ErrorHandling::default(),
            debug: false,
            workers: 1,
            progress_callback: None,
        }
    }

    pub fn error_handling(mut self, mode: ErrorHandling) -> Self {
        self.error_handling = mode;
        self
    }

    /// Enable per-check debug log lines
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set number of worker threads (0 = auto-detect, 1 = sequential)
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set progress callback
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Build the engine
    pub fn build(self) -> ScanEngine {
        let workers = if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16) // Cap at 16 threads
        } else {
            self.workers
        };

        ScanEngine {
            registry: self.registry,
            source: self.source,
            error_handling: self.error_handling,
            debug: self.debug,
            workers,
            progress_callback: self.progress_callback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::base::CheckMeta;
    use crate::models::{CheckType, Metadata, Severity};
    use crate::source::MockSource;
    use std::sync::Mutex;

    enum Behavior {
        Pass,
        Suggest(&'static str),
        Fail(&'static str),
        Panic(&'static str),
        /// Hand-built outcome claiming a foreign identity
        Foreign,
    }

    struct ScriptedCheck {
        meta: CheckMeta,
        behavior: Behavior,
        runs: Arc<AtomicUsize>,
    }

    impl Check for ScriptedCheck {
        fn meta(&self) -> &CheckMeta {
            &self.meta
        }

        fn scan(&self, _source: &dyn SourceReader) -> anyhow::Result<Outcome> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Pass => Ok(self.pass("")),
                Behavior::Suggest(msg) => Ok(self.suggest(msg)),
                Behavior::Fail(msg) => Err(anyhow::anyhow!(msg).context("reading config")),
                Behavior::Panic(msg) => panic!("{}", msg),
                Behavior::Foreign => Ok(Outcome {
                    id: "other.id".to_string(),
                    status: Status::Suggestion,
                    message: "claims another identity".to_string(),
                    severity: Some(Severity::Critical),
                    category: "elsewhere".to_string(),
                    check_type: CheckType::Objective,
                    metadata: Metadata::new(),
                }),
            }
        }
    }

    struct Fixture {
        registry: CheckRegistry,
        runs: Arc<AtomicUsize>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: CheckRegistry::new(),
                runs: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn add(mut self, id: &str, severity: Severity, behavior: Behavior) -> Self {
            let category = id.split('.').next().unwrap_or_default().to_string();
            let check = ScriptedCheck {
                meta: CheckMeta::new(id, category).severity(severity),
                behavior,
                runs: Arc::clone(&self.runs),
            };
            self.registry.register(Arc::new(check)).unwrap();
            self
        }

        fn builder(self) -> ScanEngineBuilder {
            ScanEngineBuilder::new(Arc::new(self.registry), Arc::new(MockSource::new(vec![])))
        }

        fn engine(self) -> ScanEngine {
            self.builder().build()
        }
    }

    #[test]
    fn test_single_low_suggestion_scores_90() {
        let engine = Fixture::new()
            .add("performance.x", Severity::Low, Behavior::Suggest("found issue"))
            .engine();
        let report = engine.scan(&[]).unwrap();

        let s = &report.summary;
        assert_eq!(s.total_rules, 1);
        assert_eq!(s.passed, 0);
        assert_eq!(s.suggestions, 1);
        assert_eq!(s.errors, 0);
        assert_eq!(s.low, 1);
        assert_eq!(s.health_score, 90);
        assert_eq!(report.rules["performance.x"].message, "found issue");
    }

    #[test]
    fn test_outcome_identity_comes_from_check() {
        let engine = Fixture::new()
            .add("custom.low", Severity::Low, Behavior::Foreign)
            .engine();
        let report = engine.scan(&[]).unwrap();

        assert_eq!(report.rules.keys().collect::<Vec<_>>(), vec!["custom.low"]);
        let outcome = &report.rules["custom.low"];
        assert_eq!(outcome.id, "custom.low");
        assert_eq!(outcome.category, "custom");
        assert_eq!(outcome.severity, Some(Severity::Low));
        assert_eq!(outcome.check_type, CheckType::Advisory);
        assert_eq!(outcome.message, "claims another identity");
        assert_eq!(report.categories.keys().collect::<Vec<_>>(), vec!["custom"]);
        assert_eq!(report.summary.critical, 0);
        assert_eq!(report.summary.low, 1);
        assert_eq!(report.summary.health_score, 90);
    }

    #[test]
    fn test_single_critical_pass_scores_100() {
        let engine = Fixture::new()
            .add("security.y", Severity::Critical, Behavior::Pass)
            .engine();
        let report = engine.scan(&[]).unwrap();

        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.critical, 0);
        assert_eq!(report.summary.health_score, 100);
    }

    #[test]
    fn test_category_filter() {
        let engine = Fixture::new()
            .add("performance.a", Severity::Low, Behavior::Pass)
            .add("security.b", Severity::High, Behavior::Suggest("bad"))
            .engine();
        let report = engine.scan(&["security".to_string()]).unwrap();

        assert_eq!(report.rules.keys().collect::<Vec<_>>(), vec!["security.b"]);
        assert_eq!(report.categories.keys().collect::<Vec<_>>(), vec!["security"]);
        assert_eq!(report.categories["security"].name, "Security");
        assert_eq!(report.summary.total_rules, 1);
        assert_eq!(report.summary.health_score, 30);
    }

    #[test]
    fn test_working_set_follows_request_order_without_duplicates() {
        let engine = Fixture::new()
            .add("performance.a", Severity::Low, Behavior::Pass)
            .add("security.b", Severity::Low, Behavior::Pass)
            .add("performance.c", Severity::Low, Behavior::Pass)
            .engine();
        let categories = vec![
            "security".to_string(),
            "performance".to_string(),
            "security".to_string(),
            "nonexistent".to_string(),
        ];
        let report = engine.scan(&categories).unwrap();

        let ids: Vec<&String> = report.rules.keys().collect();
        assert_eq!(ids, vec!["security.b", "performance.a", "performance.c"]);
        assert_eq!(report.summary.total_rules, 3);
        let cats: Vec<&String> = report.categories.keys().collect();
        assert_eq!(cats, vec!["security", "performance"]);
    }

    #[test]
    fn test_unknown_category_yields_empty_report() {
        let fixture = Fixture::new().add("performance.a", Severity::Low, Behavior::Pass);
        let runs = Arc::clone(&fixture.runs);
        let report = fixture.engine().scan(&["nonexistent".to_string()]).unwrap();

        assert!(report.rules.is_empty());
        assert!(report.categories.is_empty());
        assert_eq!(report.summary.total_rules, 0);
        assert_eq!(report.summary.health_score, 100);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_continue_contains_errors() {
        let engine = Fixture::new()
            .add("performance.a", Severity::High, Behavior::Fail("disk on fire"))
            .add("security.b", Severity::Low, Behavior::Pass)
            .engine();
        let report = engine.scan(&[]).unwrap();

        let failed = &report.rules["performance.a"];
        assert_eq!(failed.status, Status::Error);
        assert_eq!(
            failed.message,
            "Rule could not complete: reading config: disk on fire"
        );
        assert_eq!(failed.severity, Some(Severity::High));
        assert_eq!(failed.category, "performance");
        assert_eq!(failed.metadata["exception"], "error");
        assert!(failed.metadata["location"]
            .as_str()
            .unwrap()
            .contains("disk on fire"));
        assert!(failed.metadata["trace"].as_str().unwrap().contains("reading config"));

        assert_eq!(report.summary.total_rules, 2);
        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.health_score, 100);
        assert_eq!(report.categories["performance"].errors, 1);
    }

    #[test]
    fn test_continue_contains_panics() {
        let engine = Fixture::new()
            .add("architecture.boom", Severity::Low, Behavior::Panic("index out of range"))
            .add("architecture.ok", Severity::Low, Behavior::Pass)
            .engine();
        let report = engine.scan(&[]).unwrap();

        let failed = &report.rules["architecture.boom"];
        assert_eq!(failed.status, Status::Error);
        assert_eq!(failed.metadata["exception"], "panic");
        assert!(failed.message.contains("index out of range"));
        assert_eq!(report.summary.passed, 1);
    }

    #[test]
    fn test_stop_propagates_first_error() {
        let fixture = Fixture::new()
            .add("performance.a", Severity::Low, Behavior::Pass)
            .add("performance.b", Severity::Low, Behavior::Fail("boom"))
            .add("performance.c", Severity::Low, Behavior::Pass);
        let runs = Arc::clone(&fixture.runs);
        let engine = fixture.builder().error_handling(ErrorHandling::Stop).build();

        let err = engine.scan(&[]).unwrap_err();
        match err {
            ScanError::CheckFailed { id, source } => {
                assert_eq!(id, "performance.b");
                assert_eq!(source.root_cause().to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Sequential stop never reaches the third check
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stop_propagates_panic() {
        let engine = Fixture::new()
            .add("security.a", Severity::Low, Behavior::Panic("kaboom"))
            .builder()
            .error_handling(ErrorHandling::Stop)
            .build();

        let err = engine.scan(&[]).unwrap_err();
        assert!(matches!(err, ScanError::CheckPanicked { ref id, .. } if id == "security.a"));
        assert!(err.to_string().contains("kaboom"));
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let build = || {
            let mut fixture = Fixture::new();
            for i in 0..12 {
                let category = if i % 3 == 0 { "security" } else { "performance" };
                let behavior = if i % 2 == 0 {
                    Behavior::Pass
                } else {
                    Behavior::Suggest("issue")
                };
                fixture = fixture.add(&format!("{category}.check-{i}"), Severity::Medium, behavior);
            }
            fixture
        };

        let sequential = build().engine().scan(&[]).unwrap();
        let parallel = build().builder().workers(4).build().scan(&[]).unwrap();

        let seq_ids: Vec<&String> = sequential.rules.keys().collect();
        let par_ids: Vec<&String> = parallel.rules.keys().collect();
        assert_eq!(seq_ids, par_ids);
        assert_eq!(sequential.summary, parallel.summary);
        assert_eq!(
            sequential.categories["security"].rules,
            parallel.categories["security"].rules
        );
    }

    #[test]
    fn test_progress_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let engine = Fixture::new()
            .add("performance.a", Severity::Low, Behavior::Pass)
            .add("performance.b", Severity::Low, Behavior::Pass)
            .builder()
            .on_progress(Box::new(move |id, done, total| {
                sink.lock().unwrap().push((id.to_string(), done, total));
            }))
            .build();

        engine.scan(&[]).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("performance.a".to_string(), 1, 2),
                ("performance.b".to_string(), 2, 2)
            ]
        );
    }

    #[test]
    fn test_error_handling_parse() {
        assert_eq!("STOP".parse::<ErrorHandling>().unwrap(), ErrorHandling::Stop);
        assert_eq!(
            "continue".parse::<ErrorHandling>().unwrap(),
            ErrorHandling::Continue
        );
        assert!("ignore".parse::<ErrorHandling>().is_err());
    }
}
