//! End-to-end scans through the library API against on-disk fixtures

mod common;

use spotlight::checks::{
    build_registry, Check, CheckCatalog, CheckMeta, ErrorHandling, ScanEngineBuilder, ScanError,
};
use spotlight::config::ProjectConfig;
use spotlight::models::{Outcome, ScanReport, Severity, Status};
use spotlight::source::{ProjectSource, SourceReader};
use std::path::Path;
use std::sync::Arc;

fn scan_with(
    root: &Path,
    config: &ProjectConfig,
    catalog: &CheckCatalog,
    categories: &[&str],
) -> Result<ScanReport, ScanError> {
    let registry = build_registry(config, catalog).expect("valid registry");
    let categories: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
    ScanEngineBuilder::new(Arc::new(registry), Arc::new(ProjectSource::new(root)))
        .error_handling(config.error_handling)
        .workers(config.workers)
        .build()
        .scan(&categories)
}

fn scan(root: &Path, categories: &[&str]) -> ScanReport {
    scan_with(root, &ProjectConfig::default(), &CheckCatalog::new(), categories).expect("scan")
}

#[test]
fn test_healthy_project_scores_100() {
    let dir = common::healthy_project();
    let report = scan(dir.path(), &[]);

    assert_eq!(report.summary.total_rules, 24);
    assert_eq!(report.summary.passed, 24, "unexpected: {:#?}", report.rules);
    assert_eq!(report.summary.health_score, 100);
    assert_eq!(
        report.categories.keys().collect::<Vec<_>>(),
        vec!["performance", "security", "architecture"]
    );
    assert_eq!(report.rules["performance.queue-sync-driver"].message, "Queue is using redis driver");
}

#[test]
fn test_misconfigured_project() {
    let dir = common::misconfigured_project();
    let report = scan(dir.path(), &[]);
    let summary = &report.summary;

    assert_eq!(summary.total_rules, 24);
    assert_eq!(summary.suggestions, 9);
    assert_eq!(summary.passed, 15);
    assert_eq!(summary.errors, 0);
    assert_eq!(
        (summary.critical, summary.high, summary.medium, summary.low),
        (1, 3, 0, 5)
    );
    // penalty 100 + 3*70 + 5*10 = 360 over 2400 possible
    assert_eq!(summary.health_score, 85);

    let debug = &report.rules["security.app-debug-enabled"];
    assert_eq!(debug.status, Status::Suggestion);
    assert_eq!(debug.severity, Some(Severity::Critical));
    assert_eq!(
        debug.recommendation(),
        Some("Set APP_DEBUG=false in your production .env file")
    );
    assert_eq!(
        report.rules["security.https-enforcement"].metadata["current_url"],
        "http://shop.test"
    );
    assert_eq!(
        report.rules["performance.queue-sync-driver"].metadata["current_driver"],
        "sync"
    );
}

#[test]
fn test_category_filter() {
    let dir = common::misconfigured_project();
    let report = scan(dir.path(), &["performance"]);

    assert_eq!(report.summary.total_rules, 7);
    assert!(report.rules.keys().all(|id| id.starts_with("performance.")));
    assert_eq!(report.categories.len(), 1);
    // 70 + 4*10 = 110 over 700
    assert_eq!(report.summary.health_score, 84);
}

#[test]
fn test_local_environment_skips_production_checks() {
    let dir = common::local_project();
    let report = scan(dir.path(), &["security"]);

    assert_eq!(
        report.rules["security.app-debug-enabled"].message,
        "Not in production environment"
    );
    // Session driver is checked everywhere; the default file driver is fine
    assert_eq!(
        report.rules["security.session-driver"].message,
        "Session driver 'file' is configured"
    );
    assert_eq!(report.summary.passed, 4);
}

#[test]
fn test_dotenv_references_resolve_before_checks_run() {
    let dir = common::healthy_project();
    common::write(
        dir.path(),
        ".env",
        "APP_ENV=production\nAPP_DEBUG=false\nSPOTLIGHT_FIXTURE_SCHEME=https\n\
         APP_URL=\"${SPOTLIGHT_FIXTURE_SCHEME}://shop.test\"\n\
         QUEUE_CONNECTION=redis\nSESSION_DRIVER=redis\nSESSION_SECURE_COOKIE=true\n",
    );
    let report = scan(dir.path(), &["security"]);

    let https = &report.rules["security.https-enforcement"];
    assert_eq!(https.status, Status::Passed, "{:?}", https.metadata);
    assert_eq!(report.summary.passed, 4);
}

#[test]
fn test_config_filters_registry() {
    let dir = common::misconfigured_project();
    let mut config = ProjectConfig {
        severity_threshold: Severity::High,
        ..Default::default()
    };
    config
        .enabled_rules
        .insert("security.app-debug-enabled".to_string(), false);
    let report = scan_with(dir.path(), &config, &CheckCatalog::new(), &[]).unwrap();

    assert_eq!(report.summary.total_rules, 5);
    assert!(!report.rules.contains_key("security.app-debug-enabled"));
    assert_eq!(report.summary.high, 3);
    assert_eq!(report.summary.critical, 0);
}

#[test]
fn test_architecture_findings() {
    let dir = common::healthy_project();
    common::write(
        dir.path(),
        "app/Http/Controllers/ReportController.php",
        r#"<?php
class ReportController extends Controller
{
    public function index()
    {
        $rows = DB::table('orders')->where('paid', true)->count();
        return response()->json(['rows' => $rows]);
    }
}
"#,
    );
    common::write(
        dir.path(),
        "app/Models/Order.php",
        "<?php\nclass Order extends Model\n{\n}\n",
    );
    let report = scan(dir.path(), &["architecture"]);

    let db = &report.rules["architecture.direct-db-queries"];
    assert_eq!(db.status, Status::Suggestion);
    assert_eq!(db.metadata["controllers"][0]["file"], "ReportController.php");

    let models = &report.rules["architecture.missing-mass-assignment-protection"];
    assert_eq!(models.status, Status::Suggestion);
    assert_eq!(models.metadata["models"][0]["file"], "Order.php");
}

/// Custom check that always fails, registered through the catalog
struct BrokenCheck {
    meta: CheckMeta,
}

impl Check for BrokenCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn scan(&self, source: &dyn SourceReader) -> anyhow::Result<Outcome> {
        let content = std::fs::read_to_string(source.root().join("composer.lock"))?;
        Ok(self.pass(content))
    }
}

fn broken_catalog() -> CheckCatalog {
    let mut catalog = CheckCatalog::new();
    catalog.register("BrokenCheck", || {
        Arc::new(BrokenCheck {
            meta: CheckMeta::new("team.broken", "team").severity(Severity::High),
        })
    });
    catalog
}

#[test]
fn test_custom_check_error_is_contained() {
    let dir = common::healthy_project();
    let config = ProjectConfig {
        custom_rules: vec!["BrokenCheck".to_string()],
        ..Default::default()
    };
    let report = scan_with(dir.path(), &config, &broken_catalog(), &[]).unwrap();

    assert_eq!(report.summary.total_rules, 25);
    assert_eq!(report.summary.errors, 1);
    assert_eq!(report.summary.passed, 24);
    // Errors do not lower the score
    assert_eq!(report.summary.health_score, 100);

    let broken = &report.rules["team.broken"];
    assert_eq!(broken.status, Status::Error);
    assert!(broken.message.starts_with("Rule could not complete"));
    assert_eq!(broken.metadata["exception"], "error");
    assert_eq!(report.categories["team"].errors, 1);
}

#[test]
fn test_custom_check_error_stops_scan() {
    let dir = common::healthy_project();
    let config = ProjectConfig {
        custom_rules: vec!["BrokenCheck".to_string()],
        error_handling: ErrorHandling::Stop,
        ..Default::default()
    };
    let err = scan_with(dir.path(), &config, &broken_catalog(), &[]).unwrap_err();
    match err {
        ScanError::CheckFailed { id, .. } => assert_eq!(id, "team.broken"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parallel_scan_matches_sequential() {
    let dir = common::misconfigured_project();
    let sequential = scan(dir.path(), &[]);
    let config = ProjectConfig {
        workers: 4,
        ..Default::default()
    };
    let parallel = scan_with(dir.path(), &config, &CheckCatalog::new(), &[]).unwrap();

    assert_eq!(
        sequential.rules.keys().collect::<Vec<_>>(),
        parallel.rules.keys().collect::<Vec<_>>()
    );
    assert_eq!(sequential.summary, parallel.summary);
}
