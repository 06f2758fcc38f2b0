//! Core data models for Spotlight
//!
//! These models are exchanged between checks, the scan engine and the
//! reporters: severities, check outcomes and the aggregated scan report.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Open key-value payload attached to an outcome (insertion ordered)
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata key holding a human-readable fix hint
pub const RECOMMENDATION_KEY: &str = "recommendation";

/// Metadata key holding a link to further documentation
pub const DOCUMENTATION_URL_KEY: &str = "documentation_url";

/// Severity levels for checks, lowest first.
///
/// Legacy labels are accepted when parsing: `info` reads as `low` and
/// `warning` reads as `high`. Output always uses the canonical label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Weight used by the health score
    pub const fn weight(self) -> u32 {
        match self {
            Severity::Critical => 100,
            Severity::High => 70,
            Severity::Medium => 40,
            Severity::Low => 10,
        }
    }

    /// Canonical lowercase label
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Display label
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// All levels, highest first
    pub const fn all() -> [Severity; 4] {
        [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ]
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a severity label is not part of the scale
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity '{0}' (expected low, medium, high or critical)")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "info" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" | "warning" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn default_outcome_severity() -> Option<Severity> {
    Some(Severity::Low)
}

/// Reads an outcome severity, mapping unknown labels to `None`
fn lenient_severity<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Severity>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Whether a check gives a firm recommendation or a gentle suggestion.
/// Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    /// Firm recommendations for security/performance issues
    Objective,
    /// Gentle suggestions for architecture/style improvements
    #[default]
    Advisory,
}

impl CheckType {
    pub const fn as_str(self) -> &'static str {
        match self {
            CheckType::Objective => "objective",
            CheckType::Advisory => "advisory",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CheckType::Objective => "Objective (Firm recommendation)",
            CheckType::Advisory => "Advisory (Gentle suggestion)",
        }
    }
}

impl std::fmt::Display for CheckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "objective" => Ok(CheckType::Objective),
            "advisory" => Ok(CheckType::Advisory),
            _ => Err(anyhow::anyhow!(
                "Unknown check type '{}'. Valid types: objective, advisory",
                s
            )),
        }
    }
}

/// Result status of one check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    /// `failed` is the deprecated spelling, accepted on input only
    #[serde(alias = "failed")]
    Suggestion,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Passed => write!(f, "passed"),
            Status::Suggestion => write!(f, "suggestion"),
            Status::Error => write!(f, "error"),
        }
    }
}

/// The result of running one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub id: String,
    pub status: Status,
    #[serde(default)]
    pub message: String,
    /// `None` when an unrecognized severity label was read back; a missing
    /// key reads as `low`
    #[serde(default = "default_outcome_severity", deserialize_with = "lenient_severity")]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub check_type: CheckType,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Outcome {
    /// Attach a metadata entry, replacing any previous value under `key`
    pub fn with_meta(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Shorthand for the `recommendation` metadata entry
    pub fn with_recommendation(self, recommendation: impl Into<String>) -> Self {
        self.with_meta(RECOMMENDATION_KEY, recommendation.into())
    }

    pub fn recommendation(&self) -> Option<&str> {
        self.metadata
            .get(RECOMMENDATION_KEY)
            .and_then(|v| v.as_str())
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.metadata
            .get(DOCUMENTATION_URL_KEY)
            .and_then(|v| v.as_str())
    }

    pub fn is_passed(&self) -> bool {
        self.status == Status::Passed
    }
}

/// Per-category rollup inside a scan report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Display name (capitalized category)
    pub name: String,
    pub rules: Vec<Outcome>,
    pub passed: usize,
    pub suggestions: usize,
    pub errors: usize,
}

impl CategoryReport {
    pub fn new(category: &str) -> Self {
        Self {
            name: capitalize(category),
            rules: Vec::new(),
            passed: 0,
            suggestions: 0,
            errors: 0,
        }
    }

    /// Fold one outcome into the rollup
    pub fn record(&mut self, outcome: Outcome) {
        match outcome.status {
            Status::Passed => self.passed += 1,
            Status::Suggestion => self.suggestions += 1,
            Status::Error => self.errors += 1,
        }
        self.rules.push(outcome);
    }
}

/// Scan-wide counters and the derived health score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_rules: usize,
    pub passed: usize,
    pub suggestions: usize,
    pub errors: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub health_score: u8,
}

impl Default for ScanSummary {
    fn default() -> Self {
        Self {
            total_rules: 0,
            passed: 0,
            suggestions: 0,
            errors: 0,
            critical: 0,
            high: 0,
            medium: 0,
            low: 0,
            health_score: 100,
        }
    }
}

impl ScanSummary {
    /// Count one outcome. Only suggestions feed the severity histogram.
    pub fn record(&mut self, outcome: &Outcome) {
        self.total_rules += 1;
        match outcome.status {
            Status::Passed => self.passed += 1,
            Status::Suggestion => {
                self.suggestions += 1;
                if let Some(severity) = outcome.severity {
                    *self.count_mut(severity) += 1;
                }
            }
            Status::Error => self.errors += 1,
        }
    }

    /// Number of suggestions at exactly `severity`
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Whether any suggestion at `severity` or above was recorded
    pub fn has_issues_at_or_above(&self, severity: Severity) -> bool {
        Severity::all()
            .into_iter()
            .filter(|s| *s >= severity)
            .any(|s| self.count(s) > 0)
    }

    fn count_mut(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
        }
    }
}

/// Aggregate result of one scan invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub timestamp: DateTime<Utc>,
    /// Check id -> outcome, in execution order
    pub rules: IndexMap<String, Outcome>,
    /// Category -> rollup, in first-encountered order
    pub categories: IndexMap<String, CategoryReport>,
    pub summary: ScanSummary,
}

impl ScanReport {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            rules: IndexMap::new(),
            categories: IndexMap::new(),
            summary: ScanSummary::default(),
        }
    }
}

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
