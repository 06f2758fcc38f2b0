//! Health Scoring
//!
//! Turns the severity histogram of a scan into a single 0-100 number.
//! Passed checks and errors do not lower the score.
//!
//! # Scoring Formula
//!
//! ```text
//! penalty = critical × 100 + high × 70 + medium × 40 + low × 10
//! ratio   = penalty / (total_rules × 100)
//! score   = round(max(0, 100 − ratio × 100))
//! ```
//!
//! A scan with no checks, or with no severity-counted suggestions, scores 100.
//!
//! # Example
//!
//! 10 checks with one high suggestion:
//! - penalty = 70, ratio = 70 / 1000 = 0.07
//! - score = 100 − 7 = 93

mod health;

pub use health::{health_score, weighted_penalty};
