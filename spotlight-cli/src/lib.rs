//! Spotlight - Laravel application scanner
//!
//! Runs a registry of pattern checks against a Laravel project tree and
//! produces a report of passed checks, suggestions and errors per category,
//! with a severity-weighted health score.
//!
//! Hosts embed the engine by building a [`checks::CheckRegistry`] (usually
//! via [`checks::build_registry`]) and handing it to a
//! [`checks::ScanEngine`] together with a [`source::SourceReader`].

pub mod checks;
pub mod cli;
pub mod config;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod source;
