//! # Shield Policy — request plausibility judgement
//!
//! Two independent policy oracles consumed by the orchestrator:
//!
//! - [`classifier::CategoryClassifier`] — keyword-based app categorization,
//!   required/optional/suspicious partition, risk scoring, warning text.
//! - [`anomaly::AnomalyDetector`] — trust gate plus fixed-window request
//!   frequency tracking, with an advisory harvesting-pattern analyzer.

pub mod anomaly;
pub mod classifier;

pub use anomaly::{AnomalyDetector, Validation};
pub use classifier::{AppCategory, CategoryClassifier, CategoryProfile, CATALOG};
