//! # Shield Core — shared model and audit ledger
//!
//! Foundation crate for the shield permission engine: the permission/risk
//! taxonomies and record shapes every component exchanges, engine
//! configuration, the error taxonomy, and the append-only decision ledger
//! that downstream reporting folds into privacy scores.

pub mod config;
pub mod error;
pub mod ledger;
pub mod types;

pub use config::EngineConfig;
pub use error::{ShieldError, ShieldResult};
pub use ledger::{Ledger, LedgerSubscriberFn};
