//! # Shield Engine — permission mediation and synthetic-data substitution
//!
//! The decision layer between untrusted apps and a user's sensitive data
//! categories. For every `(app, permission)` request the engine judges
//! whether the request is expected, plausible, or suspicious for the app's
//! apparent function; optionally solicits a bounded-time human confirmation;
//! and, when access is denied or withheld, answers with synthetic data so
//! the app keeps working without seeing anything real. Every decision lands
//! in an append-only ledger that folds into per-app and device-wide privacy
//! scores.
//!
//! Entry point: [`PermissionEngine::request_permission`]. The UI collaborator
//! consumes confirmation prompts via [`PermissionEngine::subscribe_prompts`]
//! and answers them with [`PermissionEngine::resolve_confirmation`].

pub mod broker;
pub mod orchestrator;
pub mod summary;

pub use broker::{ConfirmationBroker, ConfirmationPrompt, PromptListenerFn};
pub use orchestrator::{PermissionEngine, SummarySubscriberFn};
pub use summary::{overall_score, summarize};
