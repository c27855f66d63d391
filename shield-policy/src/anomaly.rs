//! Anomaly Detector — trust and request-frequency validation.
//!
//! Keeps a fixed-window counter per (app id, permission type). This is not a
//! true sliding window: a burst straddling a window boundary can undercount.
//! Accepted approximation for this design.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::warn;

use shield_core::types::{now_ms, App, PermissionRequest, PermissionType};

/// Outcome of a validation check. A rejection is a policy decision, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub reason: String,
}

impl Validation {
    fn ok(reason: String) -> Self {
        Self { valid: true, reason }
    }

    fn rejected(reason: String) -> Self {
        Self { valid: false, reason }
    }
}

#[derive(Debug, Clone, Copy)]
struct RequestWindow {
    count: u32,
    last_request_ms: i64,
}

pub struct AnomalyDetector {
    windows: RwLock<HashMap<(String, PermissionType), RequestWindow>>,
    window_ms: i64,
    threshold: u32,
    harvest_window_ms: i64,
    harvest_distinct: usize,
    total_validated: AtomicU64,
    total_rejected: AtomicU64,
}

impl AnomalyDetector {
    pub fn new(window_secs: u64, threshold: u32) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            window_ms: window_secs as i64 * 1000,
            threshold,
            harvest_window_ms: 5 * 60 * 1000,
            harvest_distinct: 3,
            total_validated: AtomicU64::new(0),
            total_rejected: AtomicU64::new(0),
        }
    }

    pub fn with_harvest_policy(mut self, window_secs: u64, distinct_threshold: usize) -> Self {
        self.harvest_window_ms = window_secs as i64 * 1000;
        self.harvest_distinct = distinct_threshold;
        self
    }

    /// Validate a request against trust and frequency policy, recording it on
    /// success.
    pub fn validate(&self, app: &App, permission: PermissionType) -> Validation {
        self.validate_at(app, permission, now_ms())
    }

    /// Clock-injected variant of [`validate`](Self::validate).
    pub fn validate_at(&self, app: &App, permission: PermissionType, now_ms: i64) -> Validation {
        self.total_validated.fetch_add(1, Ordering::Relaxed);

        if !app.trusted {
            self.total_rejected.fetch_add(1, Ordering::Relaxed);
            warn!(app = %app.name, permission = %permission, "Untrusted app rejected");
            return Validation::rejected(format!(
                "App '{}' is not trusted to access {}",
                app.name,
                permission.label()
            ));
        }

        let key = (app.id.clone(), permission);
        let mut windows = self.windows.write();

        if let Some(window) = windows.get(&key) {
            let in_window = now_ms - window.last_request_ms <= self.window_ms;
            if in_window && window.count >= self.threshold {
                self.total_rejected.fetch_add(1, Ordering::Relaxed);
                warn!(
                    app = %app.name,
                    permission = %permission,
                    count = window.count,
                    "Suspicious request frequency"
                );
                return Validation::rejected(format!(
                    "Suspicious pattern detected: too many {} requests in a short period",
                    permission.label()
                ));
            }
        }

        let window = windows.entry(key).or_insert(RequestWindow { count: 0, last_request_ms: now_ms });
        if now_ms - window.last_request_ms > self.window_ms {
            window.count = 0;
        }
        window.count += 1;
        window.last_request_ms = now_ms;

        Validation::ok(format!(
            "Request for {} by '{}' validated",
            permission.label(),
            app.name
        ))
    }

    /// Advisory harvesting check: flags an app that requested 3+ distinct
    /// sensitive permission types within the trailing window. Not wired into
    /// the grant/deny path.
    pub fn analyze_sequence(&self, requests: &[PermissionRequest], app_id: &str) -> Validation {
        self.analyze_sequence_at(requests, app_id, now_ms())
    }

    pub fn analyze_sequence_at(
        &self,
        requests: &[PermissionRequest],
        app_id: &str,
        now_ms: i64,
    ) -> Validation {
        let app_requests: Vec<&PermissionRequest> =
            requests.iter().filter(|r| r.app_id == app_id).collect();
        if app_requests.len() < self.harvest_distinct {
            return Validation::ok(String::new());
        }

        let distinct: HashSet<PermissionType> = app_requests
            .iter()
            .filter(|r| r.permission.is_sensitive())
            .filter(|r| now_ms - r.timestamp_ms <= self.harvest_window_ms)
            .map(|r| r.permission)
            .collect();

        if distinct.len() >= self.harvest_distinct {
            warn!(app_id = %app_id, distinct = distinct.len(), "Possible data harvesting pattern");
            return Validation::rejected(
                "App is requesting multiple sensitive permissions in quick succession".into(),
            );
        }
        Validation::ok(String::new())
    }

    pub fn total_validated(&self) -> u64 {
        self.total_validated.load(Ordering::Relaxed)
    }

    pub fn total_rejected(&self) -> u64 {
        self.total_rejected.load(Ordering::Relaxed)
    }
}
