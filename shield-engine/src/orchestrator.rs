//! Permission Orchestrator — the single entry point for permission requests.
//!
//! Decision flow per request: classify the app and score the risk; if the
//! permission is suspicious for the inferred category, broker a human
//! confirmation (deny or timeout means the app gets synthetic data and a
//! `Simulated` audit entry, but still sees success); otherwise run the
//! trust/frequency check and either grant with data or deny. Every decision
//! lands in the ledger, which fans out to log and summary subscribers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info};

use shield_core::config::EngineConfig;
use shield_core::ledger::Ledger;
use shield_core::types::{
    fresh_id, now_ms, App, DataFlowPath, DecisionStatus, LogEntry, PermissionRequest,
    PermissionResponse, PermissionType, PrivacySummary, RequestStatus, RiskLevel,
};
use shield_policy::anomaly::{AnomalyDetector, Validation};
use shield_policy::classifier::CategoryClassifier;
use shield_synthetic::SyntheticDataGenerator;

use crate::broker::{ConfirmationBroker, PromptListenerFn};
use crate::summary;

/// Label for the engine hop in data-flow paths.
const ENGINE_NODE: &str = "Shield Engine";
const DEVICE_NODE: &str = "Device";

/// Upper bound on retained request history (advisory analysis input).
const MAX_REQUEST_HISTORY: usize = 1_000;

pub type SummarySubscriberFn = Arc<dyn Fn(&[PrivacySummary]) + Send + Sync>;

pub struct PermissionEngine {
    classifier: CategoryClassifier,
    detector: AnomalyDetector,
    generator: SyntheticDataGenerator,
    broker: Arc<ConfirmationBroker>,
    ledger: Arc<Ledger>,
    /// Request history, oldest-first, for the advisory sequence analyzer.
    requests: RwLock<VecDeque<PermissionRequest>>,
    sample_size: usize,
    total_requests: AtomicU64,
    total_granted: AtomicU64,
    total_denied: AtomicU64,
    total_simulated: AtomicU64,
}

impl PermissionEngine {
    /// Assemble the engine from explicitly constructed components.
    pub fn new(
        classifier: CategoryClassifier,
        detector: AnomalyDetector,
        generator: SyntheticDataGenerator,
        broker: Arc<ConfirmationBroker>,
        ledger: Arc<Ledger>,
        sample_size: usize,
    ) -> Self {
        Self {
            classifier,
            detector,
            generator,
            broker,
            ledger,
            requests: RwLock::new(VecDeque::new()),
            sample_size,
            total_requests: AtomicU64::new(0),
            total_granted: AtomicU64::new(0),
            total_denied: AtomicU64::new(0),
            total_simulated: AtomicU64::new(0),
        }
    }

    /// Build an engine with every component derived from one config.
    pub fn with_config(config: &EngineConfig) -> Self {
        let detector = AnomalyDetector::new(config.frequency_window_secs, config.frequency_threshold)
            .with_harvest_policy(config.harvest_window_secs, config.harvest_distinct_threshold);
        Self::new(
            CategoryClassifier::new(),
            detector,
            SyntheticDataGenerator::new(config.pregen_batch),
            Arc::new(ConfirmationBroker::new(Duration::from_secs(
                config.confirmation_timeout_secs,
            ))),
            Arc::new(Ledger::new(config.ledger_capacity)),
            config.sample_size,
        )
    }

    pub fn with_defaults() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    // ── Primary entry point ──────────────────────────────────────────────────

    /// Mediate one permission request. Always produces a response: granted
    /// with data, denied with an explanation, or an apparent grant backed by
    /// synthetic data. Suspends (bounded) only while awaiting a human
    /// confirmation.
    pub async fn request_permission(&self, app: &App, permission: PermissionType) -> PermissionResponse {
        // The UI collaborator may call with partially-initialized state.
        if app.id.is_empty() {
            return Self::inert_response();
        }

        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let request_id = fresh_id();
        self.record_request(&request_id, app, permission);

        let category = self.classifier.categorize(app);
        let risk_score = self.classifier.risk_score(app, permission);
        let risk_level = self.classifier.risk_level(risk_score);
        debug!(
            app = %app.name,
            permission = %permission,
            category = ?category,
            risk = risk_score,
            "Permission request received"
        );

        if self.classifier.is_suspicious(app, permission) {
            let warning = self.classifier.warning_message(app, permission);
            let approved = self
                .broker
                .request_confirmation(app, permission, &warning, risk_score, risk_level)
                .await;
            if !approved {
                return self.simulate(app, permission, &request_id, risk_score, Some(risk_level));
            }
            info!(app = %app.name, permission = %permission, "Suspicious request approved by user");
        }

        match self.detector.validate(app, permission) {
            Validation { valid: true, reason } => {
                self.grant(app, permission, &request_id, &reason, risk_score, Some(risk_level))
            }
            Validation { valid: false, reason } => {
                self.deny(app, permission, &request_id, &reason, risk_score, Some(risk_level))
            }
        }
    }

    /// Deliver a human answer for a pending confirmation. No-op for unknown
    /// or already-settled ids.
    pub fn resolve_confirmation(&self, request_id: &str, approved: bool) -> bool {
        self.broker.resolve(request_id, approved)
    }

    // ── Decision arms ────────────────────────────────────────────────────────

    fn grant(
        &self,
        app: &App,
        permission: PermissionType,
        request_id: &str,
        reason: &str,
        risk_score: f64,
        risk_level: Option<RiskLevel>,
    ) -> PermissionResponse {
        self.total_granted.fetch_add(1, Ordering::Relaxed);
        self.settle_request(request_id, RequestStatus::Granted);
        let data = self.generator.sample(permission, self.sample_size);
        let paths = Self::data_paths(app, false);

        self.ledger.append(LogEntry {
            id: fresh_id(),
            timestamp_ms: now_ms(),
            request_id: request_id.to_string(),
            app_id: app.id.clone(),
            app_name: app.name.clone(),
            permission,
            status: DecisionStatus::Granted,
            data: Some(data.clone()),
            message: reason.to_string(),
            risk_score: Some(risk_score),
            risk_level,
        });

        PermissionResponse {
            request_id: request_id.to_string(),
            timestamp_ms: now_ms(),
            granted: true,
            data: Some(data),
            message: reason.to_string(),
            risk_score: Some(risk_score),
            risk_level,
            data_paths: paths,
        }
    }

    fn deny(
        &self,
        app: &App,
        permission: PermissionType,
        request_id: &str,
        reason: &str,
        risk_score: f64,
        risk_level: Option<RiskLevel>,
    ) -> PermissionResponse {
        self.total_denied.fetch_add(1, Ordering::Relaxed);
        self.settle_request(request_id, RequestStatus::Denied);

        self.ledger.append(LogEntry {
            id: fresh_id(),
            timestamp_ms: now_ms(),
            request_id: request_id.to_string(),
            app_id: app.id.clone(),
            app_name: app.name.clone(),
            permission,
            status: DecisionStatus::Denied,
            data: None,
            message: reason.to_string(),
            risk_score: Some(risk_score),
            risk_level,
        });

        PermissionResponse {
            request_id: request_id.to_string(),
            timestamp_ms: now_ms(),
            granted: false,
            data: None,
            message: reason.to_string(),
            risk_score: Some(risk_score),
            risk_level,
            data_paths: Vec::new(),
        }
    }

    /// Paper a denial over with synthetic data: the caller sees success, the
    /// ledger sees `Simulated` under a fresh synthetic request id — its own
    /// audit trail, not a retroactive edit of the denied request.
    fn simulate(
        &self,
        app: &App,
        permission: PermissionType,
        request_id: &str,
        risk_score: f64,
        risk_level: Option<RiskLevel>,
    ) -> PermissionResponse {
        self.total_simulated.fetch_add(1, Ordering::Relaxed);
        self.settle_request(request_id, RequestStatus::Denied);
        let data = self.generator.sample(permission, self.sample_size);
        let message =
            "Permission denied by user, but simulated data provided to maintain app functionality.";
        info!(app = %app.name, permission = %permission, "Serving simulated data");

        self.ledger.append(LogEntry {
            id: fresh_id(),
            timestamp_ms: now_ms(),
            request_id: format!("simulated-{}", fresh_id()),
            app_id: app.id.clone(),
            app_name: app.name.clone(),
            permission,
            status: DecisionStatus::Simulated,
            data: Some(data.clone()),
            message: message.to_string(),
            risk_score: Some(risk_score),
            risk_level,
        });

        PermissionResponse {
            request_id: request_id.to_string(),
            timestamp_ms: now_ms(),
            granted: true,
            data: Some(data),
            message: message.to_string(),
            risk_score: Some(risk_score),
            risk_level,
            data_paths: Self::data_paths(app, true),
        }
    }

    fn inert_response() -> PermissionResponse {
        PermissionResponse {
            request_id: String::new(),
            timestamp_ms: now_ms(),
            granted: false,
            data: None,
            message: String::new(),
            risk_score: None,
            risk_level: None,
            data_paths: Vec::new(),
        }
    }

    /// Device → Engine → App; the second hop carries the virtual tag when
    /// synthetic substitution happened.
    fn data_paths(app: &App, synthetic: bool) -> Vec<DataFlowPath> {
        vec![
            DataFlowPath {
                source: DEVICE_NODE.into(),
                destination: ENGINE_NODE.into(),
                is_virtual: false,
            },
            DataFlowPath {
                source: ENGINE_NODE.into(),
                destination: app.name.clone(),
                is_virtual: synthetic,
            },
        ]
    }

    // ── Request history ──────────────────────────────────────────────────────

    fn record_request(&self, request_id: &str, app: &App, permission: PermissionType) {
        let mut requests = self.requests.write();
        if requests.len() >= MAX_REQUEST_HISTORY {
            requests.pop_front();
        }
        requests.push_back(PermissionRequest {
            id: request_id.to_string(),
            timestamp_ms: now_ms(),
            app_id: app.id.clone(),
            permission,
            status: RequestStatus::Pending,
        });
    }

    fn settle_request(&self, request_id: &str, status: RequestStatus) {
        let mut requests = self.requests.write();
        if let Some(request) = requests.iter_mut().find(|r| r.id == request_id) {
            request.status = status;
        }
    }

    /// Advisory harvesting analysis over the retained request history. Never
    /// feeds back into grant/deny decisions.
    pub fn analyze_request_sequence(&self, app_id: &str) -> Validation {
        let requests = self.request_history();
        self.detector.analyze_sequence(&requests, app_id)
    }

    pub fn request_history(&self) -> Vec<PermissionRequest> {
        self.requests.read().iter().cloned().collect()
    }

    // ── Observation surface ──────────────────────────────────────────────────

    pub fn logs(&self) -> Vec<LogEntry> {
        self.ledger.entries()
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub fn broker(&self) -> &Arc<ConfirmationBroker> {
        &self.broker
    }

    /// Subscribe to raw audit-log updates (activity-log UIs).
    pub fn subscribe_logs(&self, id: &str, callback: shield_core::LedgerSubscriberFn) {
        self.ledger.subscribe(id, callback);
    }

    pub fn unsubscribe_logs(&self, id: &str) -> bool {
        self.ledger.unsubscribe(id)
    }

    /// Subscribe to recomputed privacy summaries (dashboard UIs). Summaries
    /// are folded from the ledger on every append.
    pub fn subscribe_summary(&self, id: &str, callback: SummarySubscriberFn) {
        self.ledger.subscribe(
            &format!("summary:{id}"),
            Arc::new(move |entries| {
                let summaries = summary::summarize(entries);
                callback(&summaries);
            }),
        );
    }

    pub fn unsubscribe_summary(&self, id: &str) -> bool {
        self.ledger.unsubscribe(&format!("summary:{id}"))
    }

    /// Subscribe to confirmation prompts (the human-decision channel).
    pub fn subscribe_prompts(&self, id: &str, listener: PromptListenerFn) {
        self.broker.subscribe_prompts(id, listener);
    }

    pub fn unsubscribe_prompts(&self, id: &str) -> bool {
        self.broker.unsubscribe_prompts(id)
    }

    /// Current per-app summaries, computed on demand.
    pub fn summaries(&self) -> Vec<PrivacySummary> {
        summary::summarize(&self.ledger.entries())
    }

    /// Device-wide privacy score in [0,100].
    pub fn overall_privacy_score(&self) -> f64 {
        summary::overall_score(&self.summaries())
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn total_granted(&self) -> u64 {
        self.total_granted.load(Ordering::Relaxed)
    }

    pub fn total_denied(&self) -> u64 {
        self.total_denied.load(Ordering::Relaxed)
    }

    pub fn total_simulated(&self) -> u64 {
        self.total_simulated.load(Ordering::Relaxed)
    }
}
