//! Shared data model for the shield permission engine.
//!
//! Everything that crosses a component boundary lives here: permission and
//! risk taxonomies, app identity, request/response/audit records, and the
//! synthetic record shapes the generator produces.

use std::fmt;
use std::str::FromStr;

use crate::error::ShieldError;

// ── Permission taxonomy ──────────────────────────────────────────────────────

/// The closed set of sensitive data categories the engine mediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionType {
    CallLogs,
    Messages,
    FileAccess,
    Contacts,
    Location,
}

impl PermissionType {
    /// Every permission type, in a stable order.
    pub const ALL: [PermissionType; 5] = [
        PermissionType::CallLogs,
        PermissionType::Messages,
        PermissionType::FileAccess,
        PermissionType::Contacts,
        PermissionType::Location,
    ];

    /// Human-readable label, e.g. "call logs".
    pub fn label(&self) -> &'static str {
        match self {
            PermissionType::CallLogs => "call logs",
            PermissionType::Messages => "messages",
            PermissionType::FileAccess => "file access",
            PermissionType::Contacts => "contacts",
            PermissionType::Location => "location",
        }
    }

    /// Short description of what granting this permission exposes.
    pub fn describe(&self) -> &'static str {
        match self {
            PermissionType::CallLogs => "Access to your phone call history",
            PermissionType::Messages => "Access to your SMS and messaging history",
            PermissionType::FileAccess => "Access to your files and documents",
            PermissionType::Contacts => "Access to your contacts and address book",
            PermissionType::Location => "Access to your device location",
        }
    }

    /// Whether this category counts toward harvesting-pattern analysis.
    pub fn is_sensitive(&self) -> bool {
        !matches!(self, PermissionType::FileAccess)
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionType::CallLogs => "CALL_LOGS",
            PermissionType::Messages => "MESSAGES",
            PermissionType::FileAccess => "FILE_ACCESS",
            PermissionType::Contacts => "CONTACTS",
            PermissionType::Location => "LOCATION",
        };
        f.write_str(s)
    }
}

impl FromStr for PermissionType {
    type Err = ShieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CALL_LOGS" => Ok(PermissionType::CallLogs),
            "MESSAGES" => Ok(PermissionType::Messages),
            "FILE_ACCESS" => Ok(PermissionType::FileAccess),
            "CONTACTS" => Ok(PermissionType::Contacts),
            "LOCATION" => Ok(PermissionType::Location),
            other => Err(ShieldError::UnknownPermission(other.to_string())),
        }
    }
}

// ── Risk taxonomy ────────────────────────────────────────────────────────────

/// Risk buckets derived from a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Closed-open thresholds: [0,30) Low, [30,50) Medium, [50,70) High, [70,∞) Critical.
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            RiskLevel::Low
        } else if score < 50.0 {
            RiskLevel::Medium
        } else if score < 70.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

// ── App identity ─────────────────────────────────────────────────────────────

/// An application as seen by the engine. The `trusted` flag is set by whoever
/// registers the app; the engine never infers it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    /// Presentation-only icon reference.
    pub icon: String,
    pub trusted: bool,
}

impl App {
    pub fn new(id: &str, name: &str, icon: &str, trusted: bool) -> Self {
        Self { id: id.into(), name: name.into(), icon: icon.into(), trusted }
    }
}

// ── Requests, responses, audit entries ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Granted,
    Denied,
}

/// Terminal decision statuses recorded in the ledger. `Simulated` marks a
/// denial papered over with synthetic data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    Granted,
    Denied,
    Simulated,
}

/// One in-flight permission request. Created once per call into the
/// orchestrator; its status changes exactly once, to a terminal state.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PermissionRequest {
    pub id: String,
    pub timestamp_ms: i64,
    pub app_id: String,
    pub permission: PermissionType,
    pub status: RequestStatus,
}

/// One conceptual hop of data movement, for flow visualisation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DataFlowPath {
    pub source: String,
    pub destination: String,
    /// True when the hop carries synthetic rather than real data.
    pub is_virtual: bool,
}

/// The value returned to the caller. Never stored — the ledger keeps a
/// derived [`LogEntry`] instead.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PermissionResponse {
    pub request_id: String,
    pub timestamp_ms: i64,
    pub granted: bool,
    pub data: Option<Vec<SyntheticRecord>>,
    pub message: String,
    pub risk_score: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub data_paths: Vec<DataFlowPath>,
}

/// Immutable audit record. The ledger is append-only; a bounded ring is the
/// only eviction policy.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp_ms: i64,
    pub request_id: String,
    pub app_id: String,
    pub app_name: String,
    pub permission: PermissionType,
    pub status: DecisionStatus,
    pub data: Option<Vec<SyntheticRecord>>,
    pub message: String,
    pub risk_score: Option<f64>,
    pub risk_level: Option<RiskLevel>,
}

// ── Synthetic record shapes ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallDirection {
    Incoming,
    Outgoing,
    Missed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CallLogRecord {
    pub id: String,
    pub phone_number: String,
    pub name: Option<String>,
    pub direction: CallDirection,
    pub timestamp_ms: i64,
    /// Seconds. Always 0 for missed calls.
    pub duration_secs: u32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub phone_number: String,
    pub name: Option<String>,
    pub direction: MessageDirection,
    pub timestamp_ms: i64,
    pub content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub path: String,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub modified_ms: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LocationRecord {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: u32,
    pub timestamp_ms: i64,
}

/// A generated substitute record for any data category.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyntheticRecord {
    CallLog(CallLogRecord),
    Message(MessageRecord),
    File(FileRecord),
    Contact(ContactRecord),
    Location(LocationRecord),
}

impl SyntheticRecord {
    /// The permission type this record substitutes for.
    pub fn permission(&self) -> PermissionType {
        match self {
            SyntheticRecord::CallLog(_) => PermissionType::CallLogs,
            SyntheticRecord::Message(_) => PermissionType::Messages,
            SyntheticRecord::File(_) => PermissionType::FileAccess,
            SyntheticRecord::Contact(_) => PermissionType::Contacts,
            SyntheticRecord::Location(_) => PermissionType::Location,
        }
    }
}

// ── Privacy summaries ────────────────────────────────────────────────────────

/// Per-permission decision counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PermissionCounts {
    pub granted: u64,
    pub denied: u64,
    pub simulated: u64,
}

/// Per-app aggregate derived from the ledger. Never persisted; recomputed on
/// demand or on every append.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PrivacySummary {
    pub app_id: String,
    pub app_name: String,
    pub counts: std::collections::HashMap<PermissionType, PermissionCounts>,
    /// Average risk score over entries that carried one.
    pub risk_score: f64,
    pub last_access_ms: i64,
}

/// Unique string id for requests and audit entries.
pub fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time in Unix milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(49.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(69.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_permission_round_trip() {
        for p in PermissionType::ALL {
            let parsed: PermissionType = p.to_string().parse().unwrap();
            assert_eq!(parsed, p);
        }
        assert!("CLIPBOARD".parse::<PermissionType>().is_err());
    }

    #[test]
    fn test_permission_serde_wire_format() {
        let json = serde_json::to_string(&PermissionType::CallLogs).unwrap();
        assert_eq!(json, "\"CALL_LOGS\"");
    }

    #[test]
    fn test_sensitive_set() {
        assert!(PermissionType::CallLogs.is_sensitive());
        assert!(PermissionType::Messages.is_sensitive());
        assert!(PermissionType::Contacts.is_sensitive());
        assert!(PermissionType::Location.is_sensitive());
        assert!(!PermissionType::FileAccess.is_sensitive());
    }
}
