//! Confirmation Broker — bounded-time human decision channel.
//!
//! A suspicious request becomes a pending confirmation: the broker notifies
//! prompt listeners (the UI collaborator) and suspends the requesting flow on
//! a oneshot channel raced against a timer. If nobody answers within the
//! timeout the broker auto-denies. Resolution is check-and-set — exactly one
//! of {human answer, timeout} wins per request id, and late or repeated
//! resolutions are no-ops rather than errors, since the UI may race the
//! timer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use shield_core::types::{fresh_id, App, PermissionType, RiskLevel};

/// Notification emitted to the UI collaborator when a confirmation is needed.
#[derive(Debug, Clone)]
pub struct ConfirmationPrompt {
    pub request_id: String,
    pub app: App,
    pub permission: PermissionType,
    pub warning_message: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

pub type PromptListenerFn = Arc<dyn Fn(&ConfirmationPrompt) + Send + Sync>;

struct PendingConfirmation {
    sender: oneshot::Sender<bool>,
    app: App,
    permission: PermissionType,
}

pub struct ConfirmationBroker {
    pending: RwLock<HashMap<String, PendingConfirmation>>,
    listeners: RwLock<Vec<(String, PromptListenerFn)>>,
    timeout: Duration,
    total_prompted: AtomicU64,
    total_approved: AtomicU64,
    total_denied: AtomicU64,
    total_timed_out: AtomicU64,
}

impl ConfirmationBroker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
            timeout,
            total_prompted: AtomicU64::new(0),
            total_approved: AtomicU64::new(0),
            total_denied: AtomicU64::new(0),
            total_timed_out: AtomicU64::new(0),
        }
    }

    /// Register a prompt listener under a caller-chosen id.
    pub fn subscribe_prompts(&self, id: &str, listener: PromptListenerFn) {
        let mut listeners = self.listeners.write();
        listeners.retain(|(lid, _)| lid != id);
        listeners.push((id.into(), listener));
    }

    pub fn unsubscribe_prompts(&self, id: &str) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(lid, _)| lid != id);
        listeners.len() < before
    }

    /// Solicit a human decision for a suspicious request. Suspends the
    /// calling flow (without occupying a thread) until [`resolve`](Self::resolve)
    /// is called or the timeout elapses; timeout means denied.
    pub async fn request_confirmation(
        &self,
        app: &App,
        permission: PermissionType,
        warning_message: &str,
        risk_score: f64,
        risk_level: RiskLevel,
    ) -> bool {
        let request_id = format!("confirm-{}", fresh_id());
        let (sender, receiver) = oneshot::channel();
        self.pending.write().insert(
            request_id.clone(),
            PendingConfirmation { sender, app: app.clone(), permission },
        );
        self.total_prompted.fetch_add(1, Ordering::Relaxed);
        info!(
            request_id = %request_id,
            app = %app.name,
            permission = %permission,
            risk = risk_score,
            "Confirmation required"
        );

        let prompt = ConfirmationPrompt {
            request_id: request_id.clone(),
            app: app.clone(),
            permission,
            warning_message: warning_message.to_string(),
            risk_score,
            risk_level,
        };
        // Snapshot first so a listener can subscribe or unsubscribe from its
        // own callback without deadlocking.
        let listeners: Vec<PromptListenerFn> = {
            let listeners = self.listeners.read();
            listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in listeners {
            listener(&prompt);
        }

        match tokio::time::timeout(self.timeout, receiver).await {
            Ok(Ok(approved)) => {
                if approved {
                    self.total_approved.fetch_add(1, Ordering::Relaxed);
                } else {
                    self.total_denied.fetch_add(1, Ordering::Relaxed);
                }
                approved
            }
            // Sender dropped without an answer; treat as denied.
            Ok(Err(_)) => {
                self.total_denied.fetch_add(1, Ordering::Relaxed);
                false
            }
            // Timer won the race: auto-deny and retire the pending entry so a
            // late human answer becomes a no-op.
            Err(_) => {
                self.pending.write().remove(&request_id);
                self.total_timed_out.fetch_add(1, Ordering::Relaxed);
                warn!(request_id = %request_id, app = %app.name, "Confirmation timed out, auto-denied");
                false
            }
        }
    }

    /// Deliver the human answer. Returns false (and does nothing) for
    /// unknown, already-resolved, or timed-out ids.
    pub fn resolve(&self, request_id: &str, approved: bool) -> bool {
        // remove() is the check-and-set: the first caller takes the sender,
        // everyone after sees nothing.
        let Some(pending) = self.pending.write().remove(request_id) else {
            debug!(request_id = %request_id, "Resolution for unknown or settled confirmation ignored");
            return false;
        };
        pending.sender.send(approved).is_ok()
    }

    /// Snapshot of confirmations still awaiting an answer.
    pub fn pending_requests(&self) -> Vec<(String, App, PermissionType)> {
        self.pending
            .read()
            .iter()
            .map(|(id, p)| (id.clone(), p.app.clone(), p.permission))
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.read().len()
    }

    pub fn total_prompted(&self) -> u64 {
        self.total_prompted.load(Ordering::Relaxed)
    }

    pub fn total_approved(&self) -> u64 {
        self.total_approved.load(Ordering::Relaxed)
    }

    pub fn total_denied(&self) -> u64 {
        self.total_denied.load(Ordering::Relaxed)
    }

    pub fn total_timed_out(&self) -> u64 {
        self.total_timed_out.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn game() -> App {
        App::new("game1", "Puzzle Game", "gamepad", false)
    }

    fn broker(timeout_ms: u64) -> Arc<ConfirmationBroker> {
        Arc::new(ConfirmationBroker::new(Duration::from_millis(timeout_ms)))
    }

    fn prompt_id(broker: &ConfirmationBroker) -> String {
        broker.pending_requests().first().map(|(id, _, _)| id.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_approved() {
        let b = broker(5_000);
        let b2 = b.clone();
        let task = tokio::spawn(async move {
            b2.request_confirmation(&game(), PermissionType::Contacts, "warn", 90.0, RiskLevel::Critical)
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let id = prompt_id(&b);
        assert!(b.resolve(&id, true));
        assert!(task.await.unwrap());
        assert_eq!(b.total_approved(), 1);
        assert_eq!(b.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_auto_denies() {
        let b = broker(30);
        let approved = b
            .request_confirmation(&game(), PermissionType::Contacts, "warn", 90.0, RiskLevel::Critical)
            .await;
        assert!(!approved);
        assert_eq!(b.total_timed_out(), 1);
        assert_eq!(b.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let b = broker(5_000);
        let b2 = b.clone();
        let task = tokio::spawn(async move {
            b2.request_confirmation(&game(), PermissionType::Location, "warn", 84.0, RiskLevel::Critical)
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let id = prompt_id(&b);
        assert!(b.resolve(&id, false));
        assert!(!b.resolve(&id, true)); // second resolution is a no-op
        assert!(!task.await.unwrap());
        assert_eq!(b.total_denied(), 1);
    }

    #[tokio::test]
    async fn test_resolve_after_timeout_is_noop() {
        let b = broker(150);
        let b2 = b.clone();
        let task = tokio::spawn(async move {
            b2.request_confirmation(&game(), PermissionType::Messages, "warn", 100.0, RiskLevel::Critical)
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let id = prompt_id(&b);
        assert!(!task.await.unwrap()); // timed out, denied
        assert!(!b.resolve(&id, true)); // late answer ignored
        assert_eq!(b.total_timed_out(), 1);
        assert_eq!(b.total_approved(), 0);
    }

    #[tokio::test]
    async fn test_unknown_id_is_noop() {
        let b = broker(1_000);
        assert!(!b.resolve("confirm-nope", true));
    }

    #[tokio::test]
    async fn test_prompt_listeners_notified() {
        let b = broker(30);
        let seen = Arc::new(AtomicUsize::new(0));
        let s = seen.clone();
        b.subscribe_prompts("ui", Arc::new(move |prompt| {
            assert_eq!(prompt.permission, PermissionType::Contacts);
            assert!(prompt.request_id.starts_with("confirm-"));
            assert!(!prompt.warning_message.is_empty());
            s.fetch_add(1, Ordering::SeqCst);
        }));
        let _ = b
            .request_confirmation(&game(), PermissionType::Contacts, "warn", 90.0, RiskLevel::Critical)
            .await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(b.unsubscribe_prompts("ui"));
        assert!(!b.unsubscribe_prompts("ui"));
    }

    #[tokio::test]
    async fn test_listener_can_unsubscribe_itself() {
        let b = broker(30);
        let seen = Arc::new(AtomicUsize::new(0));
        let (b2, s) = (b.clone(), seen.clone());
        b.subscribe_prompts("once", Arc::new(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
            b2.unsubscribe_prompts("once");
        }));
        for _ in 0..2 {
            let _ = b
                .request_confirmation(&game(), PermissionType::Contacts, "warn", 90.0, RiskLevel::Critical)
                .await;
        }
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_confirmations_are_independent() {
        let b = broker(5_000);
        let b2 = b.clone();
        let t1 = tokio::spawn({
            let b = b.clone();
            async move {
                b.request_confirmation(&game(), PermissionType::Contacts, "w", 90.0, RiskLevel::Critical)
                    .await
            }
        });
        let t2 = tokio::spawn(async move {
            b2.request_confirmation(
                &App::new("game2", "Racing Game", "car", false),
                PermissionType::Messages,
                "w",
                100.0,
                RiskLevel::Critical,
            )
            .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let pending = b.pending_requests();
        assert_eq!(pending.len(), 2);
        for (id, app, _) in pending {
            b.resolve(&id, app.id == "game1");
        }
        assert!(t1.await.unwrap());
        assert!(!t2.await.unwrap());
    }
}
