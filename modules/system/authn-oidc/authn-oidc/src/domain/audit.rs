//! Audit log adapters.

use async_trait::async_trait;
use authn_oidc_sdk::{AuditEvent, AuditLog};
use tokio::sync::mpsc;

/// Target used for audit records emitted through `tracing`.
pub const AUDIT_TARGET: &str = "authn_oidc::audit";

/// Writes each audit event as one structured `tracing` record.
///
/// Successes are logged at `info`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn log(&self, event: AuditEvent) {
        let webservice = format!("{}/{}", event.authenticator_name, event.service_id);
        let username = event.username.as_deref().unwrap_or("");

        match &event.failure {
            None => tracing::info!(
                target: AUDIT_TARGET,
                account = %event.account,
                webservice = %webservice,
                username = %username,
                client_ip = %event.client_ip,
                success = true,
                "authentication succeeded"
            ),
            Some(failure) => tracing::warn!(
                target: AUDIT_TARGET,
                account = %event.account,
                webservice = %webservice,
                username = %username,
                client_ip = %event.client_ip,
                success = false,
                error_kind = %failure.kind,
                error = %failure.message,
                "authentication failed"
            ),
        }
    }
}

/// Forwards audit events to an in-process consumer over an unbounded channel.
///
/// Never blocks the pipeline. Once the receiver is gone, events are dropped
/// with a warning.
#[derive(Debug, Clone)]
pub struct ChannelAuditLog {
    tx: mpsc::UnboundedSender<AuditEvent>,
}

impl ChannelAuditLog {
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<AuditEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AuditEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl AuditLog for ChannelAuditLog {
    async fn log(&self, event: AuditEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::warn!(
                account = %e.0.account,
                success = e.0.success,
                "Audit receiver closed, dropping event"
            );
        }
    }
}
