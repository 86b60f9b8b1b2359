//! User prompt requests
//!
//! Permission and screen-capture consent prompts are issued with a
//! correlation token and resolved exactly once by the UI side.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::traits::PermissionKind;

/// Correlation token for one prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestToken(Uuid);

impl RequestToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A prompt the UI should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub token: RequestToken,
    pub kind: PermissionKind,
}

/// Caller side of an issued prompt
#[derive(Debug)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub response: oneshot::Receiver<bool>,
}

impl PendingRequest {
    /// Wait for the answer; a dropped or cancelled request counts as denied
    pub async fn granted(self) -> bool {
        self.response.await.unwrap_or(false)
    }
}

/// Routes prompt requests to the UI and answers back to callers
pub struct RequestBroker {
    pending: Mutex<HashMap<RequestToken, oneshot::Sender<bool>>>,
    prompts: mpsc::UnboundedSender<PromptRequest>,
}

impl RequestBroker {
    /// Create a broker and the stream of prompts the UI must answer
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PromptRequest>) {
        let (prompts, rx) = mpsc::unbounded_channel();
        let broker = Self {
            pending: Mutex::new(HashMap::new()),
            prompts,
        };
        (broker, rx)
    }

    /// Issue a prompt
    pub fn issue(&self, kind: PermissionKind) -> PendingRequest {
        let token = RequestToken::new();
        let (tx, response) = oneshot::channel();
        self.pending.lock().insert(token, tx);

        if self.prompts.send(PromptRequest { token, kind }).is_err() {
            // No UI listening; the sender is dropped and the request reads as denied
            tracing::warn!("No prompt listener for {:?} request", kind);
            self.pending.lock().remove(&token);
        } else {
            tracing::debug!("Issued {:?} prompt {:?}", kind, token);
        }

        PendingRequest { token, response }
    }

    /// Answer a prompt. Returns false for unknown or already-answered tokens.
    pub fn resolve(&self, token: RequestToken, granted: bool) -> bool {
        let Some(tx) = self.pending.lock().remove(&token) else {
            tracing::debug!("Ignoring response for unknown prompt {:?}", token);
            return false;
        };
        tx.send(granted).is_ok()
    }

    /// Drop every outstanding prompt; waiting callers see a denial
    pub fn cancel_all(&self) {
        self.pending.lock().clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let (broker, mut prompts) = RequestBroker::new();
        let pending = broker.issue(PermissionKind::RecordAudio);

        let prompt = prompts.recv().await.unwrap();
        assert_eq!(prompt.kind, PermissionKind::RecordAudio);
        assert_eq!(prompt.token, pending.token);

        assert!(broker.resolve(prompt.token, true));
        assert!(pending.granted().await);
        assert_eq!(broker.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_is_single_fire() {
        let (broker, _prompts) = RequestBroker::new();
        let pending = broker.issue(PermissionKind::ScreenCapture);

        assert!(broker.resolve(pending.token, false));
        assert!(!broker.resolve(pending.token, true));
        assert!(!pending.granted().await);
    }

    #[tokio::test]
    async fn test_cancel_reads_as_denied() {
        let (broker, _prompts) = RequestBroker::new();
        let pending = broker.issue(PermissionKind::ScreenCapture);
        broker.cancel_all();
        assert!(!pending.granted().await);
    }

    #[tokio::test]
    async fn test_without_listener_request_is_denied() {
        let (broker, prompts) = RequestBroker::new();
        drop(prompts);
        let pending = broker.issue(PermissionKind::RecordAudio);
        assert_eq!(broker.pending_count(), 0);
        assert!(!pending.granted().await);
    }
}
