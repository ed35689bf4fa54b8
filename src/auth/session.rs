use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use crate::auth::CredentialStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedOut,
}

/// Application-level session manager. The transport reports authorization
/// failures here instead of reaching into shared globals; anything that
/// cares about sign-out (a router, the CLI) subscribes to the event
/// stream.
pub struct AuthSession {
    credentials: Arc<dyn CredentialStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthSession {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { credentials, events }
    }

    pub fn token(&self) -> Option<String> {
        self.credentials.token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&self, token: &str) {
        self.credentials.set_token(token);
    }

    pub fn sign_out(&self) {
        self.credentials.clear_token();
        // Nobody listening is fine; the token is already gone.
        let _ = self.events.send(SessionEvent::SignedOut);
    }

    /// Entry point for the transport: any 401 ends the session globally.
    pub fn handle_unauthorized(&self) {
        info!("Backend rejected credentials, signing out");
        self.sign_out();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
