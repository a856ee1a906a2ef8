use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::models::{Role, Tenant};

/// The signed-in identity, as returned by `GET /auth/self`.
///
/// `id` and `role` are required, so a payload without them never becomes
/// a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Tenant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Session {
    pub fn new(id: i64, role: Role) -> Self {
        Self {
            id,
            role,
            tenant: None,
            first_name: None,
            last_name: None,
            email: None,
        }
    }

    pub fn tenant_id(&self) -> Option<i64> {
        self.tenant.as_ref().map(|t| t.id)
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self
                .email
                .clone()
                .unwrap_or_else(|| format!("user #{}", self.id)),
        }
    }
}

/// Holder of the current session.
///
/// Cloning shares the same underlying value. Subscribers receive every
/// `set_session`/`clear_session`, including clears of an already empty
/// store.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn set_session(&self, session: Session) {
        debug!(user_id = session.id, role = %session.role, "Session set");
        self.tx.send_replace(Some(session));
    }

    pub fn clear_session(&self) {
        debug!("Session cleared");
        self.tx.send_replace(None);
    }

    pub fn get_session(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Receiver that wakes on every change after this call.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}
