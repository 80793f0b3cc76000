//! Shared roster of Waldos.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::Waldo;

use super::client::{Session, WaldoClient};
use super::error::WaldoError;

#[derive(Debug, Default)]
struct RosterState {
    session: Option<Session>,
    waldos: Vec<Waldo>,
}

/// Thread-safe holder of the current session and the Waldos fetched
/// through it.
///
/// A session is started lazily on first use. Each fetch appends to the
/// roster; [`WaldoRoster::clear`] empties it.
#[derive(Clone)]
pub struct WaldoRoster {
    inner: Arc<RwLock<RosterState>>,
    client: WaldoClient,
    preferred_name: Option<String>,
}

impl WaldoRoster {
    /// Create an empty roster. `preferred_name` is the name asked for when
    /// the session starts.
    pub fn new(client: WaldoClient, preferred_name: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RosterState::default())),
            client,
            preferred_name,
        }
    }

    /// The current session, starting one if needed.
    pub async fn ensure_session(&self) -> Result<Session, WaldoError> {
        if let Some(session) = self.session().await {
            return Ok(session);
        }

        let session = self
            .client
            .init_session(self.preferred_name.as_deref())
            .await?;

        let mut guard = self.inner.write().await;
        // Another request may have started one while we waited.
        let session = guard.session.get_or_insert(session).clone();
        info!(name = %session.name, "Waldo session ready");
        Ok(session)
    }

    /// The current session, if one has been started.
    pub async fn session(&self) -> Option<Session> {
        let guard = self.inner.read().await;
        guard.session.clone()
    }

    /// Fetch `count` more Waldos and add them to the roster.
    ///
    /// Returns the whole roster after the fetch.
    pub async fn fetch(&self, count: u32) -> Result<Vec<Waldo>, WaldoError> {
        let session = self.ensure_session().await?;
        let fetched = self.client.get_waldos(&session, count).await?;
        info!(requested = count, received = fetched.len(), "fetched Waldos");
        Ok(self.extend(fetched).await)
    }

    /// Add Waldos to the roster, returning the whole roster.
    pub async fn extend(&self, waldos: impl IntoIterator<Item = Waldo>) -> Vec<Waldo> {
        let mut guard = self.inner.write().await;
        guard.waldos.extend(waldos);
        guard.waldos.clone()
    }

    /// All Waldos fetched so far.
    pub async fn waldos(&self) -> Vec<Waldo> {
        let guard = self.inner.read().await;
        guard.waldos.clone()
    }

    /// The most recently fetched Waldo with the given name.
    pub async fn find(&self, name: &str) -> Option<Waldo> {
        let guard = self.inner.read().await;
        guard.waldos.iter().rev().find(|w| w.is_named(name)).cloned()
    }

    /// Forget all fetched Waldos. The session is kept.
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        guard.waldos.clear();
    }

    /// Messages waiting for this session.
    pub async fn messages(&self) -> Result<Vec<String>, WaldoError> {
        let session = self.session().await.ok_or(WaldoError::NoSession)?;
        self.client.get_messages(&session).await
    }
}
