use crate::types::{AppError, GeneratedTrip, Result, TripRequest};
use crate::wizard::session::WizardSession;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// In-memory wizard sessions keyed by id. Sessions do not survive a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new session on step 1 and returns a copy of it.
    pub fn create(&self) -> WizardSession {
        let session = WizardSession::new();
        self.sessions.write().insert(session.id, session.clone());
        session
    }

    pub fn get(&self, id: Uuid) -> Result<WizardSession> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Applies `f` to the stored session under the write lock.
    ///
    /// The session's `updated_at` is bumped only when `f` succeeds. Never
    /// hold the lock across an await: async work between two updates goes
    /// through [`GenerationGuard`].
    pub fn update<T, F>(&self, id: Uuid, f: F) -> Result<T>
    where
        F: FnOnce(&mut WizardSession) -> Result<T>,
    {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        let value = f(session)?;
        session.updated_at = Utc::now();
        Ok(value)
    }

    pub fn remove(&self, id: Uuid) -> Option<WizardSession> {
        self.sessions.write().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// An in-flight trip generation for one session.
///
/// [`finish`](Self::finish) stores the plan; dropping the guard without
/// finishing (task panic or cancellation) releases the session's
/// generation flag instead.
pub struct GenerationGuard {
    sessions: SessionStore,
    id: Uuid,
    finished: bool,
}

impl GenerationGuard {
    /// Starts generating for the session and returns its request.
    pub fn begin(sessions: &SessionStore, id: Uuid) -> Result<(Self, TripRequest)> {
        let request = sessions.update(id, |s| s.begin_generation())?;
        let guard = Self {
            sessions: sessions.clone(),
            id,
            finished: false,
        };
        Ok((guard, request))
    }

    pub fn finish(mut self, trip: GeneratedTrip) -> Result<WizardSession> {
        self.finished = true;
        self.sessions.update(self.id, |s| {
            s.finish_generation(trip)?;
            Ok(s.clone())
        })
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!(session = %self.id, "Trip generation abandoned");
        // The session may be gone by now.
        let _ = self.sessions.update(self.id, |s| {
            s.abort_generation();
            Ok(())
        });
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Wizard session {} not found", id))
}
