use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{DashboardError, DashboardResult},
    points::{JitterSettings, WellPoint, WellPointCache},
    rng::SessionRngFactory,
};

pub type SessionId = Uuid;

pub struct Session {
    pub started_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    points: WellPointCache<ChaCha8Rng>,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub idle_timeout: Duration,
    pub max_sessions: usize,
    pub jitter: JitterSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::minutes(30),
            max_sessions: 10_000,
            jitter: JitterSettings::default(),
        }
    }
}

/// Session-scoped state, isolated per session id. Nothing here is shared
/// between sessions except the map that holds them.
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
    rngs: SessionRngFactory,
    settings: SessionSettings,
}

impl SessionStore {
    pub fn new(settings: SessionSettings, seed: Option<u64>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            rngs: SessionRngFactory::new(seed),
            settings,
        }
    }

    /// Resumes `requested` when it is still live, otherwise starts a new
    /// session. Returns the id the caller should keep using.
    pub fn open(&self, requested: Option<SessionId>, now: DateTime<Utc>) -> DashboardResult<SessionId> {
        let mut sessions = self.lock()?;
        if let Some(id) = requested {
            if let Some(session) = sessions.get_mut(&id) {
                session.last_seen = now;
                return Ok(id);
            }
        }

        if sessions.len() >= self.settings.max_sessions {
            evict_idle_locked(&mut sessions, now, self.settings.idle_timeout);
            if sessions.len() >= self.settings.max_sessions {
                return Err(DashboardError::Initialization(format!(
                    "session capacity of {} exhausted",
                    self.settings.max_sessions
                )));
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            Session {
                started_at: now,
                last_seen: now,
                points: WellPointCache::new(self.rngs.next_stream(), self.settings.jitter),
            },
        );
        info!(session = %id, "session started");
        Ok(id)
    }

    /// The session's well points, generated on first request.
    pub fn well_points(&self, id: SessionId) -> DashboardResult<Arc<[WellPoint]>> {
        let mut sessions = self.lock()?;
        let session = sessions.get_mut(&id).ok_or_else(|| {
            DashboardError::Initialization(format!("no storage for session {id}"))
        })?;
        if !session.points.is_generated() {
            debug!(session = %id, "generating well points");
        }
        Ok(session.points.get_well_points())
    }

    pub fn end(&self, id: SessionId) -> DashboardResult<bool> {
        let removed = self.lock()?.remove(&id);
        if let Some(session) = &removed {
            info!(session = %id, started_at = %session.started_at, "session ended");
        }
        Ok(removed.is_some())
    }

    /// Drops every session idle for longer than the configured timeout.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> DashboardResult<usize> {
        let mut sessions = self.lock()?;
        Ok(evict_idle_locked(&mut sessions, now, self.settings.idle_timeout))
    }

    pub fn len(&self) -> DashboardResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> DashboardResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn master_seed(&self) -> u64 {
        self.rngs.master_seed()
    }

    fn lock(&self) -> DashboardResult<MutexGuard<'_, HashMap<SessionId, Session>>> {
        self.sessions
            .lock()
            .map_err(|_| DashboardError::Initialization("session store lock poisoned".into()))
    }
}

fn evict_idle_locked(
    sessions: &mut HashMap<SessionId, Session>,
    now: DateTime<Utc>,
    idle_timeout: Duration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|id, session| {
        let live = now - session.last_seen <= idle_timeout;
        if !live {
            debug!(session = %id, "session expired");
        }
        live
    });
    before - sessions.len()
}
