//! Per-session data stored with tower-sessions

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppResult;

/// Session key of the home page visit counter
pub const SESSION_NUM_VISITS_KEY: &str = "catalog:num_visits";

/// Home page visits made in the current session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVisits(pub u64);

impl SessionVisits {
    /// Visits recorded so far (0 for a new session)
    pub async fn get(session: &Session) -> AppResult<u64> {
        let visits: Option<SessionVisits> = session.get(SESSION_NUM_VISITS_KEY).await?;
        Ok(visits.unwrap_or_default().0)
    }

    /// Count this visit; returns the number of visits before it
    pub async fn record(session: &Session) -> AppResult<u64> {
        let previous = Self::get(session).await?;
        session
            .insert(SESSION_NUM_VISITS_KEY, SessionVisits(previous + 1))
            .await?;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        let store = Arc::new(MemoryStore::default());
        Session::new(None, store, None)
    }

    #[tokio::test]
    async fn test_first_visit_reports_zero() {
        let session = session();
        assert_eq!(SessionVisits::record(&session).await.unwrap(), 0);
        assert_eq!(SessionVisits::get(&session).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_visits_accumulate() {
        let session = session();
        for expected in 0..3 {
            assert_eq!(SessionVisits::record(&session).await.unwrap(), expected);
        }
    }
}
