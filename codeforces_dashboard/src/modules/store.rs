use crate::types::records::UserRecord;
use codeforces_dashboard_libs::{ClientError, RatedListSource};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Memoized holder of the enriched user list.
///
/// The lock is held across the upstream fetch, so concurrent readers on a
/// cold cache await the one in-flight request instead of racing their own.
/// Failed fetches are never cached; the next call retries.
pub struct Leaderboard<S> {
    source: S,
    cache: Mutex<Option<Arc<Vec<UserRecord>>>>,
}

impl<S> Leaderboard<S>
where
    S: RatedListSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    /// Returns the enriched user list, fetching it on the first call and
    /// serving the cached value afterwards.
    pub async fn users(&self) -> Result<Arc<Vec<UserRecord>>, ClientError> {
        let mut cache = self.cache.lock().await;
        if let Some(users) = cache.as_ref() {
            return Ok(Arc::clone(users));
        }

        let raw = self.source.rated_list().await?;
        let users: Arc<Vec<UserRecord>> =
            Arc::new(raw.into_iter().map(UserRecord::from).collect());
        tracing::info!("{} enriched user records cached.", users.len());
        *cache = Some(Arc::clone(&users));

        Ok(users)
    }

    /// Drops the cached list; the next reader fetches again.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
        tracing::info!("Cached user list invalidated.");
    }

    /// True once a non-empty list has been fetched and cached.
    pub async fn is_ready(&self) -> bool {
        self.cache
            .lock()
            .await
            .as_ref()
            .map_or(false, |users| !users.is_empty())
    }
}
