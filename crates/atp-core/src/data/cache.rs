// Time-boxed table cache.
//
// Tables are shared immutably behind an `Arc`; a refresh swaps in a fresh
// `Arc` and leaves readers of the old one untouched.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

#[derive(Debug)]
pub struct TimedCache<T> {
    value: Arc<T>,
    loaded_at: DateTime<Utc>,
    ttl: Duration,
}

impl<T> TimedCache<T> {
    pub fn new(value: T, loaded_at: DateTime<Utc>, ttl_secs: u64) -> Self {
        // chrono caps durations at i64::MAX milliseconds.
        let secs = i64::try_from(ttl_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        TimedCache {
            value: Arc::new(value),
            loaded_at,
            ttl: Duration::seconds(secs),
        }
    }

    /// Build the cache by running `loader` once.
    pub fn load<E, F>(ttl_secs: u64, loader: F) -> Result<Self, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        Ok(Self::new(loader()?, Utc::now(), ttl_secs))
    }

    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.value)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        now - self.loaded_at >= self.ttl
    }

    /// Replace the cached value unconditionally.
    pub fn reload<E, F>(&mut self, now: DateTime<Utc>, loader: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.value = Arc::new(loader()?);
        self.loaded_at = now;
        info!("tables reloaded at {}", now.format("%Y-%m-%d %H:%M:%S"));
        Ok(())
    }

    /// Reload when the ttl has elapsed. Returns whether a reload happened.
    ///
    /// On loader failure the old value is kept and the error returned.
    pub fn refresh_if_stale<E, F>(&mut self, now: DateTime<Utc>, loader: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if !self.is_stale_at(now) {
            return Ok(false);
        }
        self.reload(now, loader)?;
        Ok(true)
    }
}
