// Dashboard shell: loaded tables, per-page filter state and command handling.
//
// The shell is synchronous. Every command recomputes the active page from the
// cached tables; the TUI pulls an `AppSnapshot` after each one.

use std::sync::Arc;

use atp_core::config::DashboardConfig;
use atp_core::data::cache::TimedCache;
use atp_core::data::{load_all, DataError, Tables};
use atp_core::pages::{default_pages, Control, Page, PageId, PageView};
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::protocol::{AppSnapshot, UserCommand};

pub struct Dashboard {
    config: DashboardConfig,
    cache: TimedCache<Tables>,
    /// One filter state per page, in `PageId::ALL` order.
    pages: Vec<Box<dyn Page>>,
    active: PageId,
    status: Option<String>,
}

impl Dashboard {
    /// Load every table named in `config` and build fresh page state.
    pub fn load(config: DashboardConfig) -> Result<Self, DataError> {
        let cache = TimedCache::load(config.cache.ttl_secs, || load_all(&config))?;
        Ok(Self::with_cache(config, cache))
    }

    /// Build a dashboard over tables that are already in memory.
    pub fn with_tables(config: DashboardConfig, tables: Tables, loaded_at: DateTime<Utc>) -> Self {
        let cache = TimedCache::new(tables, loaded_at, config.cache.ttl_secs);
        Self::with_cache(config, cache)
    }

    fn with_cache(config: DashboardConfig, cache: TimedCache<Tables>) -> Self {
        let tables = cache.get();
        let pages = default_pages(&tables, &config.defaults);
        Dashboard {
            config,
            cache,
            pages,
            active: PageId::Ratings,
            status: None,
        }
    }

    pub fn active_page(&self) -> PageId {
        self.active
    }

    pub fn tables(&self) -> Arc<Tables> {
        self.cache.get()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.cache.loaded_at()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn page(&self) -> &dyn Page {
        self.pages[self.active.index()].as_ref()
    }

    pub fn controls(&self) -> Vec<Control> {
        self.page().controls(&self.cache.get())
    }

    pub fn view(&self) -> PageView {
        self.page().render(&self.cache.get())
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let tables = self.cache.get();
        AppSnapshot {
            page: self.active,
            controls: self.page().controls(&tables),
            view: self.page().render(&tables),
            loaded_at: self.cache.loaded_at(),
            status: self.status.clone(),
        }
    }

    pub fn handle(&mut self, cmd: UserCommand) {
        match cmd {
            UserCommand::SwitchPage(page) => {
                if page != self.active {
                    info!("switched to page: {:?}", page);
                    self.active = page;
                }
            }
            UserCommand::Control { id, action } => {
                let tables = self.cache.get();
                self.pages[self.active.index()].apply(&tables, id, action);
            }
            UserCommand::Reload => {
                self.reload(Utc::now());
            }
            UserCommand::Quit => {
                info!("quit requested");
            }
        }
    }

    /// Reload every table now. On failure the previous tables stay in use.
    pub fn reload(&mut self, now: DateTime<Utc>) -> bool {
        let config = &self.config;
        match self.cache.reload(now, || load_all(config)) {
            Ok(()) => {
                self.status = Some(format!("Data reloaded at {}", now.format("%H:%M:%S")));
                true
            }
            Err(e) => {
                error!("reload failed: {}", e);
                self.status = Some(format!("Reload failed: {e}"));
                false
            }
        }
    }

    /// Reload when the cache ttl has run out. Returns whether new tables
    /// were swapped in.
    pub fn refresh_if_stale(&mut self, now: DateTime<Utc>) -> bool {
        let config = &self.config;
        match self.cache.refresh_if_stale(now, || load_all(config)) {
            Ok(reloaded) => {
                if reloaded {
                    self.status = Some(format!("Data refreshed at {}", now.format("%H:%M:%S")));
                }
                reloaded
            }
            Err(e) => {
                error!("scheduled reload failed: {}", e);
                self.status = Some(format!("Reload failed: {e}"));
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
