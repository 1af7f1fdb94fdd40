// Messages between the TUI and the dashboard shell.

use atp_core::pages::{Control, ControlAction, ControlId, PageId, PageView};
use chrono::{DateTime, Utc};

/// Commands produced by key presses and handled by `Dashboard::handle`.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    SwitchPage(PageId),
    Control {
        id: ControlId,
        action: ControlAction,
    },
    /// Reload every table from disk now, ignoring the cache ttl.
    Reload,
    Quit,
}

/// Everything the TUI needs to draw the active page.
#[derive(Debug, Clone)]
pub struct AppSnapshot {
    pub page: PageId,
    pub controls: Vec<Control>,
    pub view: PageView,
    pub loaded_at: DateTime<Utc>,
    /// Last status message (reloads, failures).
    pub status: Option<String>,
}
