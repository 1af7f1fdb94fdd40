// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Panel Tabs (1 row)                                |
// +-----------------+--------------------------------+
// | Filters (30%)   | Chart (fill)                   |
// |                 +--------------------------------+
// |                 | Captions (5 rows)              |
// +-----------------+--------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows reserved under the chart for advisory captions.
const CAPTION_HEIGHT: u16 = 5;

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Page tabs, data timestamp and status message.
    pub status_bar: Rect,
    /// Sub-panel titles of the active page.
    pub panel_tabs: Rect,
    /// Left column: the active page's controls.
    pub filters: Rect,
    pub chart: Rect,
    pub captions: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | panel tabs(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(vertical[2]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(CAPTION_HEIGHT)])
        .split(horizontal[1]);

    AppLayout {
        status_bar: vertical[0],
        panel_tabs: vertical[1],
        filters: horizontal[0],
        chart: right[0],
        captions: right[1],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
