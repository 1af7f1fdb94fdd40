// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the active page of the dashboard
// shell. Key presses either mutate `ViewState` locally (focus, cursor, panel,
// search) or produce a `UserCommand`; after each command the shell's
// snapshot is applied and the next render tick redraws.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use atp_core::pages::{Control, ControlOption, PageId, PageView, Panel};
use chrono::{DateTime, Utc};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::{info, warn};

use crate::app::Dashboard;
use crate::protocol::{AppSnapshot, UserCommand};

use layout::{build_layout, AppLayout};

/// How often the loop checks whether the cached tables have expired.
const STALE_CHECK_INTERVAL: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: what the shell last reported plus navigation state.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub page: PageId,
    /// Index of the visible sub-panel of the active page.
    pub panel: usize,
    /// Index of the focused control.
    pub focus: usize,
    /// Option cursor within the focused control's visible options.
    pub cursor: usize,
    pub search_mode: bool,
    /// Narrows the focused control's options by case-insensitive substring.
    pub search_text: String,
    pub confirm_quit: bool,
    pub controls: Vec<Control>,
    pub view: Option<PageView>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            page: PageId::Ratings,
            panel: 0,
            focus: 0,
            cursor: 0,
            search_mode: false,
            search_text: String::new(),
            confirm_quit: false,
            controls: Vec::new(),
            view: None,
            loaded_at: None,
            status: None,
        }
    }
}

impl ViewState {
    /// Apply a snapshot from the dashboard shell.
    ///
    /// Switching page resets panel, focus, cursor and search; otherwise the
    /// navigation state is only clamped to the new controls.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        if snapshot.page != self.page {
            self.page = snapshot.page;
            self.panel = 0;
            self.focus = 0;
            self.clear_search();
        }
        self.controls = snapshot.controls;
        self.view = Some(snapshot.view);
        self.loaded_at = Some(snapshot.loaded_at);
        self.status = snapshot.status;
        self.clamp();
    }

    pub fn focused_control(&self) -> Option<&Control> {
        self.controls.get(self.focus)
    }

    /// Options of the focused control that match the search text.
    pub fn visible_options(&self) -> Vec<&ControlOption> {
        match self.focused_control() {
            Some(control) => matching_options(control, &self.search_text),
            None => Vec::new(),
        }
    }

    pub fn panel_count(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.panels.len())
    }

    pub fn active_panel(&self) -> Option<&Panel> {
        self.view.as_ref().and_then(|v| v.panels.get(self.panel))
    }

    pub fn clear_search(&mut self) {
        self.search_mode = false;
        self.search_text.clear();
        self.cursor = 0;
    }

    /// Keep focus, cursor and panel inside their current bounds.
    pub fn clamp(&mut self) {
        self.focus = self.focus.min(self.controls.len().saturating_sub(1));
        self.panel = self.panel.min(self.panel_count().saturating_sub(1));
        self.cursor = self.cursor.min(self.visible_options().len().saturating_sub(1));
    }
}

/// Options of `control` whose label contains `search` (case-insensitive).
pub fn matching_options<'a>(control: &'a Control, search: &str) -> Vec<&'a ControlOption> {
    let needle = search.to_lowercase();
    control
        .options
        .iter()
        .filter(|o| needle.is_empty() || o.label.to_lowercase().contains(&needle))
        .collect()
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::panel_tabs::render(frame, layout.panel_tabs, state);
    widgets::filters::render(frame, layout.filters, state);
    widgets::chart::render(frame, layout.chart, state.active_panel());
    widgets::captions::render(frame, layout.captions, state.active_panel());
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = if state.search_mode {
        " Search: type to narrow | Enter:Keep | Esc:Cancel"
    } else {
        " q:Quit | 1-3:Pages | Tab:Panel | \u{2191}\u{2193}:Control | \u{2190}\u{2192}:Option | Space:Select | x:Clear | +/-:Step | /:Search | r:Reload"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits.
///
/// Keyboard events, a ~30 fps render tick and a cache-staleness tick are
/// multiplexed on the current task. The terminal is restored on exit and by
/// a panic hook.
pub async fn run(mut dashboard: Dashboard) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    view_state.apply_snapshot(dashboard.snapshot());

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut stale_tick = tokio::time::interval(STALE_CHECK_INTERVAL);
    stale_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            dashboard.handle(cmd);
                            if quit {
                                break;
                            }
                            view_state.apply_snapshot(dashboard.snapshot());
                        }
                    }
                    Some(Ok(_)) => {
                        // Resize and mouse events: the next tick redraws.
                    }
                    Some(Err(e)) => {
                        warn!("terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = stale_tick.tick() => {
                if dashboard.refresh_if_stale(Utc::now()) {
                    view_state.apply_snapshot(dashboard.snapshot());
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    info!("terminal restored");

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
