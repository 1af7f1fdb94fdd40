// Status bar widget: page tabs, data timestamp, last status message.

use atp_core::pages::PageId;
use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Layout: [page tabs] | [loaded timestamp] | [status message]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(tab_spans(state.page));

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        loaded_text(state.loaded_at),
        Style::default().fg(Color::White),
    ));

    if let Some(status) = &state.status {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(status.clone(), Style::default().fg(status_color(status))));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Page tab spans with the active page highlighted.
/// E.g. "[1:Ratings] [2:Individual] [3:Win/Loss]"
pub fn tab_spans(active: PageId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for page in PageId::ALL {
        let style = if page == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}:{}]", page.index() + 1, tab_label(page)),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn tab_label(page: PageId) -> &'static str {
    match page {
        PageId::Ratings => "Ratings",
        PageId::Individual => "Individual",
        PageId::WinLoss => "Win/Loss",
    }
}

pub fn loaded_text(loaded_at: Option<DateTime<Utc>>) -> String {
    match loaded_at {
        Some(at) => format!("Data loaded {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => "Loading data...".to_string(),
    }
}

fn status_color(status: &str) -> Color {
    if status.starts_with("Reload failed") {
        Color::Red
    } else {
        Color::Green
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;
    use chrono::TimeZone;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn tab_spans_cover_every_page() {
        let spans = tab_spans(PageId::Individual);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "[1:Ratings] [2:Individual] [3:Win/Loss] ");
        // Active tab is bold.
        assert!(spans[2].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn loaded_text_formats_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap();
        assert_eq!(loaded_text(Some(at)), "Data loaded 2024-05-01 09:05 UTC");
        assert_eq!(loaded_text(None), "Loading data...");
    }

    #[test]
    fn failures_are_red() {
        assert_eq!(status_color("Reload failed: missing file"), Color::Red);
        assert_eq!(status_color("Data reloaded at 10:00:00"), Color::Green);
    }

    #[test]
    fn render_shows_status_message() {
        let state = ViewState {
            status: Some("Data reloaded at 10:00:00".into()),
            ..ViewState::default()
        };
        let backend = TestBackend::new(120, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("[1:Ratings]"));
        assert!(text.contains("Data reloaded at 10:00:00"));
    }
}
