// Filter sidebar: every control of the active page, one summary line each.
//
// The focused control is expanded into a scrolling option list with the
// option cursor highlighted; the search line sits above it.

use std::ops::Range;

use atp_core::pages::{Control, ControlKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Never shrink the expanded option list below this many rows.
const MIN_OPTION_ROWS: usize = 3;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let height = usize::from(area.height.saturating_sub(2));
    let paragraph = Paragraph::new(build_lines(state, height)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", state.page.title())),
    );
    frame.render_widget(paragraph, area);
}

pub fn build_lines(state: &ViewState, height: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if state.controls.is_empty() {
        lines.push(Line::from("No filters"));
        return lines;
    }

    let searching = state.search_mode || !state.search_text.is_empty();
    let reserved = state.controls.len() + usize::from(searching);
    let option_rows = height.saturating_sub(reserved).max(MIN_OPTION_ROWS);

    for (i, control) in state.controls.iter().enumerate() {
        let focused = i == state.focus;
        lines.push(header_line(control, focused));
        if !focused {
            continue;
        }

        if let ControlKind::Stepper { min, max } = control.kind {
            lines.push(Line::from(Span::styled(
                format!("    -/+ to change ({min}..{max})"),
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }

        if searching {
            let cursor = if state.search_mode { "_" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("    /{}{}", state.search_text, cursor),
                Style::default().fg(Color::Cyan),
            )));
        }

        let options = state.visible_options();
        if options.is_empty() {
            lines.push(Line::from(Span::styled(
                "    (no matches)",
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }

        for idx in option_window(options.len(), state.cursor, option_rows) {
            let option = options[idx];
            let checked = control.selected.contains(&option.raw);
            let mark = match (control.kind, checked) {
                (ControlKind::SingleSelect, true) => "(*)",
                (ControlKind::SingleSelect, false) => "( )",
                (_, true) => "[x]",
                (_, false) => "[ ]",
            };
            let style = if idx == state.cursor {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("    {} {}", mark, option.label),
                style,
            )));
        }
    }
    lines
}

fn header_line(control: &Control, focused: bool) -> Line<'static> {
    let (marker, style) = if focused {
        (
            "> ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(Color::White))
    };
    Line::from(vec![
        Span::styled(format!("{}{}: ", marker, control.title), style),
        Span::styled(summary(control), Style::default().fg(Color::Gray)),
    ])
}

/// Short description of what the control currently selects.
pub fn summary(control: &Control) -> String {
    match control.kind {
        ControlKind::Stepper { .. } => control
            .value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string()),
        ControlKind::SingleSelect => control
            .selected_label()
            .map(str::to_string)
            .or_else(|| control.selected.first().cloned())
            .unwrap_or_else(|| "-".to_string()),
        ControlKind::MultiSelect { .. } => {
            let labels: Vec<&str> = control
                .selected
                .iter()
                .map(|raw| {
                    control
                        .options
                        .iter()
                        .find(|o| &o.raw == raw)
                        .map_or(raw.as_str(), |o| o.label.as_str())
                })
                .collect();
            match labels.len() {
                0 => "none".to_string(),
                1..=2 => labels.join(", "),
                n => format!("{}, {} +{} more", labels[0], labels[1], n - 2),
            }
        }
    }
}

/// Rows of a `len`-long list to show so that `cursor` stays in view,
/// roughly centered.
pub fn option_window(len: usize, cursor: usize, rows: usize) -> Range<usize> {
    if len <= rows {
        return 0..len;
    }
    let start = cursor.saturating_sub(rows / 2).min(len - rows);
    start..start + rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
