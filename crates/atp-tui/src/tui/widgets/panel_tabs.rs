// Panel tab strip: the active page's sub-panels, Tab cycles between them.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Tabs;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let tabs = Tabs::new(panel_titles(state))
        .select(state.panel)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, area);
}

pub fn panel_titles(state: &ViewState) -> Vec<String> {
    state
        .view
        .as_ref()
        .map(|v| v.panels.iter().map(|p| p.title.clone()).collect())
        .unwrap_or_default()
}
