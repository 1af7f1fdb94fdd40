// Advisory captions under the chart (aggregation, defaults, sparsity).

use atp_core::pages::Panel;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(frame: &mut Frame, area: Rect, panel: Option<&Panel>) {
    let lines = panel.map(caption_lines).unwrap_or_default();
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP).title(" Notes "));
    frame.render_widget(paragraph, area);
}

pub fn caption_lines(panel: &Panel) -> Vec<Line<'static>> {
    panel
        .captions
        .iter()
        .map(|c| Line::from(format!("* {c}")))
        .collect()
}
