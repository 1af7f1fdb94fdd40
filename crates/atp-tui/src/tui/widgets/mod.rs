// TUI widget modules for each dashboard zone.

pub mod captions;
pub mod chart;
pub mod filters;
pub mod panel_tabs;
pub mod quit_confirm;
pub mod status_bar;

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}
