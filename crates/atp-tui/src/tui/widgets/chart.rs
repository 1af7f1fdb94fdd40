// Chart area: draws the active panel's chart description.
//
// Line and scatter charts become a ratatui `Chart` with one dataset per
// player (plus the trendline); bar charts become a horizontal `BarChart`
// with the exact value as text and the detail fields in the label.

use atp_core::chart::{BarChart as BarModel, Chart as ChartModel, Series, Trendline};
use atp_core::pages::{Panel, NO_DATA};
use ratatui::layout::{Constraint, Direction, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
};
use ratatui::Frame;

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
    Color::White,
    Color::LightGreen,
];

pub fn series_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

pub fn render(frame: &mut Frame, area: Rect, panel: Option<&Panel>) {
    let Some(panel) = panel else {
        render_message(frame, area, "Chart", "Loading...");
        return;
    };
    let Some(model) = &panel.chart else {
        render_message(frame, area, &panel.title, panel.notice.as_deref().unwrap_or(NO_DATA));
        return;
    };
    let Some(bounds) = model.bounds() else {
        render_message(frame, area, &panel.title, NO_DATA);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", model.title()));

    match model {
        ChartModel::Line(line) => {
            let axes = Axes::new(bounds, None, 0);
            render_xy(
                frame,
                area,
                block,
                &axes,
                &line.x_label,
                &line.y_label,
                &line.series,
                None,
                GraphType::Line,
            );
        }
        ChartModel::Scatter(scatter) => {
            let axes = Axes::new(bounds, scatter.trendline.as_ref(), 1);
            render_xy(
                frame,
                area,
                block,
                &axes,
                &scatter.x_label,
                &scatter.y_label,
                &scatter.series,
                scatter.trendline.as_ref(),
                GraphType::Scatter,
            );
        }
        ChartModel::Bar(bars) => render_bars(frame, area, block, bars),
    }
}

fn render_message(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Line / scatter
// ---------------------------------------------------------------------------

/// Padded axis bounds plus the precision of the x tick labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub x_decimals: usize,
}

impl Axes {
    /// Bounds from the data points, widened to include the trendline.
    pub fn new(
        (x0, x1, y0, y1): (f64, f64, f64, f64),
        trendline: Option<&Trendline>,
        x_decimals: usize,
    ) -> Self {
        let (mut y0, mut y1) = (y0, y1);
        if let Some(t) = trendline {
            for (_, y) in t.endpoints() {
                y0 = y0.min(y);
                y1 = y1.max(y);
            }
        }
        Axes {
            x: pad(x0, x1),
            y: pad(y0, y1),
            x_decimals,
        }
    }
}

/// Widen `[lo, hi]` by 5% on each side, or by 1 when it is a single value.
pub fn pad(lo: f64, hi: f64) -> [f64; 2] {
    let span = hi - lo;
    if span.abs() < 1e-9 {
        [lo - 1.0, hi + 1.0]
    } else {
        [lo - span * 0.05, hi + span * 0.05]
    }
}

/// Low, middle and high tick labels.
pub fn tick_labels(bounds: [f64; 2], decimals: usize) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| format!("{:.*}", decimals, v))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn render_xy(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    axes: &Axes,
    x_label: &str,
    y_label: &str,
    series: &[Series],
    trendline: Option<&Trendline>,
    graph_type: GraphType,
) {
    let trend_points: Vec<(f64, f64)> = trendline.map(|t| t.endpoints().to_vec()).unwrap_or_default();
    let marker = match graph_type {
        GraphType::Scatter => Marker::Dot,
        _ => Marker::Braille,
    };

    let mut datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Dataset::default()
                .name(s.name.clone())
                .marker(marker)
                .graph_type(graph_type)
                .style(Style::default().fg(series_color(i)))
                .data(&s.points)
        })
        .collect();
    if !trend_points.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Trendline")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Red))
                .data(&trend_points),
        );
    }

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(x_label.to_string())
                .style(Style::default().fg(Color::Gray))
                .bounds(axes.x)
                .labels(tick_labels(axes.x, axes.x_decimals)),
        )
        .y_axis(
            Axis::default()
                .title(y_label.to_string())
                .style(Style::default().fg(Color::Gray))
                .bounds(axes.y)
                .labels(tick_labels(axes.y, 1)),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    frame.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// Bar heights are integers; scale by the display precision so that
/// fractional values (index rates) keep their ordering and proportions.
pub fn scaled_value(value: f64, decimals: usize) -> u64 {
    let scale = 10f64.powi(decimals.min(9) as i32);
    (value * scale).round().max(0.0) as u64
}

/// Bar label with the detail fields appended, e.g.
/// "Rafael Nadal  Win 520 / Loss 60 / Titles 65".
pub fn bar_label(label: &str, details: &[(String, String)]) -> String {
    if details.is_empty() {
        return label.to_string();
    }
    let extra: Vec<String> = details.iter().map(|(k, v)| format!("{k} {v}")).collect();
    format!("{}  {}", label, extra.join(" / "))
}

fn render_bars(frame: &mut Frame, area: Rect, block: Block, model: &BarModel) {
    let bars: Vec<Bar> = model
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::default()
                .value(scaled_value(b.value, model.decimals))
                .label(Line::from(bar_label(&b.label, &b.details)))
                .text_value(format!("{:.*}", model.decimals, b.value))
                .style(Style::default().fg(series_color(i)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(Color::Black).bg(Color::Gray))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
