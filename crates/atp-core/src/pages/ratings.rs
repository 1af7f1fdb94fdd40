// Ratings page: ATP serve / return / under-pressure ratings over time, and
// how strongly one stat tracks the rating.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    apply_choice, apply_to_players, apply_to_selection, log_filters, Control, ControlAction,
    ControlId, ControlOption, Page, PageId, PageView, Panel,
};
use crate::aggregate::{aggregate, MetricKind};
use crate::chart::{ols, Chart, LineChart, ScatterChart, Series};
use crate::config::DefaultsConfig;
use crate::data::labels::{RatingKind, RatingStat};
use crate::data::ratings::{RatingRow, RatingsTable};
use crate::data::{distinct, Tables};
use crate::filter::{CollapsePolicy, Selection};

const SURFACE_POLICY: CollapsePolicy = CollapsePolicy::ExplicitOnly;
const VS_RANK_POLICY: CollapsePolicy = CollapsePolicy::ExplicitOnly;

pub const AGGREGATED_CAPTION: &str =
    "Ratings are averaged across the selected surfaces and opponent ranks.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingsFilters {
    pub metric: RatingKind,
    /// Empty means every player.
    pub players: Vec<String>,
    pub surface: Selection,
    pub vs_rank: Selection,
    /// `None` when the table carries none of the metric's stat columns.
    pub stat: Option<RatingStat>,
}

impl RatingsFilters {
    pub fn new(data: &Tables, defaults: &DefaultsConfig) -> Self {
        let metric = RatingKind::Serve;
        let table = data.ratings(metric);
        let known = players(table);
        RatingsFilters {
            metric,
            players: defaults
                .players
                .iter()
                .filter(|p| known.contains(p))
                .cloned()
                .collect(),
            surface: Selection::all(),
            vs_rank: Selection::all(),
            stat: first_stat(table),
        }
    }

    /// True when a sentinel dimension holds several concrete labels.
    pub fn needs_aggregation(&self) -> bool {
        self.surface.is_multi() || self.vs_rank.is_multi()
    }

    /// Rows passing the surface, opponent-rank and player filters.
    pub fn filter_rows<'a>(&self, table: &'a RatingsTable) -> Vec<&'a RatingRow> {
        table
            .rows
            .iter()
            .filter(|r| self.surface.matches(&r.surface))
            .filter(|r| self.vs_rank.matches(&r.vs_rank))
            .filter(|r| self.players.is_empty() || self.players.contains(&r.player))
            .collect()
    }
}

fn players(table: &RatingsTable) -> Vec<String> {
    distinct(&table.rows, |r| r.player.as_str())
}

fn first_stat(table: &RatingsTable) -> Option<RatingStat> {
    table
        .kind
        .stats()
        .iter()
        .copied()
        .find(|s| table.has_stat(*s))
}

fn available_stats(table: &RatingsTable) -> Vec<RatingStat> {
    table
        .kind
        .stats()
        .iter()
        .copied()
        .filter(|s| table.has_stat(*s))
        .collect()
}

impl Page for RatingsFilters {
    fn id(&self) -> PageId {
        PageId::Ratings
    }

    fn controls(&self, data: &Tables) -> Vec<Control> {
        let table = data.ratings(self.metric);
        let plain = |values: Vec<String>| -> Vec<ControlOption> {
            values.into_iter().map(ControlOption::plain).collect()
        };

        vec![
            Control::select(
                ControlId::Metric,
                "Metric",
                RatingKind::ALL
                    .iter()
                    .map(|k| ControlOption::new(k.column(), k.label()))
                    .collect(),
                self.metric.column(),
            ),
            Control::multi(
                ControlId::Players,
                "Players",
                plain(players(table)),
                &self.players,
                None,
            ),
            Control::multi(
                ControlId::Surface,
                "Surface",
                plain(distinct(&table.rows, |r| r.surface.as_str())),
                self.surface.labels(),
                Some(SURFACE_POLICY),
            ),
            Control::multi(
                ControlId::VsRank,
                "Vs Rank",
                plain(distinct(&table.rows, |r| r.vs_rank.as_str())),
                self.vs_rank.labels(),
                Some(VS_RANK_POLICY),
            ),
            Control {
                selected: self.stat.iter().map(|s| s.column().to_string()).collect(),
                ..Control::select(
                    ControlId::Stat,
                    "Stat",
                    available_stats(table)
                        .into_iter()
                        .map(|s| ControlOption::new(s.column(), s.label()))
                        .collect(),
                    "",
                )
            },
        ]
    }

    fn apply(&mut self, data: &Tables, control: ControlId, action: ControlAction) {
        let table = data.ratings(self.metric);
        match control {
            ControlId::Metric => {
                if let ControlAction::Choose(raw) | ControlAction::Toggle(raw) = action {
                    if let Some(kind) = RatingKind::parse(&raw) {
                        if kind != self.metric {
                            self.metric = kind;
                            self.stat = first_stat(data.ratings(kind));
                        }
                    }
                }
            }
            ControlId::Players => apply_to_players(&mut self.players, action),
            ControlId::Surface => {
                let universe = distinct(&table.rows, |r| r.surface.as_str());
                apply_to_selection(&mut self.surface, action, &universe, SURFACE_POLICY);
            }
            ControlId::VsRank => {
                let universe = distinct(&table.rows, |r| r.vs_rank.as_str());
                apply_to_selection(&mut self.vs_rank, action, &universe, VS_RANK_POLICY);
            }
            ControlId::Stat => {
                let options: Vec<String> = available_stats(table)
                    .into_iter()
                    .map(|s| s.column().to_string())
                    .collect();
                let mut current = self.stat.map(|s| s.column().to_string()).unwrap_or_default();
                apply_choice(&mut current, action, &options);
                self.stat = RatingStat::parse(&current);
            }
            _ => {}
        }
    }

    fn render(&self, data: &Tables) -> PageView {
        render(data, self)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Build both panels of the ratings page.
pub fn render(data: &Tables, filters: &RatingsFilters) -> PageView {
    log_filters(PageId::Ratings, filters);
    let table = data.ratings(filters.metric);
    let rows = filters.filter_rows(table);

    PageView {
        page: PageId::Ratings,
        panels: vec![line_panel(filters, &rows), scatter_panel(filters, &rows)],
    }
}

fn line_panel(filters: &RatingsFilters, rows: &[&RatingRow]) -> Panel {
    let metric = filters.metric;
    let dated: Vec<(&str, f64, f64)> = rows
        .iter()
        .filter_map(|r| r.year.map(|y| (r.player.as_str(), f64::from(y), r.rating)))
        .collect();

    let mut captions = Vec::new();
    let points: Vec<(String, f64, f64)> = if filters.needs_aggregation() {
        captions.push(AGGREGATED_CAPTION.to_string());
        // No match counts in the ratings files: unit weights.
        aggregate(
            &dated,
            |r| (r.0.to_string(), r.1 as i64),
            |r| r.2,
            |_| 1.0,
            MetricKind::Rate,
            2,
        )
        .into_iter()
        .map(|a| (a.key.0, a.key.1 as f64, a.value))
        .collect()
    } else {
        dated
            .iter()
            .map(|(p, x, y)| (p.to_string(), *x, *y))
            .collect()
    };

    let chart = (!points.is_empty()).then(|| {
        Chart::Line(LineChart {
            title: metric.line_title().to_string(),
            x_label: "Year".to_string(),
            y_label: metric.axis_label().to_string(),
            series: into_series(points),
        })
    });
    Panel::new("Ratings Over Time", chart, captions)
}

fn scatter_panel(filters: &RatingsFilters, rows: &[&RatingRow]) -> Panel {
    let metric = filters.metric;
    let Some(stat) = filters.stat else {
        return Panel::new("Stat Correlations", None, Vec::new());
    };

    let points: Vec<(String, f64, f64)> = rows
        .iter()
        .filter_map(|r| r.stats.get(&stat).map(|x| (r.player.clone(), *x, r.rating)))
        .collect();
    let all_points: Vec<(f64, f64)> = points.iter().map(|(_, x, y)| (*x, *y)).collect();
    let trendline = ols(&all_points);

    let chart = (!points.is_empty()).then(|| {
        Chart::Scatter(ScatterChart {
            title: format!("{} Vs {}", metric.axis_label(), stat.label()),
            x_label: stat.label().to_string(),
            y_label: metric.axis_label().to_string(),
            series: into_series(points),
            trendline,
        })
    });
    Panel::new("Stat Correlations", chart, Vec::new())
}

/// One series per player, points sorted by x.
pub(crate) fn into_series(points: Vec<(String, f64, f64)>) -> Vec<Series> {
    let mut by_player: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for (player, x, y) in points {
        by_player.entry(player).or_default().push((x, y));
    }
    by_player
        .into_iter()
        .map(|(name, mut points)| {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            Series { name, points }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
