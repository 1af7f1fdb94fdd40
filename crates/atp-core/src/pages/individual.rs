// Individual stats page: one stat ranked across players, and the same stat
// over time.

use std::collections::BTreeSet;

use serde::Serialize;

use super::ratings::into_series;
use super::{
    apply_choice, apply_to_players, apply_to_selection, apply_top_n, log_filters, top_n_control,
    Control, ControlAction, ControlId, ControlOption, Page, PageId, PageView, Panel,
};
use crate::aggregate::{aggregate, round_to, MetricKind};
use crate::chart::{Bar, BarChart, Chart, LineChart};
use crate::config::{DefaultsConfig, INDIVIDUAL_TOP_N};
use crate::data::coerce::extract_year;
use crate::data::labels::{country_label, stat_metric};
use crate::data::player_stats::{PlayerStatRow, PlayerStatsTable};
use crate::data::{distinct, Tables};
use crate::filter::{CollapsePolicy, Selection};
use crate::ranking::{sort_descending, top_entities, top_n, TopN};

const COUNTRY_POLICY: CollapsePolicy = CollapsePolicy::ExplicitOnly;
const SURFACE_POLICY: CollapsePolicy = CollapsePolicy::CollapseWhenComplete;

/// Time label excluded from the time series.
const CAREER: &str = "career";

pub const SUMMED_CAPTION: &str = "Aces are summed when multiple surfaces are selected.";
pub const WEIGHTED_CAPTION: &str = "Values are a weighted average across the selected surfaces, \
     accounting for matches played. Players with few matches on some surfaces may be skewed.";
pub const DEFAULTS_CAPTION: &str =
    "Showing the default players. Select players or countries to view their stats.";
pub const SPARSE_CAPTION: &str = "Some combinations may not have adequate data for every player. \
     When selecting countries, try filtering by surface for better results.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndividualFilters {
    /// Empty means every player.
    pub players: Vec<String>,
    pub stat: String,
    pub time: String,
    pub countries: Selection,
    pub surfaces: Selection,
    pub top_n: TopN,
    /// Time-series fallback when neither players nor countries narrow it.
    pub default_players: Vec<String>,
}

impl IndividualFilters {
    pub fn new(data: &Tables, defaults: &DefaultsConfig) -> Self {
        let table = &data.player_stats;
        let times = distinct(&table.rows, |r| r.time.as_str());
        let time = if times.contains(&defaults.individual_time) {
            defaults.individual_time.clone()
        } else {
            times.first().cloned().unwrap_or_default()
        };
        IndividualFilters {
            players: Vec::new(),
            stat: distinct(&table.rows, |r| r.stat.as_str())
                .into_iter()
                .next()
                .unwrap_or_default(),
            time,
            countries: Selection::all(),
            surfaces: Selection::all(),
            top_n: defaults.individual_top_n(),
            default_players: defaults.players.clone(),
        }
    }

    pub fn metric(&self) -> MetricKind {
        stat_metric(&self.stat)
    }

    pub fn needs_aggregation(&self) -> bool {
        self.surfaces.is_multi()
    }

    /// Players drawn in the time series, and whether the defaults were used.
    ///
    /// Selected players are unioned with every player of the selected
    /// countries. With neither set, the default players present in the table
    /// are used.
    pub fn line_players(&self, table: &PlayerStatsTable) -> (Vec<String>, bool) {
        let country_players: Vec<String> = match self.countries.concrete() {
            Some(countries) => distinct(
                table.rows.iter().filter(|r| countries.contains(&r.country)),
                |r| r.player.as_str(),
            ),
            None => Vec::new(),
        };

        if !self.players.is_empty() {
            let union: BTreeSet<String> = self
                .players
                .iter()
                .cloned()
                .chain(country_players)
                .collect();
            (union.into_iter().collect(), false)
        } else if !country_players.is_empty() {
            (country_players, false)
        } else {
            let known = distinct(&table.rows, |r| r.player.as_str());
            let defaults = self
                .default_players
                .iter()
                .filter(|p| known.contains(p))
                .cloned()
                .collect();
            (defaults, true)
        }
    }
}

impl Page for IndividualFilters {
    fn id(&self) -> PageId {
        PageId::Individual
    }

    fn controls(&self, data: &Tables) -> Vec<Control> {
        let rows = &data.player_stats.rows;
        let plain = |values: Vec<String>| -> Vec<ControlOption> {
            values.into_iter().map(ControlOption::plain).collect()
        };
        vec![
            Control::multi(
                ControlId::Players,
                "Players",
                plain(distinct(rows, |r| r.player.as_str())),
                &self.players,
                None,
            ),
            Control::select(
                ControlId::Stat,
                "Stat",
                plain(distinct(rows, |r| r.stat.as_str())),
                &self.stat,
            ),
            Control::select(
                ControlId::Time,
                "Time",
                plain(distinct(rows, |r| r.time.as_str())),
                &self.time,
            ),
            Control::multi(
                ControlId::Countries,
                "Countries",
                distinct(rows, |r| r.country.as_str())
                    .into_iter()
                    .map(|c| ControlOption::new(c.clone(), country_label(&c)))
                    .collect(),
                self.countries.labels(),
                Some(COUNTRY_POLICY),
            ),
            Control::multi(
                ControlId::Surfaces,
                "Surfaces",
                plain(distinct(rows, |r| r.surface.as_str())),
                self.surfaces.labels(),
                Some(SURFACE_POLICY),
            ),
            top_n_control(self.top_n, INDIVIDUAL_TOP_N, "Players Displayed"),
        ]
    }

    fn apply(&mut self, data: &Tables, control: ControlId, action: ControlAction) {
        let rows = &data.player_stats.rows;
        match control {
            ControlId::Players => apply_to_players(&mut self.players, action),
            ControlId::Stat => {
                apply_choice(&mut self.stat, action, &distinct(rows, |r| r.stat.as_str()))
            }
            ControlId::Time => {
                apply_choice(&mut self.time, action, &distinct(rows, |r| r.time.as_str()))
            }
            ControlId::Countries => {
                let universe = distinct(rows, |r| r.country.as_str());
                apply_to_selection(&mut self.countries, action, &universe, COUNTRY_POLICY);
            }
            ControlId::Surfaces => {
                let universe = distinct(rows, |r| r.surface.as_str());
                apply_to_selection(&mut self.surfaces, action, &universe, SURFACE_POLICY);
            }
            ControlId::TopN => apply_top_n(&mut self.top_n, action, INDIVIDUAL_TOP_N),
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

/// A bar or time-series point after optional aggregation.
#[derive(Debug, Clone, PartialEq)]
struct StatPoint {
    player: String,
    country: String,
    time: String,
    value: f64,
    matches: f64,
}

/// Merge rows per `key` when surfaces are aggregated; otherwise pass each
/// row through. Rates are rounded to 2 decimals either way.
fn collapse<K, FK>(
    rows: &[&PlayerStatRow],
    kind: MetricKind,
    aggregated: bool,
    key: FK,
) -> Vec<StatPoint>
where
    K: Ord + Clone + std::fmt::Debug,
    FK: Fn(&&PlayerStatRow) -> K + Copy,
{
    let value = |r: &&PlayerStatRow| r.value(kind).unwrap_or(0.0);
    if !aggregated {
        return rows
            .iter()
            .map(|r| StatPoint {
                player: r.player.clone(),
                country: r.country.clone(),
                time: r.time.clone(),
                value: match kind {
                    MetricKind::Rate => round_to(value(r), 2),
                    MetricKind::Count => value(r),
                },
                matches: r.matches,
            })
            .collect();
    }

    // The first row of each group supplies the descriptive fields.
    let groups = crate::aggregate::group_by(rows, key);
    aggregate(rows, key, value, |r| r.matches, kind, 2)
        .into_iter()
        .filter_map(|a| {
            let first = groups.get(&a.key)?.first()?;
            Some(StatPoint {
                player: first.player.clone(),
                country: first.country.clone(),
                time: first.time.clone(),
                value: a.value,
                matches: a.weight,
            })
        })
        .collect()
}

/// Build the bar and time-series panels of the individual stats page.
pub fn render(data: &Tables, filters: &IndividualFilters) -> PageView {
    log_filters(PageId::Individual, filters);
    let table = &data.player_stats;
    let kind = filters.metric();
    let aggregated = filters.needs_aggregation();

    let mut agg_captions = Vec::new();
    if aggregated {
        agg_captions.push(
            match kind {
                MetricKind::Count => SUMMED_CAPTION,
                MetricKind::Rate => WEIGHTED_CAPTION,
            }
            .to_string(),
        );
    }

    PageView {
        page: PageId::Individual,
        panels: vec![
            bar_panel(table, filters, kind, aggregated, agg_captions.clone()),
            line_panel(table, filters, kind, aggregated, agg_captions),
        ],
    }
}

fn y_label(filters: &IndividualFilters, kind: MetricKind) -> String {
    match kind {
        MetricKind::Count => filters.stat.clone(),
        MetricKind::Rate => "Percentage".to_string(),
    }
}

fn bar_panel(
    table: &PlayerStatsTable,
    filters: &IndividualFilters,
    kind: MetricKind,
    aggregated: bool,
    captions: Vec<String>,
) -> Panel {
    let rows: Vec<&PlayerStatRow> = table
        .rows
        .iter()
        .filter(|r| filters.players.is_empty() || filters.players.contains(&r.player))
        .filter(|r| r.stat == filters.stat && r.time == filters.time)
        .filter(|r| filters.countries.matches(&r.country))
        .filter(|r| filters.surfaces.matches(&r.surface))
        .filter(|r| r.value(kind).is_some())
        .collect();

    let mut points = collapse(&rows, kind, aggregated, |r| {
        (r.player.clone(), r.country.clone())
    });
    sort_descending(&mut points, |p| p.value);
    let ranked = top_n(points, filters.top_n, |p| p.value);
    let show_country = filters.countries.concrete().is_some();

    let bars: Vec<Bar> = ranked
        .into_iter()
        .map(|p| {
            let mut details = vec![("Matches".to_string(), format!("{}", p.matches))];
            if show_country {
                details.push(("Country".to_string(), p.country));
            }
            Bar {
                label: p.player,
                value: p.value,
                details,
            }
        })
        .collect();

    let chart = (!bars.is_empty()).then(|| {
        Chart::Bar(BarChart {
            title: format!("{} by Player", filters.stat),
            x_label: "Player".to_string(),
            y_label: y_label(filters, kind),
            bars,
            decimals: match kind {
                MetricKind::Count => 0,
                MetricKind::Rate => 2,
            },
        })
    });
    Panel::new("Individual Stats", chart, captions)
}

fn line_panel(
    table: &PlayerStatsTable,
    filters: &IndividualFilters,
    kind: MetricKind,
    aggregated: bool,
    mut captions: Vec<String>,
) -> Panel {
    let (players, defaults_applied) = filters.line_players(table);
    let rows: Vec<&PlayerStatRow> = table
        .rows
        .iter()
        .filter(|r| r.stat == filters.stat)
        .filter(|r| filters.surfaces.matches(&r.surface))
        .filter(|r| r.time != CAREER)
        .filter(|r| players.contains(&r.player))
        .filter(|r| r.value(kind).is_some())
        .collect();

    let points = collapse(&rows, kind, aggregated, |r| {
        (r.player.clone(), r.time.clone(), r.country.clone())
    });
    let points = top_entities(
        points,
        filters.top_n,
        |p| p.player.clone(),
        |p| p.value,
        |p| p.matches,
        kind,
    );

    if defaults_applied {
        captions.insert(0, DEFAULTS_CAPTION.to_string());
    }
    if filters.countries.concrete().is_some() {
        captions.push(SPARSE_CAPTION.to_string());
    }

    let series_points: Vec<(String, f64, f64)> = points
        .into_iter()
        .filter_map(|p| extract_year(&p.time).map(|y| (p.player, f64::from(y), p.value)))
        .collect();
    let chart = (!series_points.is_empty()).then(|| {
        Chart::Line(LineChart {
            title: format!("{} Over Time", filters.stat),
            x_label: "Time".to_string(),
            y_label: y_label(filters, kind),
            series: into_series(series_points),
        })
    });
    Panel::new("Individual Stats Over Time", chart, captions)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
