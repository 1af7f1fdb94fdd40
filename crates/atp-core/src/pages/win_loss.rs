// Win/Loss index page: players ranked by share of matches won.

use serde::Serialize;

use super::{
    apply_to_players, apply_to_selection, apply_top_n, log_filters, top_n_control, Control,
    ControlAction, ControlId, ControlOption, Page, PageId, PageView, Panel,
};
use crate::aggregate::{aggregate, group_by, MetricKind};
use crate::chart::{Bar, BarChart, Chart};
use crate::config::{DefaultsConfig, WIN_LOSS_TOP_N};
use crate::data::labels::{country_label, Category, TimePeriod};
use crate::data::win_loss::WinLossRow;
use crate::data::{distinct, Tables};
use crate::filter::{CollapsePolicy, Selection};
use crate::ranking::{sort_descending, top_n, TopN};

const CATEGORY_POLICY: CollapsePolicy = CollapsePolicy::CollapseWhenComplete;
const COUNTRY_POLICY: CollapsePolicy = CollapsePolicy::ExplicitOnly;

pub const INTRO_CAPTION: &str = "The Win/Loss Index is the share of matches won. \
     Selecting multiple categories shows a weighted average.";
pub const MIN_WINS_CAPTION: &str =
    "Use the minimum wins control to hide players with few wins.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinLossFilters {
    pub players: Vec<String>,
    /// Raw category tokens.
    pub categories: Selection,
    pub time_period: TimePeriod,
    pub countries: Selection,
    /// Requested threshold; clamped into the data's range when applied.
    pub min_wins: u32,
    pub top_n: TopN,
    default_min_wins: u32,
}

/// One bar before ranking: a source row, or a player's merged categories.
#[derive(Debug, Clone, PartialEq)]
pub struct WinLossEntry {
    pub player: String,
    pub win: u32,
    pub loss: u32,
    pub titles: u32,
    pub index: f64,
}

impl WinLossFilters {
    pub fn new(data: &Tables, defaults: &DefaultsConfig) -> Self {
        WinLossFilters {
            players: Vec::new(),
            categories: Selection::all(),
            time_period: time_periods(data).first().copied().unwrap_or(TimePeriod::All),
            countries: Selection::all(),
            min_wins: defaults.min_wins,
            top_n: defaults.win_loss_top_n(),
            default_min_wins: defaults.min_wins,
        }
    }

    pub fn needs_grouping(&self) -> bool {
        self.categories.is_multi()
    }

    /// Filtered rows, merged per player when several categories are
    /// selected. The minimum-wins threshold is not applied yet.
    pub fn entries(&self, data: &Tables) -> Vec<WinLossEntry> {
        let rows: Vec<&WinLossRow> = data
            .win_loss
            .rows
            .iter()
            .filter(|r| self.players.is_empty() || self.players.contains(&r.player))
            .filter(|r| self.categories.matches(r.category.raw()))
            .filter(|r| r.time_period == self.time_period)
            .filter(|r| self.countries.matches(&r.country))
            .collect();

        if self.needs_grouping() {
            group_players(&rows)
        } else {
            rows.into_iter()
                .map(|r| WinLossEntry {
                    player: r.player.clone(),
                    win: r.win,
                    loss: r.loss,
                    titles: r.titles,
                    index: r.index,
                })
                .collect()
        }
    }

    /// The requested threshold clamped into `bounds`.
    pub fn effective_min_wins(&self, bounds: (u32, u32)) -> u32 {
        self.min_wins.clamp(bounds.0, bounds.1)
    }
}

/// Sum counts per player and weight the index by decided matches.
fn group_players(rows: &[&WinLossRow]) -> Vec<WinLossEntry> {
    let sums = group_by(rows, |r| r.player.clone());
    aggregate(
        rows,
        |r| r.player.clone(),
        |r| r.index,
        |r| f64::from(r.decisions()),
        MetricKind::Rate,
        3,
    )
    .into_iter()
    .map(|a| {
        let group = sums.get(&a.key).map(Vec::as_slice).unwrap_or(&[]);
        WinLossEntry {
            win: saturating_sum(group.iter().map(|r| r.win)),
            loss: saturating_sum(group.iter().map(|r| r.loss)),
            titles: saturating_sum(group.iter().map(|r| r.titles)),
            index: a.value,
            player: a.key,
        }
    })
    .collect()
}

fn saturating_sum(values: impl Iterator<Item = u32>) -> u32 {
    values.fold(0, u32::saturating_add)
}

/// Range of the minimum-wins stepper: the min and max wins of `entries`, or
/// `(0, 1)` when there are none.
pub fn min_wins_bounds(entries: &[WinLossEntry]) -> (u32, u32) {
    let lo = entries.iter().map(|e| e.win).min();
    let hi = entries.iter().map(|e| e.win).max();
    match (lo, hi) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => (0, 1),
    }
}

fn time_periods(data: &Tables) -> Vec<TimePeriod> {
    let mut periods: Vec<TimePeriod> = data.win_loss.rows.iter().map(|r| r.time_period).collect();
    periods.sort();
    periods.dedup();
    periods
}

fn category_universe(data: &Tables) -> Vec<Category> {
    let mut categories: Vec<Category> = data.win_loss.rows.iter().map(|r| r.category).collect();
    categories.sort_by_key(|c| c.raw());
    categories.dedup();
    categories
}

impl Page for WinLossFilters {
    fn id(&self) -> PageId {
        PageId::WinLoss
    }

    fn controls(&self, data: &Tables) -> Vec<Control> {
        let rows = &data.win_loss.rows;
        let bounds = min_wins_bounds(&self.entries(data));
        vec![
            Control::multi(
                ControlId::Players,
                "Players",
                distinct(rows, |r| r.player.as_str())
                    .into_iter()
                    .map(ControlOption::plain)
                    .collect(),
                &self.players,
                None,
            ),
            Control::multi(
                ControlId::Categories,
                "Categories",
                category_universe(data)
                    .into_iter()
                    .map(|c| ControlOption::new(c.raw(), c.label()))
                    .collect(),
                self.categories.labels(),
                Some(CATEGORY_POLICY),
            ),
            Control::select(
                ControlId::TimePeriod,
                "Time Period",
                time_periods(data)
                    .into_iter()
                    .map(|t| ControlOption::new(t.raw(), t.label()))
                    .collect(),
                self.time_period.raw(),
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
            Control::stepper(
                ControlId::MinWins,
                "Minimum Wins",
                i64::from(bounds.0),
                i64::from(bounds.1),
                i64::from(self.effective_min_wins(bounds)),
            ),
            top_n_control(self.top_n, WIN_LOSS_TOP_N, "Players Displayed"),
        ]
    }

    fn apply(&mut self, data: &Tables, control: ControlId, action: ControlAction) {
        match control {
            ControlId::Players => apply_to_players(&mut self.players, action),
            ControlId::Categories => {
                let universe: Vec<String> = category_universe(data)
                    .into_iter()
                    .map(|c| c.raw().to_string())
                    .collect();
                apply_to_selection(&mut self.categories, action, &universe, CATEGORY_POLICY);
            }
            ControlId::TimePeriod => {
                if let ControlAction::Choose(raw) | ControlAction::Toggle(raw) = action {
                    match TimePeriod::from_raw(&raw) {
                        Some(period) if time_periods(data).contains(&period) => {
                            self.time_period = period
                        }
                        _ => tracing::debug!("ignoring unknown time period `{}`", raw),
                    }
                }
            }
            ControlId::Countries => {
                let universe = distinct(&data.win_loss.rows, |r| r.country.as_str());
                apply_to_selection(&mut self.countries, action, &universe, COUNTRY_POLICY);
            }
            ControlId::MinWins => {
                let bounds = min_wins_bounds(&self.entries(data));
                let current = i64::from(self.effective_min_wins(bounds));
                self.min_wins = match action {
                    ControlAction::Step(delta) => (current + delta)
                        .clamp(i64::from(bounds.0), i64::from(bounds.1))
                        .try_into()
                        .unwrap_or(bounds.0),
                    ControlAction::Clear => self.default_min_wins,
                    _ => self.min_wins,
                };
            }
            ControlId::TopN => apply_top_n(&mut self.top_n, action, WIN_LOSS_TOP_N),
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

pub fn render(data: &Tables, filters: &WinLossFilters) -> PageView {
    log_filters(PageId::WinLoss, filters);
    let entries = filters.entries(data);
    let threshold = filters.effective_min_wins(min_wins_bounds(&entries));

    let mut kept: Vec<WinLossEntry> = entries.into_iter().filter(|e| e.win >= threshold).collect();
    sort_descending(&mut kept, |e| e.index);
    let ranked = top_n(kept, filters.top_n, |e| e.index);

    let bars: Vec<Bar> = ranked
        .into_iter()
        .map(|e| Bar {
            details: vec![
                ("Win".to_string(), e.win.to_string()),
                ("Loss".to_string(), e.loss.to_string()),
                ("Titles".to_string(), e.titles.to_string()),
            ],
            label: e.player,
            value: e.index,
        })
        .collect();

    let chart = (!bars.is_empty()).then(|| {
        Chart::Bar(BarChart {
            title: "Win/Loss Index Stats".to_string(),
            x_label: "Player".to_string(),
            y_label: "Index".to_string(),
            bars,
            decimals: 3,
        })
    });
    let captions = vec![INTRO_CAPTION.to_string(), MIN_WINS_CAPTION.to_string()];

    PageView {
        page: PageId::WinLoss,
        panels: vec![Panel::new("Win/Loss Index", chart, captions)],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
