// Dashboard pages.
//
// A page is an explicit, serializable filter-state struct plus a pure
// `render(data, filters) -> PageView`. Front ends read `controls()` to draw
// the sidebar and feed user input back through `apply()`.

pub mod individual;
pub mod ratings;
pub mod win_loss;

#[cfg(test)]
pub(crate) mod test_support;

use serde::Serialize;
use tracing::debug;

use crate::chart::Chart;
use crate::config::DefaultsConfig;
use crate::data::Tables;
use crate::filter::{CollapsePolicy, Selection};
use crate::ranking::TopN;

pub use individual::IndividualFilters;
pub use ratings::RatingsFilters;
pub use win_loss::WinLossFilters;

/// Shown in place of a chart when the filters exclude every row.
pub const NO_DATA: &str = "No data found for the selected options.";

// ---------------------------------------------------------------------------
// Page identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageId {
    Ratings,
    Individual,
    WinLoss,
}

impl PageId {
    pub const ALL: [PageId; 3] = [PageId::Ratings, PageId::Individual, PageId::WinLoss];

    pub fn title(self) -> &'static str {
        match self {
            PageId::Ratings => "ATP Statistics",
            PageId::Individual => "Individual Stats",
            PageId::WinLoss => "Win/Loss Index",
        }
    }

    pub fn index(self) -> usize {
        match self {
            PageId::Ratings => 0,
            PageId::Individual => 1,
            PageId::WinLoss => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControlId {
    Metric,
    Players,
    Surface,
    VsRank,
    Stat,
    Time,
    Countries,
    Surfaces,
    Categories,
    TimePeriod,
    TopN,
    MinWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlKind {
    /// `policy` is set for sentinel dimensions; player lists have none.
    MultiSelect { policy: Option<CollapsePolicy> },
    SingleSelect,
    Stepper { min: i64, max: i64 },
}

/// One selectable option: the raw token and what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlOption {
    pub raw: String,
    pub label: String,
}

impl ControlOption {
    pub fn new(raw: impl Into<String>, label: impl Into<String>) -> Self {
        ControlOption {
            raw: raw.into(),
            label: label.into(),
        }
    }

    /// An option whose raw token is also its label.
    pub fn plain(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        ControlOption {
            label: raw.clone(),
            raw,
        }
    }
}

/// A sidebar control as the front end should draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub id: ControlId,
    pub title: String,
    pub kind: ControlKind,
    pub options: Vec<ControlOption>,
    /// Raw tokens currently selected.
    pub selected: Vec<String>,
    /// Current stepper value.
    pub value: Option<i64>,
}

impl Control {
    fn select(id: ControlId, title: &str, options: Vec<ControlOption>, selected: &str) -> Self {
        Control {
            id,
            title: title.to_string(),
            kind: ControlKind::SingleSelect,
            options,
            selected: vec![selected.to_string()],
            value: None,
        }
    }

    fn multi(
        id: ControlId,
        title: &str,
        options: Vec<ControlOption>,
        selected: &[String],
        policy: Option<CollapsePolicy>,
    ) -> Self {
        Control {
            id,
            title: title.to_string(),
            kind: ControlKind::MultiSelect { policy },
            options,
            selected: selected.to_vec(),
            value: None,
        }
    }

    fn stepper(id: ControlId, title: &str, min: i64, max: i64, value: i64) -> Self {
        Control {
            id,
            title: title.to_string(),
            kind: ControlKind::Stepper { min, max },
            options: Vec::new(),
            selected: Vec::new(),
            value: Some(value),
        }
    }

    /// Display label of the first selected option.
    pub fn selected_label(&self) -> Option<&str> {
        let raw = self.selected.first()?;
        self.options
            .iter()
            .find(|o| &o.raw == raw)
            .map(|o| o.label.as_str())
    }
}

/// A user interaction with one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ControlAction {
    /// Add or remove a raw token from a multi-select.
    Toggle(String),
    /// Pick a raw token in a single-select.
    Choose(String),
    /// Move a stepper by the given amount.
    Step(i64),
    /// Reset the control to its empty state.
    Clear,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub chart: Option<Chart>,
    /// Empty-result notice shown instead of the chart.
    pub notice: Option<String>,
    /// Advisory notes shown under the chart.
    pub captions: Vec<String>,
}

impl Panel {
    /// A panel holding `chart`, or the no-data notice when `chart` is `None`.
    pub fn new(title: &str, chart: Option<Chart>, captions: Vec<String>) -> Self {
        let notice = chart.is_none().then(|| NO_DATA.to_string());
        Panel {
            title: title.to_string(),
            chart,
            notice,
            captions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: PageId,
    pub panels: Vec<Panel>,
}

// ---------------------------------------------------------------------------
// Page trait
// ---------------------------------------------------------------------------

/// Filter state of one page.
pub trait Page {
    fn id(&self) -> PageId;

    /// Sidebar controls in display order.
    fn controls(&self, data: &Tables) -> Vec<Control>;

    /// Apply one interaction. Unknown controls and options are ignored.
    fn apply(&mut self, data: &Tables, control: ControlId, action: ControlAction);

    fn render(&self, data: &Tables) -> PageView;
}

/// Fresh filter state for every page, in page order.
pub fn default_pages(data: &Tables, defaults: &DefaultsConfig) -> Vec<Box<dyn Page>> {
    vec![
        Box::new(RatingsFilters::new(data, defaults)),
        Box::new(IndividualFilters::new(data, defaults)),
        Box::new(WinLossFilters::new(data, defaults)),
    ]
}

// ---------------------------------------------------------------------------
// Shared action helpers
// ---------------------------------------------------------------------------

/// Route an action on a sentinel dimension through the reconciler.
pub(crate) fn apply_to_selection(
    selection: &mut Selection,
    action: ControlAction,
    universe: &[String],
    policy: CollapsePolicy,
) {
    let requested = match action {
        ControlAction::Toggle(label) | ControlAction::Choose(label) => selection.toggled(&label),
        ControlAction::Clear => Vec::new(),
        ControlAction::Step(_) => return,
    };
    selection.reconcile(requested, universe, policy);
}

/// Toggle a player in a sentinel-free list. An empty list means no narrowing.
pub(crate) fn apply_to_players(players: &mut Vec<String>, action: ControlAction) {
    match action {
        ControlAction::Toggle(name) | ControlAction::Choose(name) => {
            if let Some(pos) = players.iter().position(|p| *p == name) {
                players.remove(pos);
            } else {
                players.push(name);
            }
        }
        ControlAction::Clear => players.clear(),
        ControlAction::Step(_) => {}
    }
}

/// Pick a single-select value when it is one of `options`.
pub(crate) fn apply_choice(current: &mut String, action: ControlAction, options: &[String]) {
    if let ControlAction::Choose(value) | ControlAction::Toggle(value) = action {
        if options.contains(&value) {
            *current = value;
        } else {
            debug!("ignoring unknown option `{}`", value);
        }
    }
}

/// Parse a top-N choice, keeping the current one for anything not offered.
pub(crate) fn apply_top_n(current: &mut TopN, action: ControlAction, offered: &[TopN]) {
    if let ControlAction::Choose(value) | ControlAction::Toggle(value) = action {
        match value.parse::<TopN>() {
            Ok(n) if offered.contains(&n) => *current = n,
            _ => debug!("ignoring unknown top-N option `{}`", value),
        }
    }
}

pub(crate) fn top_n_control(current: TopN, offered: &[TopN], title: &str) -> Control {
    let options = offered
        .iter()
        .map(|n| ControlOption::plain(n.to_string()))
        .collect();
    Control::select(ControlId::TopN, title, options, &current.to_string())
}

/// Log the resolved filter state before rendering.
pub(crate) fn log_filters<F: Serialize>(page: PageId, filters: &F) {
    match serde_json::to_string(filters) {
        Ok(json) => debug!("rendering {:?} with filters {}", page, json),
        Err(e) => debug!("rendering {:?}; filters not serializable: {}", page, e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
