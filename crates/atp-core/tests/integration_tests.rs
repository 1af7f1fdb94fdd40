// Integration tests for the ATP dashboard core.
//
// These load the fixture tables from disk (plain and gzip CSV) and drive the
// three pages through their public API, the same way the terminal front end
// does.

use std::path::Path;

use atp_core::aggregate::{aggregate, MetricKind};
use atp_core::chart::Chart;
use atp_core::config::{DataPaths, DefaultsConfig, Thresholds};
use atp_core::data::labels::{Category, RatingKind};
use atp_core::data::{load_all_from_paths, player_stats, win_loss, DataError, Tables};
use atp_core::filter::{CollapsePolicy, Selection, ALL};
use atp_core::pages::individual::{self, IndividualFilters};
use atp_core::pages::ratings::{self, RatingsFilters};
use atp_core::pages::win_loss::{self as win_loss_page, WinLossFilters};
use atp_core::pages::{default_pages, ControlAction, ControlId, Page, PageId, NO_DATA};
use atp_core::ranking::{top_n, TopN};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture(name: &str) -> String {
    format!("{FIXTURES}/{name}")
}

fn fixture_paths() -> DataPaths {
    DataPaths {
        serve_ratings: fixture("serve.csv"),
        return_ratings: fixture("return.csv"),
        pressure_ratings: fixture("pressure.csv"),
        player_stats: fixture("player_stats.csv.gz"),
        win_loss: fixture("win_loss.csv"),
    }
}

fn defaults() -> DefaultsConfig {
    DefaultsConfig {
        players: vec![
            "Roger Federer".into(),
            "Novak Djokovic".into(),
            "Rafael Nadal".into(),
        ],
        individual_time: "career".into(),
        individual_top_n: 10,
        win_loss_top_n: 10,
        min_wins: 10,
    }
}

fn load() -> Tables {
    load_all_from_paths(&fixture_paths(), &Thresholds::default()).expect("fixtures should load")
}

fn bar_labels(panel_chart: &Option<Chart>) -> Vec<String> {
    match panel_chart {
        Some(Chart::Bar(chart)) => chart.bars.iter().map(|b| b.label.clone()).collect(),
        other => panic!("expected a bar chart, got {other:?}"),
    }
}

// ===========================================================================
// Loading
// ===========================================================================

#[test]
fn loads_every_fixture_table() {
    let tables = load();
    // Malformed rating row skipped.
    assert_eq!(tables.serve.rows.len(), 10);
    assert_eq!(tables.return_.rows.len(), 4);
    assert_eq!(tables.pressure.rows.len(), 3);
    assert_eq!(tables.ratings(RatingKind::Pressure).kind, RatingKind::Pressure);
    // Rows without an id or under 5 matches dropped.
    assert_eq!(tables.player_stats.rows.len(), 15);
    // Rows without an index or under 2 decisions dropped.
    assert_eq!(tables.win_loss.rows.len(), 12);
}

#[test]
fn gzip_and_plain_player_stats_match() {
    let plain = player_stats::load_player_stats(Path::new(&fixture("player_stats.csv")), 5).unwrap();
    let gz = player_stats::load_player_stats(Path::new(&fixture("player_stats.csv.gz")), 5).unwrap();
    assert_eq!(plain.rows, gz.rows);
    assert_eq!(gz.rows[0].number, Some(7215.0));
    assert_eq!(gz.rows[6].percentage, Some(50.0));
}

#[test]
fn unlabeled_category_aborts_load() {
    let err = win_loss::load_win_loss(Path::new(&fixture("win_loss_unlabeled.csv")), 2).unwrap_err();
    match err {
        DataError::UnlabeledValue { column, value } => {
            assert_eq!(column, "Category");
            assert_eq!(value, "hardcourt");
        }
        other => panic!("expected UnlabeledValue, got: {other}"),
    }
}

#[test]
fn missing_table_is_io_error() {
    let mut paths = fixture_paths();
    paths.win_loss = fixture("does_not_exist.csv");
    let err = load_all_from_paths(&paths, &Thresholds::default()).unwrap_err();
    assert!(matches!(err, DataError::Io { .. }));
}

#[test]
fn win_loss_categories_map_to_labels() {
    let tables = load();
    let labels: Vec<&str> = tables
        .win_loss
        .rows
        .iter()
        .map(|r| r.category.label())
        .collect();
    assert!(labels.contains(&"Clay"));
    assert!(tables
        .win_loss
        .rows
        .iter()
        .all(|r| r.category != Category::VsTop10));
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn weighted_rate_of_two_rows() {
    // (P1, w=10, 50%) and (P1, w=20, 80%) -> (P1, 70.0%, w=30)
    let rows = vec![("P1", 10.0, 50.0), ("P1", 20.0, 80.0)];
    let out = aggregate(&rows, |r| r.0, |r| r.2, |r| r.1, MetricKind::Rate, 2);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].key, "P1");
    assert!((out[0].value - 70.0).abs() < 1e-9);
    assert!((out[0].weight - 30.0).abs() < 1e-9);
}

#[test]
fn surface_selection_walkthrough() {
    let tables = load();
    let mut filters = RatingsFilters::new(&tables, &defaults());
    assert!(filters.surface.is_all());

    filters.apply(&tables, ControlId::Surface, ControlAction::Toggle("clay".into()));
    assert_eq!(filters.surface.labels(), ["clay".to_string()]);

    filters.apply(&tables, ControlId::Surface, ControlAction::Toggle("grass".into()));
    assert_eq!(
        filters.surface.labels(),
        ["clay".to_string(), "grass".to_string()]
    );

    filters.apply(&tables, ControlId::Surface, ControlAction::Clear);
    assert!(filters.surface.is_all());
    assert_eq!(filters.surface.labels(), [ALL.to_string()]);
}

#[test]
fn top_two_of_five_three_three_one() {
    let out = top_n(vec![(0, 5.0), (1, 3.0), (2, 3.0), (3, 1.0)], TopN::Top(2), |r| r.1);
    assert_eq!(out, vec![(0, 5.0), (1, 3.0)]);
}

#[test]
fn selection_survives_json_round_trip() {
    let mut sel = Selection::all();
    let universe = vec!["all".to_string(), "clay".to_string()];
    sel.reconcile(vec!["clay".into()], &universe, CollapsePolicy::ExplicitOnly);
    let json = serde_json::to_string(&sel).unwrap();
    let back: Selection = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sel);
}

// ===========================================================================
// Pages
// ===========================================================================

#[test]
fn ratings_page_renders_default_players() {
    let tables = load();
    let filters = RatingsFilters::new(&tables, &defaults());
    let view = ratings::render(&tables, &filters);
    assert_eq!(view.page, PageId::Ratings);
    assert_eq!(view.panels.len(), 2);

    let Some(Chart::Line(line)) = &view.panels[0].chart else {
        panic!("expected a line chart");
    };
    let names: Vec<&str> = line.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Novak Djokovic", "Rafael Nadal", "Roger Federer"]);
    // "52 week" has no year and is left off the time axis.
    assert_eq!(line.series[0].points, vec![(2019.0, 280.1), (2020.0, 283.4)]);
    assert_eq!(line.series[2].points, vec![(2019.0, 295.5)]);

    let Some(Chart::Scatter(scatter)) = &view.panels[1].chart else {
        panic!("expected a scatter chart");
    };
    assert_eq!(scatter.title, "Serve Rating Vs First Serve %");
    assert!(scatter.trendline.is_some());
}

#[test]
fn ratings_multi_surface_is_averaged() {
    let tables = load();
    let mut filters = RatingsFilters::new(&tables, &defaults());
    filters.apply(&tables, ControlId::Surface, ControlAction::Toggle("clay".into()));
    filters.apply(&tables, ControlId::Surface, ControlAction::Toggle("grass".into()));

    let view = ratings::render(&tables, &filters);
    let Some(Chart::Line(line)) = &view.panels[0].chart else {
        panic!("expected a line chart");
    };
    assert_eq!(line.series.len(), 1);
    assert_eq!(line.series[0].points, vec![(2019.0, 280.0)]);
    assert_eq!(view.panels[0].captions.len(), 1);
}

#[test]
fn individual_multi_surface_is_match_weighted() {
    let tables = load();
    let mut filters = IndividualFilters::new(&tables, &defaults());
    filters.apply(&tables, ControlId::Stat, ControlAction::Choose("1st-Serve".into()));
    filters.apply(&tables, ControlId::Surfaces, ControlAction::Toggle("clay".into()));
    filters.apply(&tables, ControlId::Surfaces, ControlAction::Toggle("grass".into()));

    let view = individual::render(&tables, &filters);
    let Some(Chart::Bar(chart)) = &view.panels[0].chart else {
        panic!("expected a bar chart");
    };
    assert_eq!(chart.bars[0].label, "Novak Djokovic");
    assert!((chart.bars[0].value - 70.0).abs() < 1e-9);
    assert_eq!(chart.bars[1].label, "Rafael Nadal");
    assert!((chart.bars[1].value - 68.43).abs() < 1e-9);
}

#[test]
fn individual_aces_rank_by_total() {
    let tables = load();
    let mut filters = IndividualFilters::new(&tables, &defaults());
    filters.apply(&tables, ControlId::Stat, ControlAction::Choose("Aces".into()));
    filters.apply(&tables, ControlId::TopN, ControlAction::Choose("Top 5".into()));
    assert_eq!(filters.top_n, TopN::Top(5));

    let view = individual::render(&tables, &filters);
    assert_eq!(
        bar_labels(&view.panels[0].chart),
        vec!["Roger Federer", "Novak Djokovic", "Rafael Nadal"]
    );
    // Aces have no yearly rows in the fixtures.
    assert_eq!(view.panels[1].notice.as_deref(), Some(NO_DATA));
}

#[test]
fn win_loss_default_and_grouped_views() {
    let tables = load();
    let mut filters = WinLossFilters::new(&tables, &defaults());
    let view = win_loss_page::render(&tables, &filters);
    assert_eq!(
        bar_labels(&view.panels[0].chart),
        vec!["Novak Djokovic", "Rafael Nadal", "Roger Federer"]
    );

    filters.apply(&tables, ControlId::Categories, ControlAction::Toggle("clay".into()));
    filters.apply(&tables, ControlId::Categories, ControlAction::Toggle("grass".into()));
    assert!(filters.needs_grouping());

    let view = win_loss_page::render(&tables, &filters);
    let Some(Chart::Bar(chart)) = &view.panels[0].chart else {
        panic!("expected a bar chart");
    };
    let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Rafael Nadal", "Novak Djokovic", "Roger Federer"]);
    assert!((chart.bars[0].value - 0.897).abs() < 1e-9);
    assert_eq!(chart.bars[0].details[0], ("Win".to_string(), "520".to_string()));
}

#[test]
fn every_default_page_renders() {
    let tables = load();
    let pages = default_pages(&tables, &defaults());
    let ids: Vec<PageId> = pages.iter().map(|p| p.id()).collect();
    assert_eq!(ids, PageId::ALL.to_vec());
    for page in &pages {
        let view = page.render(&tables);
        assert_eq!(view.page, page.id());
        assert!(!view.panels.is_empty());
        assert!(!page.controls(&tables).is_empty());
    }
}
