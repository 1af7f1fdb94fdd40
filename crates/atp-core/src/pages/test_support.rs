// Small in-memory tables shared by the page tests.

use std::collections::BTreeMap;

use crate::config::DefaultsConfig;
use crate::data::labels::{Category, RatingKind, RatingStat, TimePeriod};
use crate::data::player_stats::{PlayerStatRow, PlayerStatsTable};
use crate::data::ratings::{RatingRow, RatingsTable};
use crate::data::win_loss::{WinLossRow, WinLossTable};
use crate::data::Tables;

pub fn defaults() -> DefaultsConfig {
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

fn rating(
    player: &str,
    time: &str,
    surface: &str,
    value: f64,
    stats: &[(RatingStat, f64)],
) -> RatingRow {
    RatingRow {
        player: player.into(),
        time: time.into(),
        year: crate::data::coerce::extract_year(time),
        surface: surface.into(),
        vs_rank: "all".into(),
        rating: value,
        stats: stats.iter().copied().collect::<BTreeMap<_, _>>(),
    }
}

fn serve() -> RatingsTable {
    use RatingStat::*;
    RatingsTable {
        kind: RatingKind::Serve,
        rows: vec![
            rating("Novak Djokovic", "2019", "all", 280.0, &[(FirstServePct, 65.0), (AvgAcesPerMatch, 7.0)]),
            rating("Novak Djokovic", "2020", "all", 290.0, &[(FirstServePct, 66.0)]),
            rating("Novak Djokovic", "career", "all", 285.0, &[(FirstServePct, 64.0)]),
            rating("Rafael Nadal", "2019", "all", 270.0, &[(FirstServePct, 68.0)]),
            rating("Novak Djokovic", "2019", "clay", 270.0, &[(FirstServePct, 63.0)]),
            rating("Novak Djokovic", "2019", "hard", 280.0, &[(FirstServePct, 67.0)]),
        ],
        stat_columns: vec![FirstServePct, AvgAcesPerMatch],
    }
}

fn return_() -> RatingsTable {
    RatingsTable {
        kind: RatingKind::Return,
        rows: vec![rating(
            "Rafael Nadal",
            "2019",
            "all",
            165.0,
            &[(RatingStat::FirstServeReturnPointsWonPct, 34.0)],
        )],
        stat_columns: vec![RatingStat::FirstServeReturnPointsWonPct],
    }
}

fn pressure() -> RatingsTable {
    RatingsTable {
        kind: RatingKind::Pressure,
        rows: vec![rating(
            "Novak Djokovic",
            "2019",
            "all",
            250.0,
            &[(RatingStat::BrkPointsSavedPct, 66.0)],
        )],
        stat_columns: vec![RatingStat::BrkPointsSavedPct],
    }
}

#[allow(clippy::too_many_arguments)]
fn stat(
    id: &str,
    player: &str,
    country: &str,
    surface: &str,
    time: &str,
    stat: &str,
    value: f64,
    matches: f64,
) -> PlayerStatRow {
    let rate = stat != "Aces";
    PlayerStatRow {
        player_id: id.into(),
        player: player.into(),
        country: country.into(),
        surface: surface.into(),
        time: time.into(),
        stat: stat.into(),
        number: (!rate).then_some(value),
        percentage: rate.then_some(value),
        matches,
    }
}

fn player_stats() -> PlayerStatsTable {
    const DJOKOVIC: &str = "Novak Djokovic";
    const NADAL: &str = "Rafael Nadal";
    const FEDERER: &str = "Roger Federer";
    PlayerStatsTable {
        rows: vec![
            stat("1", DJOKOVIC, "all", "all", "career", "Aces", 7000.0, 1000.0),
            stat("1", DJOKOVIC, "SRB", "all", "career", "Aces", 7000.0, 1000.0),
            stat("2", NADAL, "all", "all", "career", "Aces", 4000.0, 1100.0),
            stat("2", NADAL, "ESP", "all", "career", "Aces", 4000.0, 1100.0),
            stat("3", FEDERER, "all", "all", "career", "Aces", 11000.0, 1500.0),
            stat("3", FEDERER, "SUI", "all", "career", "Aces", 11000.0, 1500.0),
            stat("1", DJOKOVIC, "all", "clay", "career", "1st-Serve", 60.0, 10.0),
            stat("1", DJOKOVIC, "all", "grass", "career", "1st-Serve", 80.0, 20.0),
            stat("1", DJOKOVIC, "all", "hard", "career", "1st-Serve", 66.0, 15.0),
            stat("2", NADAL, "all", "clay", "career", "1st-Serve", 70.0, 30.0),
            stat("2", NADAL, "all", "grass", "career", "1st-Serve", 65.0, 10.0),
            stat("1", DJOKOVIC, "all", "all", "2019", "1st-Serve", 64.0, 50.0),
            stat("1", DJOKOVIC, "all", "all", "2020", "1st-Serve", 66.0, 40.0),
            stat("2", NADAL, "all", "all", "2019", "1st-Serve", 68.0, 45.0),
            stat("3", FEDERER, "all", "all", "2019", "1st-Serve", 62.0, 30.0),
        ],
    }
}

#[allow(clippy::too_many_arguments)]
fn wl(
    player: &str,
    category: Category,
    time_period: TimePeriod,
    country: &str,
    win: u32,
    loss: u32,
    titles: u32,
    index: f64,
) -> WinLossRow {
    WinLossRow {
        player: player.into(),
        category,
        time_period,
        country: country.into(),
        win,
        loss,
        titles,
        index,
    }
}

fn win_loss() -> WinLossTable {
    use Category::{All, Clay, Grass};
    use TimePeriod::{Career, Ytd};
    WinLossTable {
        rows: vec![
            wl("Novak Djokovic", Clay, Career, "all", 250, 60, 19, 0.806),
            wl("Novak Djokovic", Grass, Career, "all", 100, 20, 7, 0.833),
            wl("Rafael Nadal", Clay, Career, "all", 480, 50, 63, 0.906),
            wl("Rafael Nadal", Grass, Career, "all", 40, 10, 2, 0.8),
            wl("Roger Federer", Clay, Career, "all", 220, 70, 11, 0.759),
            wl("Roger Federer", Grass, Career, "all", 190, 30, 19, 0.864),
            wl("Carlos Alcaraz", Clay, Career, "all", 8, 2, 1, 0.8),
            wl("Novak Djokovic", Clay, Career, "SRB", 250, 60, 19, 0.806),
            wl("Novak Djokovic", All, Career, "all", 1100, 200, 98, 0.846),
            wl("Novak Djokovic", Clay, Ytd, "all", 20, 3, 2, 0.87),
        ],
    }
}

pub fn tables() -> Tables {
    Tables {
        serve: serve(),
        return_: return_(),
        pressure: pressure(),
        player_stats: player_stats(),
        win_loss: win_loss(),
    }
}
