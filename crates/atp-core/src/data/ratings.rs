// Ratings-over-time tables (serve, return, under pressure).
//
// The three files share a layout: player, period, surface, opponent-rank
// bucket, the rating column for that file, then a set of stat columns that
// differs per file. Columns are located by header name.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use super::coerce::{extract_year, parse_number};
use super::labels::{RatingKind, RatingStat};
use super::{open_table, DataError};

/// One row of a ratings table.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub player: String,
    /// Free-text period label, e.g. `2019` or `career`.
    pub time: String,
    /// Year parsed from `time`, when it holds one.
    pub year: Option<i32>,
    pub surface: String,
    pub vs_rank: String,
    pub rating: f64,
    /// Stat columns present and numeric in this row.
    pub stats: BTreeMap<RatingStat, f64>,
}

#[derive(Debug, Clone)]
pub struct RatingsTable {
    pub kind: RatingKind,
    pub rows: Vec<RatingRow>,
    /// Stat columns of `kind` that the file actually carries.
    pub stat_columns: Vec<RatingStat>,
}

impl RatingsTable {
    pub fn has_stat(&self, stat: RatingStat) -> bool {
        self.stat_columns.contains(&stat)
    }
}

/// Header positions of the columns we read.
struct Columns {
    player: usize,
    time: usize,
    surface: usize,
    vs_rank: usize,
    rating: usize,
    stats: Vec<(RatingStat, usize)>,
}

fn locate_columns(
    headers: &csv::StringRecord,
    kind: RatingKind,
    source: &str,
) -> Result<Columns, DataError> {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let require = |name: &str| {
        find(name).ok_or_else(|| {
            DataError::Validation(format!("{source}: missing required column `{name}`"))
        })
    };
    Ok(Columns {
        player: require("PlayerName")?,
        time: require("time")?,
        surface: require("surface")?,
        vs_rank: require("vs_rank")?,
        rating: require(kind.column())?,
        stats: kind
            .stats()
            .iter()
            .filter_map(|stat| find(stat.column()).map(|idx| (*stat, idx)))
            .collect(),
    })
}

fn load_ratings_from_reader<R: Read>(
    rdr: R,
    kind: RatingKind,
    source: &str,
) -> Result<RatingsTable, DataError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| DataError::csv(source, e))?
        .clone();
    let cols = locate_columns(&headers, kind, source)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping malformed {} row: {}", kind.column(), e);
                continue;
            }
        };
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let player = field(cols.player);
        if player.is_empty() {
            warn!("skipping {} row with no player name", kind.column());
            continue;
        }
        let Some(rating) = parse_number(field(cols.rating)) else {
            warn!(
                "skipping {} row for '{}': non-numeric rating '{}'",
                kind.column(),
                player,
                field(cols.rating)
            );
            continue;
        };

        let stats = cols
            .stats
            .iter()
            .filter_map(|(stat, idx)| parse_number(field(*idx)).map(|v| (*stat, v)))
            .collect();
        let time = field(cols.time).to_string();

        rows.push(RatingRow {
            player: player.to_string(),
            year: extract_year(&time),
            time,
            surface: field(cols.surface).to_string(),
            vs_rank: field(cols.vs_rank).to_string(),
            rating,
            stats,
        });
    }

    debug!("{}: {} rating rows", source, rows.len());
    Ok(RatingsTable {
        kind,
        rows,
        stat_columns: cols.stats.into_iter().map(|(stat, _)| stat).collect(),
    })
}

/// Load one ratings table from a CSV (or `.csv.gz`) file.
pub fn load_ratings(path: &Path, kind: RatingKind) -> Result<RatingsTable, DataError> {
    let reader = open_table(path)?;
    load_ratings_from_reader(reader, kind, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
