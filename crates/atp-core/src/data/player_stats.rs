// Per-stat-per-player table (`atp_player_stats.csv.gz`).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::coerce::{parse_number, parse_opt};
use super::{open_table, DataError};
use crate::aggregate::MetricKind;

/// One player's value for one stat on one surface, country and period.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatRow {
    pub player_id: String,
    pub player: String,
    pub country: String,
    pub surface: String,
    /// A year or `career`.
    pub time: String,
    pub stat: String,
    /// Count value (aces).
    pub number: Option<f64>,
    /// Rate value, 0-100.
    pub percentage: Option<f64>,
    pub matches: f64,
}

impl PlayerStatRow {
    /// The column a metric of the given kind reads.
    pub fn value(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Count => self.number,
            MetricKind::Rate => self.percentage,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerStatsTable {
    pub rows: Vec<PlayerStatRow>,
}

// ---------------------------------------------------------------------------
// Raw CSV struct (private)
// ---------------------------------------------------------------------------

/// Numeric fields are kept as text so `1,234` and `61%` can be cleaned.
/// Unlisted columns are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerStat {
    #[serde(default)]
    PlayerId: Option<String>,
    PlayerName: String,
    Country: String,
    Surface: String,
    Time: String,
    Stat: String,
    #[serde(default)]
    Number: Option<String>,
    #[serde(default)]
    Percentage: Option<String>,
    #[serde(default)]
    Matches: Option<String>,
}

fn load_player_stats_from_reader<R: Read>(
    rdr: R,
    min_matches: u32,
) -> Result<Vec<PlayerStatRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    let (mut no_id, mut few_matches) = (0usize, 0usize);

    for result in reader.deserialize::<RawPlayerStat>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed player stat row: {}", e);
                continue;
            }
        };

        let player_id = raw.PlayerId.as_deref().map(str::trim).unwrap_or("");
        if player_id.is_empty() {
            no_id += 1;
            continue;
        }
        let name = raw.PlayerName.trim();
        let Some(matches) = parse_opt(raw.Matches.as_deref()) else {
            warn!("skipping stat row for '{}': missing or non-numeric Matches", name);
            continue;
        };
        if matches < f64::from(min_matches) {
            few_matches += 1;
            continue;
        }

        let number = raw.Number.as_deref().and_then(parse_number);
        let percentage = raw.Percentage.as_deref().and_then(parse_number);
        if number.is_none() && percentage.is_none() {
            warn!(
                "skipping stat row for '{}' ({}): no numeric Number or Percentage",
                name,
                raw.Stat.trim()
            );
            continue;
        }

        rows.push(PlayerStatRow {
            player_id: player_id.to_string(),
            player: name.to_string(),
            country: raw.Country.trim().to_string(),
            surface: raw.Surface.trim().to_string(),
            time: raw.Time.trim().to_string(),
            stat: raw.Stat.trim().to_string(),
            number,
            percentage,
            matches,
        });
    }

    debug!(
        "player stats: kept {} rows, dropped {} without id, {} under {} matches",
        rows.len(),
        no_id,
        few_matches,
        min_matches
    );
    Ok(rows)
}

/// Load the per-stat table. Paths ending in `.gz` are gunzipped on the fly.
pub fn load_player_stats(path: &Path, min_matches: u32) -> Result<PlayerStatsTable, DataError> {
    let reader = open_table(path)?;
    let rows = load_player_stats_from_reader(reader, min_matches)
        .map_err(|e| DataError::csv(&path.display().to_string(), e))?;
    Ok(PlayerStatsTable { rows })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
