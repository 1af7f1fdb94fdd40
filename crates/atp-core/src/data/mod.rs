// Source table loading.
//
// Each table has a reader-based loader (tested against in-memory CSV) and a
// path-based wrapper that attaches the file path to errors.

pub mod cache;
pub mod coerce;
pub mod labels;
pub mod player_stats;
pub mod ratings;
pub mod win_loss;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::info;

use crate::config::{DashboardConfig, DataPaths, Thresholds};
use labels::RatingKind;
use player_stats::PlayerStatsTable;
use ratings::RatingsTable;
use win_loss::WinLossTable;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("no display label for {column} value `{value}`")]
    UnlabeledValue { column: String, value: String },

    #[error("validation error: {0}")]
    Validation(String),
}

impl DataError {
    fn csv(path: &str, source: csv::Error) -> Self {
        DataError::Csv {
            path: path.to_string(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Every source table, loaded once per cache lifetime.
#[derive(Debug, Clone)]
pub struct Tables {
    pub serve: RatingsTable,
    pub return_: RatingsTable,
    pub pressure: RatingsTable,
    pub player_stats: PlayerStatsTable,
    pub win_loss: WinLossTable,
}

impl Tables {
    pub fn ratings(&self, kind: RatingKind) -> &RatingsTable {
        match kind {
            RatingKind::Serve => &self.serve,
            RatingKind::Return => &self.return_,
            RatingKind::Pressure => &self.pressure,
        }
    }
}

/// Open a source file, transparently decompressing `*.gz`.
pub fn open_table(path: &Path) -> Result<Box<dyn Read>, DataError> {
    let file = File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let reader = BufReader::new(file);
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(flate2::read::MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Load every table using the paths and thresholds from the config.
pub fn load_all(config: &DashboardConfig) -> Result<Tables, DataError> {
    load_all_from_paths(&config.data, &config.thresholds)
}

/// Load every table from explicit paths. Exposed for testing.
pub fn load_all_from_paths(paths: &DataPaths, thresholds: &Thresholds) -> Result<Tables, DataError> {
    let serve = ratings::load_ratings(Path::new(&paths.serve_ratings), RatingKind::Serve)?;
    let return_ = ratings::load_ratings(Path::new(&paths.return_ratings), RatingKind::Return)?;
    let pressure = ratings::load_ratings(Path::new(&paths.pressure_ratings), RatingKind::Pressure)?;
    let player_stats =
        player_stats::load_player_stats(Path::new(&paths.player_stats), thresholds.min_matches)?;
    let win_loss = win_loss::load_win_loss(Path::new(&paths.win_loss), thresholds.min_decisions)?;

    for (name, len) in [
        ("serve ratings", serve.rows.len()),
        ("return ratings", return_.rows.len()),
        ("pressure ratings", pressure.rows.len()),
        ("player stats", player_stats.rows.len()),
        ("win/loss", win_loss.rows.len()),
    ] {
        if len == 0 {
            return Err(DataError::Validation(format!(
                "{name} table produced zero valid rows"
            )));
        }
    }

    info!(
        "loaded tables: serve={} return={} pressure={} player_stats={} win_loss={}",
        serve.rows.len(),
        return_.rows.len(),
        pressure.rows.len(),
        player_stats.rows.len(),
        win_loss.rows.len()
    );

    Ok(Tables {
        serve,
        return_,
        pressure,
        player_stats,
        win_loss,
    })
}

/// Sorted unique values of a string column.
pub fn distinct<'a, R: 'a, I, F>(rows: I, field: F) -> Vec<String>
where
    I: IntoIterator<Item = &'a R>,
    F: Fn(&R) -> &str,
{
    let set: std::collections::BTreeSet<&str> = rows.into_iter().map(|r| field(r)).collect();
    set.into_iter().map(str::to_string).collect()
}
