// Win/loss index table (`atp_win_loss_index.csv`).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::coerce::{parse_opt, to_count};
use super::labels::{Category, TimePeriod};
use super::{open_table, DataError};

#[derive(Debug, Clone, PartialEq)]
pub struct WinLossRow {
    pub player: String,
    pub category: Category,
    pub time_period: TimePeriod,
    pub country: String,
    pub win: u32,
    pub loss: u32,
    pub titles: u32,
    /// Fraction of decided matches won, 0-1.
    pub index: f64,
}

impl WinLossRow {
    /// Decided matches, the weight of `index`.
    pub fn decisions(&self) -> u32 {
        self.win.saturating_add(self.loss)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WinLossTable {
    pub rows: Vec<WinLossRow>,
}

// ---------------------------------------------------------------------------
// Raw CSV struct (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawWinLoss {
    PlayerName: String,
    Category: String,
    TimePeriod: String,
    Country: String,
    #[serde(default)]
    Win: Option<String>,
    #[serde(default)]
    Loss: Option<String>,
    #[serde(default)]
    Titles: Option<String>,
    #[serde(default)]
    Index: Option<String>,
}

/// Reads rows, rejecting any category or time period without a label.
fn load_win_loss_from_reader<R: Read>(
    rdr: R,
    min_decisions: u32,
    source: &str,
) -> Result<Vec<WinLossRow>, DataError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    let (mut no_index, mut undecided) = (0usize, 0usize);

    for result in reader.deserialize::<RawWinLoss>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed win/loss row in {}: {}", source, e);
                continue;
            }
        };

        let category_raw = raw.Category.trim();
        let category = Category::from_raw(category_raw).ok_or_else(|| DataError::UnlabeledValue {
            column: "Category".into(),
            value: category_raw.to_string(),
        })?;
        let period_raw = raw.TimePeriod.trim();
        let time_period =
            TimePeriod::from_raw(period_raw).ok_or_else(|| DataError::UnlabeledValue {
                column: "TimePeriod".into(),
                value: period_raw.to_string(),
            })?;

        let Some(index) = parse_opt(raw.Index.as_deref()) else {
            no_index += 1;
            continue;
        };
        let name = raw.PlayerName.trim();
        let (Some(win), Some(loss)) = (parse_opt(raw.Win.as_deref()), parse_opt(raw.Loss.as_deref()))
        else {
            warn!("skipping win/loss row for '{}': non-numeric Win/Loss", name);
            continue;
        };
        let (win, loss) = (to_count(win), to_count(loss));
        if win.saturating_add(loss) < min_decisions {
            undecided += 1;
            continue;
        }

        rows.push(WinLossRow {
            player: name.to_string(),
            category,
            time_period,
            country: raw.Country.trim().to_string(),
            win,
            loss,
            titles: parse_opt(raw.Titles.as_deref()).map(to_count).unwrap_or(0),
            index,
        });
    }

    debug!(
        "win/loss: kept {} rows, dropped {} without index, {} under {} decisions",
        rows.len(),
        no_index,
        undecided,
        min_decisions
    );
    Ok(rows)
}

/// Load the win/loss table.
pub fn load_win_loss(path: &Path, min_decisions: u32) -> Result<WinLossTable, DataError> {
    let reader = open_table(path)?;
    let rows = load_win_loss_from_reader(reader, min_decisions, &path.display().to_string())?;
    Ok(WinLossTable { rows })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
