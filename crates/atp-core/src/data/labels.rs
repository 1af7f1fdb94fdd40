// Raw token <-> display label lookups.
//
// Every enum here is closed: loaders reject a raw token with no label
// instead of showing it as-is.

use serde::{Deserialize, Serialize};

use crate::aggregate::MetricKind;

// ---------------------------------------------------------------------------
// Rating kinds and their stat columns
// ---------------------------------------------------------------------------

/// Which ATP rating a ratings table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingKind {
    Serve,
    Return,
    Pressure,
}

impl RatingKind {
    pub const ALL: [RatingKind; 3] = [RatingKind::Serve, RatingKind::Return, RatingKind::Pressure];

    /// Name shown in the metric selector.
    pub fn label(self) -> &'static str {
        match self {
            RatingKind::Serve => "Serve Rating",
            RatingKind::Return => "Return Rating",
            RatingKind::Pressure => "Under Pressure Rating",
        }
    }

    /// Column holding the rating in the source file.
    pub fn column(self) -> &'static str {
        match self {
            RatingKind::Serve => "ServeRating",
            RatingKind::Return => "ReturnRating",
            RatingKind::Pressure => "PressureRating",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            RatingKind::Serve => "Serve Rating",
            RatingKind::Return => "Return Rating",
            RatingKind::Pressure => "Pressure Rating",
        }
    }

    pub fn line_title(self) -> &'static str {
        match self {
            RatingKind::Serve => "ATP Serve Rating Over Time",
            RatingKind::Return => "ATP Return Rating Over Time",
            RatingKind::Pressure => "ATP Under Pressure Rating Over Time",
        }
    }

    /// Stats that feed this rating, in selector order.
    pub fn stats(self) -> &'static [RatingStat] {
        use RatingStat::*;
        match self {
            RatingKind::Serve => &[
                FirstServePct,
                FirstServePointsWonPct,
                SecondServePointsWonPct,
                ServiceGamesWonPct,
                AvgAcesPerMatch,
                AvgDblFaultsPerMatch,
            ],
            RatingKind::Return => &[
                FirstServeReturnPointsWonPct,
                SecondServeReturnPointsWonPct,
                ReturnGamesWonPct,
                BrkPointsConvertedPct,
            ],
            RatingKind::Pressure => &[
                BrkPointsConvertedPct,
                BrkPointsSavedPct,
                TieBreaksWonPct,
                DecidingSetsWonPct,
            ],
        }
    }

    /// Lookup by `column()` or `label()`.
    pub fn parse(s: &str) -> Option<RatingKind> {
        RatingKind::ALL
            .into_iter()
            .find(|k| k.column() == s || k.label() == s)
    }
}

/// A per-match stat column of the ratings tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingStat {
    FirstServePct,
    FirstServePointsWonPct,
    SecondServePointsWonPct,
    ServiceGamesWonPct,
    AvgAcesPerMatch,
    AvgDblFaultsPerMatch,
    FirstServeReturnPointsWonPct,
    SecondServeReturnPointsWonPct,
    ReturnGamesWonPct,
    BrkPointsConvertedPct,
    BrkPointsSavedPct,
    TieBreaksWonPct,
    DecidingSetsWonPct,
}

impl RatingStat {
    pub const ALL: [RatingStat; 13] = [
        RatingStat::FirstServePct,
        RatingStat::FirstServePointsWonPct,
        RatingStat::SecondServePointsWonPct,
        RatingStat::ServiceGamesWonPct,
        RatingStat::AvgAcesPerMatch,
        RatingStat::AvgDblFaultsPerMatch,
        RatingStat::FirstServeReturnPointsWonPct,
        RatingStat::SecondServeReturnPointsWonPct,
        RatingStat::ReturnGamesWonPct,
        RatingStat::BrkPointsConvertedPct,
        RatingStat::BrkPointsSavedPct,
        RatingStat::TieBreaksWonPct,
        RatingStat::DecidingSetsWonPct,
    ];

    pub fn column(self) -> &'static str {
        match self {
            RatingStat::FirstServePct => "FirstServePct",
            RatingStat::FirstServePointsWonPct => "FirstServePointsWonPct",
            RatingStat::SecondServePointsWonPct => "SecondServePointsWonPct",
            RatingStat::ServiceGamesWonPct => "ServiceGamesWonPct",
            RatingStat::AvgAcesPerMatch => "AvgAcesPerMatch",
            RatingStat::AvgDblFaultsPerMatch => "AvgDblFaultsPerMatch",
            RatingStat::FirstServeReturnPointsWonPct => "FirstServeReturnPointsWonPct",
            RatingStat::SecondServeReturnPointsWonPct => "SecondServeReturnPointsWonPct",
            RatingStat::ReturnGamesWonPct => "ReturnGamesWonPct",
            RatingStat::BrkPointsConvertedPct => "BrkPointsConvertedPct",
            RatingStat::BrkPointsSavedPct => "BrkPointsSavedPct",
            RatingStat::TieBreaksWonPct => "TieBreaksWonPct",
            RatingStat::DecidingSetsWonPct => "DecidingSetsWonPct",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingStat::FirstServePct => "First Serve %",
            RatingStat::FirstServePointsWonPct => "First Serve Points Won %",
            RatingStat::SecondServePointsWonPct => "Second Serve Points Won %",
            RatingStat::ServiceGamesWonPct => "Service Games Won %",
            RatingStat::AvgAcesPerMatch => "Average Aces Per Match",
            RatingStat::AvgDblFaultsPerMatch => "Average Double Faults Per Match",
            RatingStat::FirstServeReturnPointsWonPct => "First Serve Return Points Won %",
            RatingStat::SecondServeReturnPointsWonPct => "Second Serve Return Points Won %",
            RatingStat::ReturnGamesWonPct => "Return Games Won %",
            RatingStat::BrkPointsConvertedPct => "Break Points Converted %",
            RatingStat::BrkPointsSavedPct => "Break Points Saved %",
            RatingStat::TieBreaksWonPct => "Tie Breaks Won %",
            RatingStat::DecidingSetsWonPct => "Deciding Sets Won %",
        }
    }

    /// Lookup by `column()` or `label()`.
    pub fn parse(s: &str) -> Option<RatingStat> {
        RatingStat::ALL
            .into_iter()
            .find(|st| st.column() == s || st.label() == s)
    }
}

// ---------------------------------------------------------------------------
// Win/loss categories
// ---------------------------------------------------------------------------

/// Match-context bucket of the win/loss table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    All,
    Masters1000,
    FifthSet,
    AfterFirstSetWin,
    Carpet,
    Clay,
    Hard,
    Grass,
    Finals,
    FinalSet,
    GrandSlam,
    Indoor,
    Outdoor,
    Tiebreak,
    VsLeftHanders,
    VsRightHanders,
    VsTop10,
}

impl Category {
    pub const ALL_VARIANTS: [Category; 17] = [
        Category::All,
        Category::Masters1000,
        Category::FifthSet,
        Category::AfterFirstSetWin,
        Category::Carpet,
        Category::Clay,
        Category::Hard,
        Category::Grass,
        Category::Finals,
        Category::FinalSet,
        Category::GrandSlam,
        Category::Indoor,
        Category::Outdoor,
        Category::Tiebreak,
        Category::VsLeftHanders,
        Category::VsRightHanders,
        Category::VsTop10,
    ];

    /// Token used in the source file.
    pub fn raw(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Masters1000 => "1000",
            Category::FifthSet => "5thset",
            Category::AfterFirstSetWin => "after1stsetwin",
            Category::Carpet => "carpet",
            Category::Clay => "clay",
            Category::Hard => "hard",
            Category::Grass => "grass",
            Category::Finals => "finals",
            Category::FinalSet => "finalset",
            Category::GrandSlam => "grandslam",
            Category::Indoor => "indoor",
            Category::Outdoor => "outdoor",
            Category::Tiebreak => "tiebreak",
            Category::VsLeftHanders => "vslefthanders",
            Category::VsRightHanders => "vsrighthanders",
            Category::VsTop10 => "vstop10",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Masters1000 => "Masters 1000",
            Category::FifthSet => "5th Set",
            Category::AfterFirstSetWin => "After Winning 1st Set",
            Category::Carpet => "Carpet",
            Category::Clay => "Clay",
            Category::Hard => "Hard",
            Category::Grass => "Grass",
            Category::Finals => "Finals",
            Category::FinalSet => "Final Set",
            Category::GrandSlam => "Grand Slams",
            Category::Indoor => "Indoors",
            Category::Outdoor => "Outdoors",
            Category::Tiebreak => "Tie Breaks",
            Category::VsLeftHanders => "Vs Left Handers",
            Category::VsRightHanders => "Vs Right Handers",
            Category::VsTop10 => "Vs Top 10",
        }
    }

    pub fn from_raw(raw: &str) -> Option<Category> {
        Category::ALL_VARIANTS.into_iter().find(|c| c.raw() == raw)
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL_VARIANTS.into_iter().find(|c| c.label() == label)
    }
}

// ---------------------------------------------------------------------------
// Time periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimePeriod {
    All,
    Career,
    Roll,
    Ytd,
}

impl TimePeriod {
    pub const ALL_VARIANTS: [TimePeriod; 4] = [
        TimePeriod::All,
        TimePeriod::Career,
        TimePeriod::Roll,
        TimePeriod::Ytd,
    ];

    pub fn raw(self) -> &'static str {
        match self {
            TimePeriod::All => "all",
            TimePeriod::Career => "career",
            TimePeriod::Roll => "roll",
            TimePeriod::Ytd => "ytd",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimePeriod::All => "All",
            TimePeriod::Career => "Career",
            TimePeriod::Roll => "52 Week",
            TimePeriod::Ytd => "Year to Date",
        }
    }

    pub fn from_raw(raw: &str) -> Option<TimePeriod> {
        TimePeriod::ALL_VARIANTS.into_iter().find(|t| t.raw() == raw)
    }

    pub fn from_label(label: &str) -> Option<TimePeriod> {
        TimePeriod::ALL_VARIANTS.into_iter().find(|t| t.label() == label)
    }
}

// ---------------------------------------------------------------------------
// Individual stat metric kinds
// ---------------------------------------------------------------------------

/// Stats of the per-stat table reported as a `Percentage`.
pub const RATE_STATS: &[&str] = &[
    "1st-Serve",
    "1st-Serve-Points-Won",
    "2nd-Serve-Points-Won",
    "Service-Games-Won",
    "Break-Points-Saved",
    "1st-Serve-Return-Points-Won",
    "2nd-Serve-Return-Points-Won",
    "Break-Points-Converted",
    "Return-Games-Won",
];

/// Rate stats read `Percentage`; everything else (aces) reads `Number`.
pub fn stat_metric(stat: &str) -> MetricKind {
    if RATE_STATS.contains(&stat) {
        MetricKind::Rate
    } else {
        MetricKind::Count
    }
}

/// Display name of a country token (`all` shows as `All`).
pub fn country_label(raw: &str) -> String {
    if raw == crate::filter::ALL {
        "All".to_string()
    } else {
        raw.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
