// Dashboard built over the core crate's fixture tables.

use atp_core::config::{CacheConfig, DashboardConfig, DataPaths, DefaultsConfig, Thresholds};

use crate::app::Dashboard;

pub const FIXTURES: &str = "../atp-core/tests/fixtures";

pub fn test_config() -> DashboardConfig {
    let fixture = |name: &str| format!("{FIXTURES}/{name}");
    DashboardConfig {
        data: DataPaths {
            serve_ratings: fixture("serve.csv"),
            return_ratings: fixture("return.csv"),
            pressure_ratings: fixture("pressure.csv"),
            player_stats: fixture("player_stats.csv.gz"),
            win_loss: fixture("win_loss.csv"),
        },
        cache: CacheConfig { ttl_secs: 3600 },
        defaults: DefaultsConfig {
            players: vec![
                "Roger Federer".into(),
                "Novak Djokovic".into(),
                "Rafael Nadal".into(),
            ],
            individual_time: "career".into(),
            individual_top_n: 10,
            win_loss_top_n: 10,
            min_wins: 10,
        },
        thresholds: Thresholds::default(),
    }
}

pub fn dashboard() -> Dashboard {
    Dashboard::load(test_config()).expect("fixtures should load")
}
