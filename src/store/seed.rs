//! Reference data: registers, season, teams, day defaults

use super::Store;
use crate::config::{DayPolicy, ImportConfig};
use crate::error::{Result, TourneyError};
use crate::model::{SeasonId, Side};
use rusqlite::{params, OptionalExtension};
use serde_json::json;

/// (code, name, min per side, max per side)
const GAME_MODES: [(&str, &str, i64, i64); 3] = [
    ("individual", "Singles", 1, 1),
    ("team", "Texas Scramble", 2, 2),
    ("group", "Group Play", 2, 4),
];

/// Insert game modes, scoring modes and handicap policies if missing
pub fn seed_registers(store: &Store) -> Result<()> {
    let conn = store.connection();

    for (code, name, min, max) in GAME_MODES {
        conn.execute(
            "INSERT INTO game_modes (code, name, min_players_per_side, max_players_per_side)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (code) DO NOTHING",
            params![code, name, min, max],
        )?;
    }

    let scoring_modes = [
        ("match_play", "Match Play", 1, json!({})),
        ("stroke_play", "Stroke Play", 0, json!({})),
        ("stableford", "Stableford", 0, json!({ "points": [0, 1, 2, 3, 4, 5] })),
    ];
    for (code, name, per_hole, rules) in scoring_modes {
        conn.execute(
            "INSERT INTO scoring_modes (code, name, per_hole_result, rules_json)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (code) DO NOTHING",
            params![code, name, per_hole, rules.to_string()],
        )?;
    }

    let hcp_policies = [
        ("gross", "Bez HCP", json!({})),
        ("net_dacan", "Dacan Net", json!({ "cap": 36 })),
        ("texas_share_3_8", "Texas 3/8", json!({ "share": 0.375, "cap": 36 })),
    ];
    for (code, name, rules) in hcp_policies {
        conn.execute(
            "INSERT INTO hcp_policies (code, name, rules_json)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (code) DO NOTHING",
            params![code, name, rules.to_string()],
        )?;
    }

    log::info!("Registers seeded");
    Ok(())
}

fn register_id(store: &Store, table: &str, code: &str) -> Result<i64> {
    store
        .connection()
        .query_row(
            &format!("SELECT id FROM {} WHERE code = ?1", table),
            [code],
            |r| r.get(0),
        )
        .optional()?
        .ok_or_else(|| TourneyError::Config(format!("unknown {} code '{}'", table, code)))
}

/// Insert the configured season with red/blue teams and the day 1/day 2
/// schedule defaults. Existing rows are left untouched.
pub fn seed_season(store: &Store, config: &ImportConfig) -> Result<SeasonId> {
    let conn = store.connection();

    conn.execute(
        "INSERT INTO seasons (year, name) VALUES (?1, ?2) ON CONFLICT (year) DO NOTHING",
        params![config.season.year, config.season.name],
    )?;
    let season_id: i64 = conn.query_row(
        "SELECT id FROM seasons WHERE year = ?1",
        [config.season.year],
        |r| r.get(0),
    )?;

    for side in Side::ALL {
        let name = match side {
            Side::Red => "Red Team",
            Side::Blue => "Blue Team",
        };
        conn.execute(
            "INSERT INTO teams (season_id, code, name) VALUES (?1, ?2, ?3)
             ON CONFLICT (season_id, code) DO NOTHING",
            params![season_id, side.code(), name],
        )?;
    }

    let days: [(i64, &DayPolicy); 2] = [(1, &config.defaults.day1), (2, &config.defaults.day2)];
    for (day, policy) in days {
        let game_mode = register_id(store, "game_modes", &policy.game_mode)?;
        let scoring_mode = register_id(store, "scoring_modes", &policy.scoring_mode)?;
        let hcp_policy = register_id(store, "hcp_policies", &policy.hcp_policy)?;
        conn.execute(
            "INSERT INTO round_schedule
                (season_id, day_number, default_game_mode_id, default_scoring_mode_id, default_hcp_policy_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (season_id, day_number) DO NOTHING",
            params![season_id, day, game_mode, scoring_mode, hcp_policy],
        )?;
    }

    log::info!("Season {} seeded (id {})", config.season.year, season_id);
    Ok(SeasonId(season_id))
}

/// Schema, registers and season in one go
pub fn seed_all(store: &Store, config: &ImportConfig) -> Result<SeasonId> {
    store.migrate()?;
    seed_registers(store)?;
    seed_season(store, config)
}
