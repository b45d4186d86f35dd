use super::context::ImportContext;
use crate::error::Result;
use crate::model::SeasonId;
use crate::sheet::{LeaderboardRow, Workbook};
use rusqlite::types::Value;

/// Optional Leaderboard sheet: team points, last import wins
pub fn import_leaderboard(ctx: &mut ImportContext, workbook: &Workbook, season: SeasonId) -> Result<()> {
    let config = ctx.config;

    for row in workbook.rows(&config.sheets.leaderboard) {
        let entry = LeaderboardRow::from_row(row, &config.columns.leaderboard);
        let (side, points) = match (entry.team, entry.points) {
            (Some(side), Some(points)) => (side, points),
            _ => {
                log::debug!("Skipping leaderboard row {:?}", entry);
                continue;
            }
        };

        ctx.execute(
            "INSERT INTO tournament_points (season_id, side, points)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (season_id, side) DO UPDATE SET points = excluded.points",
            &[Value::from(season), Value::from(side.code().to_string()), Value::from(points)],
        )?;
        ctx.report.counts.leaderboard += 1;
    }

    Ok(())
}
