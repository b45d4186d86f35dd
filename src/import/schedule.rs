use super::context::ImportContext;
use crate::error::Result;
use crate::model::SeasonId;
use crate::sheet::{ScheduleRow, Workbook};
use rusqlite::types::Value;
use std::collections::HashMap;

/// Optional This_year_field sheet: fill in day defaults that are still empty
pub fn import_schedule(ctx: &mut ImportContext, workbook: &Workbook, season: SeasonId) -> Result<()> {
    let config = ctx.config;
    let rows = workbook.rows(&config.sheets.schedule);
    if rows.is_empty() {
        log::info!("No schedule rows, keeping seeded day defaults");
        return Ok(());
    }

    for row in rows {
        let day = ScheduleRow::from_row(row, &config.columns.schedule);
        if coalesce_schedule_day(ctx, season, &day)? {
            ctx.report.counts.schedule_days += 1;
        }
    }

    Ok(())
}

fn register_id(register: &HashMap<String, i64>, kind: &str, code: Option<&str>) -> Option<i64> {
    let code = code?;
    let id = register.get(code).copied();
    if id.is_none() {
        log::warn!("Unknown {} code '{}'", kind, code);
    }
    id
}

/// Upsert one (season, day) row. Existing non-null fields are never
/// replaced and nulls are never written over values.
pub fn coalesce_schedule_day(ctx: &mut ImportContext, season: SeasonId, row: &ScheduleRow) -> Result<bool> {
    let day = match row.day {
        Some(d) if d > 0 => d,
        _ => return Ok(false),
    };

    let course = match row.course_legacy_id.as_deref() {
        Some(legacy) => {
            let id = ctx.lookups.course(legacy);
            if id.is_none() {
                ctx.report.missed_course(legacy);
            }
            id
        }
        None => None,
    };

    let game_mode = register_id(&ctx.lookups.game_modes, "game mode", row.game_mode.as_deref());
    let scoring_mode = register_id(&ctx.lookups.scoring_modes, "scoring mode", row.scoring_mode.as_deref());
    let hcp_policy = register_id(&ctx.lookups.hcp_policies, "handicap policy", row.hcp_policy.as_deref());

    ctx.execute(
        "INSERT INTO round_schedule
            (season_id, day_number, course_id, default_game_mode_id, default_scoring_mode_id, default_hcp_policy_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (season_id, day_number) DO UPDATE SET
            course_id = COALESCE(round_schedule.course_id, excluded.course_id),
            default_game_mode_id = COALESCE(round_schedule.default_game_mode_id, excluded.default_game_mode_id),
            default_scoring_mode_id = COALESCE(round_schedule.default_scoring_mode_id, excluded.default_scoring_mode_id),
            default_hcp_policy_id = COALESCE(round_schedule.default_hcp_policy_id, excluded.default_hcp_policy_id)",
        &[
            Value::from(season),
            Value::from(day),
            Value::from(course),
            Value::from(game_mode),
            Value::from(scoring_mode),
            Value::from(hcp_policy),
        ],
    )?;
    Ok(true)
}
