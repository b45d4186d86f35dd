use super::context::ImportContext;
use crate::error::Result;
use crate::model::name::optional_name_key;
use crate::model::{PlayerId, SeasonId, Side};
use crate::sheet::{PlayerRow, Workbook};
use rusqlite::types::Value;

/// Players sheet: resolve or create every player and link it to the season
pub fn import_players(ctx: &mut ImportContext, workbook: &Workbook, season: SeasonId) -> Result<()> {
    let config = ctx.config;
    let rows = workbook.rows(&config.sheets.players);
    log::info!("Importing {} player rows", rows.len());

    for row in rows {
        let player = PlayerRow::from_row(row, &config.columns.players);
        match resolve_or_create_player(ctx, &player)? {
            Some(id) => {
                ensure_player_season(ctx, id, season, player.team)?;
                ctx.report.counts.players += 1;
            }
            None => log::debug!("Skipping player row without ID or name"),
        }
    }

    Ok(())
}

/// Legacy ID first, then normalized full name, then insert. A conflicting
/// insert falls back to the row that won.
pub fn resolve_or_create_player(ctx: &mut ImportContext, player: &PlayerRow) -> Result<Option<PlayerId>> {
    if !player.has_identity() {
        return Ok(None);
    }
    let key = optional_name_key(&player.full_name);

    if let Some(legacy) = &player.legacy_id {
        let found = ctx.query_id(
            "SELECT id FROM players WHERE legacy_id = ?1 LIMIT 1",
            &[Value::from(legacy.clone())],
        )?;
        if let Some(id) = found {
            log::debug!("Player '{}' matched legacy ID {}", player.full_name, legacy);
            return Ok(Some(PlayerId(id)));
        }
    }

    if let Some(key) = &key {
        let found = ctx.query_id(
            "SELECT id FROM players WHERE name_key = ?1 LIMIT 1",
            &[Value::from(key.clone())],
        )?;
        if let Some(id) = found {
            log::debug!("Player '{}' matched by name", player.full_name);
            return Ok(Some(PlayerId(id)));
        }
    }

    let inserted = ctx.query_id(
        "INSERT INTO players
            (legacy_id, first_name, last_name, full_name, name_key, hcp_current, size_label, phone, photo_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT DO NOTHING
         RETURNING id",
        &[
            Value::from(player.legacy_id.clone()),
            Value::from(player.first_name.clone()),
            Value::from(player.last_name.clone()),
            Value::from(player.full_name.clone()),
            Value::from(key.clone()),
            Value::from(player.hcp),
            Value::from(player.size.clone()),
            Value::from(player.phone.clone()),
            Value::from(player.photo.clone()),
        ],
    )?;
    if let Some(id) = inserted {
        log::debug!("Created player '{}' ({})", player.full_name, id);
        return Ok(Some(PlayerId(id)));
    }

    let existing = ctx.query_id(
        "SELECT id FROM players WHERE name_key = ?1 OR legacy_id = ?2 LIMIT 1",
        &[Value::from(key), Value::from(player.legacy_id.clone())],
    )?;
    Ok(existing.map(PlayerId))
}

/// Link a player to the season; a blank team keeps the stored one
pub fn ensure_player_season(
    ctx: &mut ImportContext,
    player: PlayerId,
    season: SeasonId,
    team: Option<Side>,
) -> Result<()> {
    let team_id = match team {
        Some(side) => ctx.query_id(
            "SELECT id FROM teams WHERE season_id = ?1 AND code = ?2",
            &[Value::from(season), Value::from(side.code().to_string())],
        )?,
        None => None,
    };

    ctx.execute(
        "INSERT INTO player_season (player_id, season_id, team_id)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (player_id, season_id)
         DO UPDATE SET team_id = COALESCE(excluded.team_id, player_season.team_id)",
        &[Value::from(player), Value::from(season), Value::from(team_id)],
    )?;
    Ok(())
}
