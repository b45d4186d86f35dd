use super::context::ImportContext;
use super::report::MatchEntry;
use crate::error::Result;
use crate::model::{CourseId, MatchId, MatchStatus, PlayerId, SeasonId, Side};
use crate::sheet::{GameRow, ResultRow, Workbook};
use rusqlite::types::Value;
use std::collections::HashMap;

/// A match row after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResolution {
    pub id: MatchId,
    pub course: Option<CourseId>,
}

/// Results rows grouped by game ID
pub fn group_results(workbook: &Workbook, ctx: &ImportContext) -> HashMap<String, Vec<ResultRow>> {
    let columns = &ctx.config.columns.results;
    let mut grouped: HashMap<String, Vec<ResultRow>> = HashMap::new();
    for row in workbook.rows(&ctx.config.sheets.results) {
        let result = ResultRow::from_row(row, columns);
        if result.game_id.is_empty() {
            continue;
        }
        grouped.entry(result.game_id.clone()).or_default().push(result);
    }
    grouped
}

/// Games and Results sheets. `limit` caps the Games rows looked at; 0 means all.
pub fn import_games(ctx: &mut ImportContext, workbook: &Workbook, season: SeasonId, limit: usize) -> Result<()> {
    let config = ctx.config;
    let rows = workbook.rows(&config.sheets.games);
    let take = if limit == 0 { rows.len() } else { limit.min(rows.len()) };
    log::info!("Importing {} of {} game rows", take, rows.len());

    let results = group_results(workbook, ctx);

    for row in &rows[..take] {
        let game = GameRow::from_row(row, &config.columns.games);
        let legacy = match &game.legacy_id {
            Some(legacy) => legacy.clone(),
            None => {
                log::debug!("Skipping game row without an ID");
                continue;
            }
        };

        let resolved = match resolve_or_create_match(ctx, &game, season)? {
            Some(resolved) => resolved,
            None => continue,
        };
        ctx.report.counts.matches += 1;

        for side in Side::ALL {
            let written = reconcile_participants(ctx, resolved.id, side, game.names(side))?;
            ctx.report.counts.participants += written;
        }

        if let Some(holes) = results.get(&legacy) {
            for result in holes {
                if upsert_score(ctx, &resolved, result)? {
                    ctx.report.counts.scores += 1;
                }
            }
        }

        ctx.report.matches.push(MatchEntry {
            legacy,
            match_id: resolved.id,
            red: game.red.clone(),
            blue: game.blue.clone(),
        });
    }

    Ok(())
}

/// Find the match by legacy ID or create it. The row's course is resolved
/// on every run; a stored match without a course picks it up, and scores
/// are placed on the row's course when it resolves.
pub fn resolve_or_create_match(
    ctx: &mut ImportContext,
    game: &GameRow,
    season: SeasonId,
) -> Result<Option<MatchResolution>> {
    let legacy = match &game.legacy_id {
        Some(legacy) => legacy.clone(),
        None => return Ok(None),
    };

    let course = if game.course_legacy_id.is_empty() {
        None
    } else {
        let id = ctx.lookups.course(&game.course_legacy_id);
        if id.is_none() {
            ctx.report.missed_course(&game.course_legacy_id);
        }
        id
    };

    if let Some(found) = find_match(ctx, &legacy)? {
        log::debug!("Match {} already stored as {}", legacy, found.id);
        if let (None, Some(resolved)) = (found.course, course) {
            ctx.execute(
                "UPDATE matches SET course_id = COALESCE(course_id, ?1) WHERE id = ?2",
                &[Value::from(resolved), Value::from(found.id)],
            )?;
            log::info!("Match {} now on course {}", legacy, resolved);
        }
        return Ok(Some(MatchResolution {
            id: found.id,
            course: course.or(found.course),
        }));
    }

    let status = game.parsed_status().unwrap_or_else(|| {
        log::warn!(
            "Match {}: unrecognized status '{}', using {}",
            legacy,
            game.status.as_deref().unwrap_or(""),
            MatchStatus::Finished
        );
        MatchStatus::Finished
    });

    let inserted = ctx.query_id(
        "INSERT INTO matches (legacy_id, season_id, course_id, stage, status)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (legacy_id) DO NOTHING
         RETURNING id",
        &[
            Value::from(legacy.clone()),
            Value::from(season),
            Value::from(course),
            Value::from(game.stage.clone()),
            Value::from(status.code().to_string()),
        ],
    )?;

    match inserted {
        Some(id) => {
            log::debug!("Created match {} ({})", legacy, id);
            Ok(Some(MatchResolution { id: MatchId(id), course }))
        }
        None => Ok(find_match(ctx, &legacy)?.map(|found| MatchResolution {
            id: found.id,
            course: course.or(found.course),
        })),
    }
}

fn find_match(ctx: &mut ImportContext, legacy: &str) -> Result<Option<MatchResolution>> {
    let found = ctx.query_map(
        "SELECT id, course_id FROM matches WHERE legacy_id = ?1 LIMIT 1",
        &[Value::from(legacy.to_string())],
        |r| {
            Ok(MatchResolution {
                id: MatchId(r.get(0)?),
                course: r.get::<_, Option<i64>>(1)?.map(CourseId),
            })
        },
    )?;
    Ok(found.into_iter().next())
}

/// Replace one side's participants. Unresolved names keep their slot with
/// a null player. Returns the number of rows written.
pub fn reconcile_participants(
    ctx: &mut ImportContext,
    match_id: MatchId,
    side: Side,
    names: &[String],
) -> Result<usize> {
    ctx.execute(
        "DELETE FROM match_participants WHERE match_id = ?1 AND side = ?2",
        &[Value::from(match_id), Value::from(side.code().to_string())],
    )?;

    for (index, name) in names.iter().enumerate() {
        let player: Option<PlayerId> = ctx.resolve_name(name);
        if player.is_none() {
            ctx.report.unknown_player(name);
        }

        ctx.execute(
            "INSERT INTO match_participants (match_id, side, player_id, order_in_side, hcp_at_match)
             VALUES (?1, ?2, ?3, ?4, (SELECT hcp_current FROM players WHERE id = ?3))",
            &[
                Value::from(match_id),
                Value::from(side.code().to_string()),
                Value::from(player),
                Value::from(index as i64 + 1),
            ],
        )?;
    }

    Ok(names.len())
}

/// Upsert the strokes for one hole of a match; last import wins.
/// Returns false when the row was skipped.
pub fn upsert_score(ctx: &mut ImportContext, resolved: &MatchResolution, result: &ResultRow) -> Result<bool> {
    let number = match result.hole_number {
        Some(n) if n > 0 => n,
        _ => return Ok(false),
    };

    let hole = match ctx.lookups.hole(resolved.course, number) {
        Some(hole) => hole,
        None => {
            ctx.report.missed_hole(resolved.course, number);
            return Ok(false);
        }
    };

    ctx.execute(
        "INSERT INTO scores (match_id, hole_id, red_score, blue_score, client_id)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (match_id, hole_id) DO UPDATE SET
            red_score = excluded.red_score,
            blue_score = excluded.blue_score",
        &[
            Value::from(resolved.id),
            Value::from(hole),
            Value::from(result.red_score),
            Value::from(result.blue_score),
            Value::from(uuid::Uuid::new_v4().to_string()),
        ],
    )?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportConfig;
    use crate::import::testing::{count, seeded_store};
    use crate::resolve::ExactNameResolver;
    use crate::sheet::Row;

    fn game(id: &str, course: &str, red: &str, blue: &str) -> GameRow {
        let row = Row::new()
            .with("ID", id)
            .with("FieldID", course)
            .with("Red", red)
            .with("Blue", blue);
        GameRow::from_row(&row, &ImportConfig::default().columns.games)
    }

    fn participants(store: &crate::store::Store, match_id: MatchId, side: &str) -> Vec<(i64, Option<i64>)> {
        let mut stmt = store
            .connection()
            .prepare(
                "SELECT order_in_side, player_id FROM match_participants
                 WHERE match_id = ?1 AND side = ?2 ORDER BY order_in_side",
            )
            .unwrap();
        stmt.query_map(rusqlite::params![match_id.0, side], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_pair_order_and_unknown_names() {
        let store = seeded_store();
        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, &store);
        let season = ctx.load_season().unwrap();
        ctx.set_name_resolver(Box::new(ExactNameResolver::new([
            (PlayerId(10), "Šutko"),
            (PlayerId(11), "Trnka"),
        ])));
        for (id, name) in [(10, "Šutko"), (11, "Trnka")] {
            store
                .connection()
                .execute("INSERT INTO players (id, full_name) VALUES (?1, ?2)", rusqlite::params![id, name])
                .unwrap();
        }

        let g = game("G1", "", "Šutko & Trnka", "Nobody &  & Trnka");
        let resolved = resolve_or_create_match(&mut ctx, &g, season).unwrap().unwrap();
        reconcile_participants(&mut ctx, resolved.id, Side::Red, g.names(Side::Red)).unwrap();
        reconcile_participants(&mut ctx, resolved.id, Side::Blue, g.names(Side::Blue)).unwrap();

        assert_eq!(participants(&store, resolved.id, "red"), vec![(1, Some(10)), (2, Some(11))]);
        assert_eq!(participants(&store, resolved.id, "blue"), vec![(1, None), (2, Some(11))]);
        assert!(ctx.report.unknown_players.contains("Nobody"));

        // Re-running replaces rather than appends
        reconcile_participants(&mut ctx, resolved.id, Side::Red, g.names(Side::Red)).unwrap();
        assert_eq!(count(&store, "match_participants"), 4);
    }

    #[test]
    fn test_unknown_course_creates_match_with_null_course() {
        let store = seeded_store();
        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, &store);
        let season = ctx.load_season().unwrap();

        let resolved = resolve_or_create_match(&mut ctx, &game("G7", "F404", "", ""), season)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.course, None);
        assert!(ctx.report.missed_courses.contains("F404"));

        let again = resolve_or_create_match(&mut ctx, &game("G7", "F404", "", ""), season)
            .unwrap()
            .unwrap();
        assert_eq!(again, resolved);
        assert_eq!(count(&store, "matches"), 1);
    }

    #[test]
    fn test_existing_match_picks_up_new_course() {
        let store = seeded_store();
        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, &store);
        let season = ctx.load_season().unwrap();
        let first = resolve_or_create_match(&mut ctx, &game("G7", "F404", "", ""), season)
            .unwrap()
            .unwrap();
        assert_eq!(first.course, None);

        store
            .connection()
            .execute("INSERT INTO courses (legacy_id, name) VALUES ('F404', 'Late Field')", [])
            .unwrap();
        let mut ctx = ImportContext::new(&config, &store);
        ctx.load_course_dictionary().unwrap();
        let course = ctx.lookups.course("F404");
        assert!(course.is_some());

        let again = resolve_or_create_match(&mut ctx, &game("G7", "F404", "", ""), season)
            .unwrap()
            .unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.course, course);
        assert!(ctx.report.missed_courses.is_empty());

        let stored: Option<i64> = store
            .connection()
            .query_row("SELECT course_id FROM matches WHERE id = ?1", [first.id.0], |r| r.get(0))
            .unwrap();
        assert_eq!(stored.map(CourseId), course);
    }

    #[test]
    fn test_status_defaults_and_fallback() {
        let store = seeded_store();
        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, &store);
        let season = ctx.load_season().unwrap();

        let mut odd = game("G2", "", "", "");
        odd.status = Some("postponed".to_string());
        let mut live = game("G3", "", "", "");
        live.status = Some("In progress".to_string());
        let a = resolve_or_create_match(&mut ctx, &odd, season).unwrap().unwrap();
        let b = resolve_or_create_match(&mut ctx, &live, season).unwrap().unwrap();

        let status = |id: MatchId| -> String {
            store
                .connection()
                .query_row("SELECT status FROM matches WHERE id = ?1", [id.0], |r| r.get(0))
                .unwrap()
        };
        assert_eq!(status(a.id), "finished");
        assert_eq!(status(b.id), "in_progress");
    }

    #[test]
    fn test_game_without_id_is_skipped() {
        let store = seeded_store();
        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, &store);
        let season = ctx.load_season().unwrap();

        let mut g = game("", "F1", "A", "B");
        g.legacy_id = None;
        assert_eq!(resolve_or_create_match(&mut ctx, &g, season).unwrap(), None);
        assert_eq!(count(&store, "matches"), 0);
    }

    #[test]
    fn test_score_without_course_is_missed() {
        let store = seeded_store();
        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, &store);
        let season = ctx.load_season().unwrap();
        let resolved = resolve_or_create_match(&mut ctx, &game("G1", "", "", ""), season)
            .unwrap()
            .unwrap();

        let result = ResultRow {
            game_id: "G1".to_string(),
            hole_number: Some(4),
            red_score: Some(3),
            blue_score: Some(5),
        };
        assert!(!upsert_score(&mut ctx, &resolved, &result).unwrap());
        assert!(ctx.report.missed_holes.contains("course:none-hole:4"));

        let blank = ResultRow { hole_number: None, ..result };
        assert!(!upsert_score(&mut ctx, &resolved, &blank).unwrap());
        assert_eq!(ctx.report.missed_holes.len(), 1);
        assert_eq!(count(&store, "scores"), 0);
    }

    #[test]
    fn test_group_results_by_game() {
        let store = seeded_store();
        let config = ImportConfig::default();
        let ctx = ImportContext::new(&config, &store);
        let wb = Workbook::from_sheets([(
            "Results",
            vec![
                Row::new().with("GameID", "G1").with("Hole", 1.0),
                Row::new().with("GameID", "G2").with("Hole", 1.0),
                Row::new().with("GameID", "G1").with("Hole", 2.0),
                Row::new().with("Hole", 3.0),
            ],
        )]);
        let grouped = group_results(&wb, &ctx);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["G1"].len(), 2);
        assert_eq!(grouped["G1"][1].hole_number, Some(2));
    }
}
