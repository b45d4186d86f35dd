//! The reconciling import: each sheet is folded into the store in
//! dependency order, and every miss is collected into the run report.

pub mod context;
pub mod courses;
pub mod leaderboard;
pub mod matches;
pub mod players;
pub mod report;
pub mod schedule;

pub use context::{ImportContext, Lookups};
pub use report::{ImportCounts, ImportReport, MatchEntry, StatementFailure};

use crate::error::Result;
use crate::sheet::Workbook;

/// Per-run switches from the command line
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Run everything inside a transaction that is rolled back
    pub dry_run: bool,
    /// Cap on Games rows; 0 means no cap
    pub limit: usize,
    /// Let participant names match a unique surname
    pub surname_fallback: bool,
}

/// Import a whole workbook. On error the context's report still holds
/// everything gathered up to the failure.
pub fn run(ctx: &mut ImportContext, workbook: &Workbook, options: &ImportOptions) -> Result<()> {
    if !options.dry_run {
        return run_phases(ctx, workbook, options);
    }

    ctx.report.dry_run = true;
    ctx.store().begin_dry_run()?;
    let result = run_phases(ctx, workbook, options);
    let rolled_back = ctx.store().rollback();
    log::info!("Dry run, all changes rolled back");
    result.and(rolled_back)
}

fn run_phases(ctx: &mut ImportContext, workbook: &Workbook, options: &ImportOptions) -> Result<()> {
    let season = ctx.load_season()?;
    log::info!("Importing into season {} ({})", ctx.config.season.year, season);

    players::import_players(ctx, workbook, season)?;
    courses::import_courses(ctx, workbook)?;
    ctx.load_course_dictionary()?;
    courses::import_holes(ctx, workbook)?;

    ctx.load_lookups()?;
    ctx.load_name_index(options.surname_fallback)?;

    schedule::import_schedule(ctx, workbook, season)?;
    matches::import_games(ctx, workbook, season, options.limit)?;
    leaderboard::import_leaderboard(ctx, workbook, season)?;

    log::info!("{}", ctx.report.summary());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::{count, seeded_store, tournament_workbook};
    use super::*;
    use crate::config::ImportConfig;
    use crate::error::TourneyError;
    use crate::sheet::Row;
    use crate::store::Store;

    fn import(store: &Store, options: &ImportOptions) -> ImportReport {
        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, store);
        run(&mut ctx, &tournament_workbook(), options).unwrap();
        ctx.report
    }

    fn scores(store: &Store) -> Vec<(String, i64, Option<i64>, Option<i64>)> {
        let mut stmt = store
            .connection()
            .prepare(
                "SELECT m.legacy_id, h.hole_number, s.red_score, s.blue_score
                 FROM scores s
                 JOIN matches m ON m.id = s.match_id
                 JOIN holes h ON h.id = s.hole_id
                 ORDER BY m.legacy_id, h.hole_number",
            )
            .unwrap();
        stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_full_import() {
        let store = seeded_store();
        let report = import(&store, &ImportOptions::default());

        assert_eq!(count(&store, "players"), 4);
        assert_eq!(count(&store, "player_season"), 4);
        assert_eq!(count(&store, "courses"), 1);
        assert_eq!(count(&store, "holes"), 18);
        assert_eq!(count(&store, "matches"), 2);
        assert_eq!(count(&store, "match_participants"), 6);
        assert_eq!(count(&store, "tournament_points"), 2);
        assert_eq!(
            scores(&store),
            vec![
                ("G1".to_string(), 1, Some(4), Some(5)),
                ("G1".to_string(), 2, Some(3), Some(3)),
            ]
        );

        let course: i64 = store
            .connection()
            .query_row("SELECT id FROM courses WHERE legacy_id = 'F1'", [], |r| r.get(0))
            .unwrap();
        let missed: Vec<&str> = report.missed_holes.iter().map(String::as_str).collect();
        assert_eq!(missed, vec![format!("course:{}-hole:99", course).as_str(), "course:none-hole:1"]);
        assert!(report.missed_courses.contains("F9"));
        assert_eq!(report.unknown_players.iter().collect::<Vec<_>>(), vec!["Zeman"]);
        assert!(report.errors.is_empty());
        assert!(!report.dry_run);

        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.matches[0].legacy, "G1");
        assert_eq!(report.matches[0].red, vec!["Šutko", "Jan Trnka"]);
        assert_eq!(report.counts.scores, 2);
        assert_eq!(report.counts.participants, 6);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let store = seeded_store();
        let first_report = import(&store, &ImportOptions::default());
        let counts = store.table_counts().unwrap();
        let first = scores(&store);

        let report = import(&store, &ImportOptions::default());
        assert_eq!(store.table_counts().unwrap(), counts);
        assert_eq!(scores(&store), first);
        assert_eq!(count(&store, "player_season"), 4);
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.missed_courses, first_report.missed_courses);
        assert_eq!(report.missed_holes, first_report.missed_holes);
        assert_eq!(report.unknown_players, first_report.unknown_players);
        assert!(report.missed_courses.contains("F9"));
    }

    #[test]
    fn test_course_added_later_receives_scores() {
        let store = seeded_store();
        import(&store, &ImportOptions::default());

        let base = tournament_workbook();
        let mut sheets: Vec<(String, Vec<Row>)> = ["Players", "Games", "Results", "Leaderboard"]
            .iter()
            .map(|name| (name.to_string(), base.rows(name).to_vec()))
            .collect();
        let mut courses = base.rows("Field difficulty").to_vec();
        courses.push(Row::new().with("FieldID", "F9").with("Field Name", "Kravsko"));
        let mut holes = base.rows("Field holes").to_vec();
        holes.push(Row::new().with("FieldID", "F9").with("Hole", 1.0).with("Par", 4.0));
        sheets.push(("Field difficulty".to_string(), courses));
        sheets.push(("Field holes".to_string(), holes));

        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, &store);
        run(&mut ctx, &Workbook::from_sheets(sheets), &ImportOptions::default()).unwrap();

        assert!(ctx.report.missed_courses.is_empty());
        assert!(!ctx.report.missed_holes.contains("course:none-hole:1"));
        assert!(scores(&store).contains(&("G2".to_string(), 1, Some(5), Some(4))));
        let course: Option<i64> = store
            .connection()
            .query_row("SELECT course_id FROM matches WHERE legacy_id = 'G2'", [], |r| r.get(0))
            .unwrap();
        assert!(course.is_some());
    }

    #[test]
    fn test_pair_order_in_participants() {
        let store = seeded_store();
        import(&store, &ImportOptions::default());

        let names: Vec<String> = {
            let mut stmt = store
                .connection()
                .prepare(
                    "SELECT p.full_name FROM match_participants mp
                     JOIN matches m ON m.id = mp.match_id
                     JOIN players p ON p.id = mp.player_id
                     WHERE m.legacy_id = 'G1' AND mp.side = 'red'
                     ORDER BY mp.order_in_side",
                )
                .unwrap();
            stmt.query_map([], |r| r.get(0))
                .unwrap()
                .collect::<rusqlite::Result<Vec<_>>>()
                .unwrap()
        };
        assert_eq!(names, vec!["Šutko", "Jan Trnka"]);

        let hcp: Option<f64> = store
            .connection()
            .query_row(
                "SELECT mp.hcp_at_match FROM match_participants mp
                 JOIN matches m ON m.id = mp.match_id
                 WHERE m.legacy_id = 'G1' AND mp.side = 'red' AND mp.order_in_side = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(hcp, Some(10.4));
    }

    #[test]
    fn test_unknown_course_match_has_null_course() {
        let store = seeded_store();
        import(&store, &ImportOptions::default());
        let (course, status): (Option<i64>, String) = store
            .connection()
            .query_row("SELECT course_id, status FROM matches WHERE legacy_id = 'G2'", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(course, None);
        assert_eq!(status, "in_progress");
    }

    #[test]
    fn test_limit_caps_game_rows() {
        let store = seeded_store();
        let report = import(
            &store,
            &ImportOptions {
                limit: 1,
                ..ImportOptions::default()
            },
        );
        assert_eq!(count(&store, "matches"), 1);
        assert_eq!(report.matches.len(), 1);
        assert!(report.unknown_players.is_empty());
    }

    #[test]
    fn test_dry_run_leaves_store_untouched() {
        let store = seeded_store();
        let before = store.table_counts().unwrap();
        let report = import(
            &store,
            &ImportOptions {
                dry_run: true,
                ..ImportOptions::default()
            },
        );

        assert!(report.dry_run);
        assert_eq!(report.counts.matches, 2);
        assert_eq!(store.table_counts().unwrap(), before);
        assert!(store.connection().is_autocommit());
    }

    #[test]
    fn test_missing_season_aborts() {
        let store = seeded_store();
        let mut config = ImportConfig::default();
        config.season.year = 2031;
        let mut ctx = ImportContext::new(&config, &store);
        let err = run(&mut ctx, &tournament_workbook(), &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, TourneyError::SeasonNotFound(2031)));
        assert_eq!(count(&store, "players"), 0);
    }

    #[test]
    fn test_surname_fallback_resolves_short_names() {
        let store = seeded_store();
        let config = ImportConfig::default();
        let mut ctx = ImportContext::new(&config, &store);
        let base = tournament_workbook();
        let mut sheets: Vec<(String, Vec<Row>)> = ["Players", "Field difficulty", "Field holes"]
            .iter()
            .map(|name| (name.to_string(), base.rows(name).to_vec()))
            .collect();
        sheets.push((
            "Games".to_string(),
            vec![Row::new().with("ID", "G5").with("FieldID", "F1").with("Red", "Trnka").with("Blue", "Marek")],
        ));
        let wb = Workbook::from_sheets(sheets);

        run(
            &mut ctx,
            &wb,
            &ImportOptions {
                surname_fallback: true,
                ..ImportOptions::default()
            },
        )
        .unwrap();
        assert!(ctx.report.unknown_players.is_empty());
    }
}
