use super::report::{ImportReport, StatementFailure};
use crate::config::ImportConfig;
use crate::error::{Result, TourneyError};
use crate::model::{CourseId, HoleId, PlayerId, SeasonId};
use crate::resolve::{ExactNameResolver, NameResolver, SurnameFallback};
use crate::store::{param_to_json, Store};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::collections::HashMap;

/// Read-only snapshots taken once per run
#[derive(Debug, Default)]
pub struct Lookups {
    /// Course legacy ID -> course
    pub courses: HashMap<String, CourseId>,
    pub game_modes: HashMap<String, i64>,
    pub scoring_modes: HashMap<String, i64>,
    pub hcp_policies: HashMap<String, i64>,
    /// Course -> hole number -> hole
    pub holes: HashMap<CourseId, HashMap<i64, HoleId>>,
}

impl Lookups {
    pub fn course(&self, legacy_id: &str) -> Option<CourseId> {
        self.courses.get(legacy_id).copied()
    }

    pub fn hole(&self, course: Option<CourseId>, hole_number: i64) -> Option<HoleId> {
        self.holes.get(&course?)?.get(&hole_number).copied()
    }
}

/// Everything one import run works with: configuration, the store handle,
/// the accumulating report and the per-run snapshots.
pub struct ImportContext<'a> {
    pub config: &'a ImportConfig,
    store: &'a Store,
    pub report: ImportReport,
    pub lookups: Lookups,
    names: Box<dyn NameResolver + 'a>,
}

impl<'a> ImportContext<'a> {
    pub fn new(config: &'a ImportConfig, store: &'a Store) -> Self {
        Self {
            config,
            store,
            report: ImportReport::default(),
            lookups: Lookups::default(),
            names: Box::new(ExactNameResolver::default()),
        }
    }

    pub fn store(&self) -> &'a Store {
        self.store
    }

    /// Record a failed statement in the report and turn it into an error
    fn record<T>(&mut self, sql: &str, params: &[Value], result: rusqlite::Result<T>) -> Result<T> {
        result.map_err(|e| {
            self.report.errors.push(StatementFailure {
                sql: sql.to_string(),
                params: params.iter().map(param_to_json).collect(),
                err: e.to_string(),
            });
            TourneyError::Statement {
                sql: sql.to_string(),
                message: e.to_string(),
            }
        })
    }

    pub fn execute(&mut self, sql: &str, params: &[Value]) -> Result<usize> {
        let result = self
            .store
            .connection()
            .execute(sql, params_from_iter(params.iter()));
        self.record(sql, params, result)
    }

    /// First column of the first row as an id, None when no row comes back
    pub fn query_id(&mut self, sql: &str, params: &[Value]) -> Result<Option<i64>> {
        let result = self
            .store
            .connection()
            .query_row(sql, params_from_iter(params.iter()), |r| r.get::<_, i64>(0))
            .optional();
        self.record(sql, params, result)
    }

    pub fn query_map<T, F>(&mut self, sql: &str, params: &[Value], f: F) -> Result<Vec<T>>
    where
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let result = collect_rows(self.store.connection(), sql, params, f);
        self.record(sql, params, result)
    }

    /// The configured season; a missing season aborts the run
    pub fn load_season(&mut self) -> Result<SeasonId> {
        let year = self.config.season.year;
        self.query_id("SELECT id FROM seasons WHERE year = ?1 LIMIT 1", &[Value::Integer(year)])?
            .map(SeasonId)
            .ok_or(TourneyError::SeasonNotFound(year))
    }

    /// Course legacy-ID dictionary, taken after the courses sheet
    pub fn load_course_dictionary(&mut self) -> Result<()> {
        let rows = self.query_map(
            "SELECT legacy_id, id FROM courses WHERE legacy_id IS NOT NULL",
            &[],
            |r| Ok((r.get::<_, String>(0)?, CourseId(r.get(1)?))),
        )?;
        self.lookups.courses = rows.into_iter().collect();
        Ok(())
    }

    /// Register codes and the holes-by-course map, taken after the holes sheet
    pub fn load_lookups(&mut self) -> Result<()> {
        self.lookups.game_modes = self.load_codes("game_modes")?;
        self.lookups.scoring_modes = self.load_codes("scoring_modes")?;
        self.lookups.hcp_policies = self.load_codes("hcp_policies")?;

        let holes = self.query_map(
            "SELECT course_id, hole_number, id FROM holes",
            &[],
            |r| Ok((CourseId(r.get(0)?), r.get::<_, i64>(1)?, HoleId(r.get(2)?))),
        )?;
        let mut by_course: HashMap<CourseId, HashMap<i64, HoleId>> = HashMap::new();
        for (course, number, hole) in holes {
            by_course.entry(course).or_default().insert(number, hole);
        }
        self.lookups.holes = by_course;
        Ok(())
    }

    fn load_codes(&mut self, table: &str) -> Result<HashMap<String, i64>> {
        let sql = format!("SELECT code, id FROM {}", table);
        let rows = self.query_map(&sql, &[], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
        Ok(rows.into_iter().collect())
    }

    /// Index every player name once; participants resolve against it
    pub fn load_name_index(&mut self, surname_fallback: bool) -> Result<()> {
        let players = self.query_map("SELECT id, full_name FROM players ORDER BY id", &[], |r| {
            Ok((PlayerId(r.get(0)?), r.get::<_, String>(1)?))
        })?;
        log::info!("Indexed {} player names", players.len());

        let exact = ExactNameResolver::new(players.iter().map(|(id, n)| (*id, n.as_str())));
        self.names = if surname_fallback {
            Box::new(SurnameFallback::new(exact, players.iter().map(|(id, n)| (*id, n.as_str()))))
        } else {
            Box::new(exact)
        };
        Ok(())
    }

    pub fn set_name_resolver(&mut self, resolver: Box<dyn NameResolver + 'a>) {
        self.names = resolver;
    }

    pub fn resolve_name(&self, name: &str) -> Option<PlayerId> {
        self.names.resolve(name)
    }
}

fn collect_rows<T, F>(conn: &Connection, sql: &str, params: &[Value], f: F) -> rusqlite::Result<Vec<T>>
where
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), f)?;
    rows.collect()
}
