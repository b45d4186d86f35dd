use crate::error::Result;
use crate::model::{CourseId, MatchId};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A Games row that was reconciled
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    pub legacy: String,
    pub match_id: MatchId,
    pub red: Vec<String>,
    pub blue: Vec<String>,
}

/// A store statement that failed, with its bound parameters
#[derive(Debug, Clone, Serialize)]
pub struct StatementFailure {
    pub sql: String,
    pub params: Vec<serde_json::Value>,
    pub err: String,
}

/// Rows reconciled per entity
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCounts {
    pub players: usize,
    pub courses: usize,
    pub holes: usize,
    pub schedule_days: usize,
    pub matches: usize,
    pub participants: usize,
    pub scores: usize,
    pub leaderboard: usize,
}

/// Diagnostics accumulated over one import run
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub unknown_players: BTreeSet<String>,
    pub missed_courses: BTreeSet<String>,
    pub missed_holes: BTreeSet<String>,
    pub matches: Vec<MatchEntry>,
    pub errors: Vec<StatementFailure>,
    pub dry_run: bool,
    pub counts: ImportCounts,
    pub when: Option<DateTime<Local>>,
}

/// Report key of a score row whose hole does not exist
pub fn missed_hole_key(course: Option<CourseId>, hole_number: i64) -> String {
    match course {
        Some(id) => format!("course:{}-hole:{}", id, hole_number),
        None => format!("course:none-hole:{}", hole_number),
    }
}

impl ImportReport {
    pub fn unknown_player(&mut self, name: &str) {
        if self.unknown_players.insert(name.to_string()) {
            log::warn!("Unknown player '{}'", name);
        }
    }

    pub fn missed_course(&mut self, legacy_id: &str) {
        if self.missed_courses.insert(legacy_id.to_string()) {
            log::warn!("Unknown course legacy ID '{}'", legacy_id);
        }
    }

    pub fn missed_hole(&mut self, course: Option<CourseId>, hole_number: i64) {
        let key = missed_hole_key(course, hole_number);
        if self.missed_holes.insert(key.clone()) {
            log::warn!("No hole for score row: {}", key);
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.unknown_players.is_empty()
            || !self.missed_courses.is_empty()
            || !self.missed_holes.is_empty()
    }

    /// One-line console summary
    pub fn summary(&self) -> String {
        format!(
            "{} players, {} courses, {} holes, {} matches, {} scores; {} unknown players, {} missed courses, {} missed holes",
            self.counts.players,
            self.counts.courses,
            self.counts.holes,
            self.counts.matches,
            self.counts.scores,
            self.unknown_players.len(),
            self.missed_courses.len(),
            self.missed_holes.len(),
        )
    }

    /// Stamp the report and write it as pretty JSON
    pub fn write(&mut self, path: &Path) -> Result<()> {
        self.when = Some(Local::now());
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &*self)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missed_hole_key() {
        assert_eq!(missed_hole_key(Some(CourseId(3)), 99), "course:3-hole:99");
        assert_eq!(missed_hole_key(None, 4), "course:none-hole:4");
    }

    #[test]
    fn test_sets_deduplicate() {
        let mut report = ImportReport::default();
        report.unknown_player("Pleticha");
        report.unknown_player("Pleticha");
        report.unknown_player("Adam");
        report.missed_hole(Some(CourseId(1)), 19);
        report.missed_hole(Some(CourseId(1)), 19);
        assert_eq!(report.unknown_players.len(), 2);
        assert_eq!(report.missed_holes.len(), 1);
        assert!(report.has_warnings());
    }

    #[test]
    fn test_write_json_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import-report.json");

        let mut report = ImportReport::default();
        report.unknown_player("Zeman");
        report.unknown_player("Adam");
        report.missed_course("F9");
        report.matches.push(MatchEntry {
            legacy: "G1".to_string(),
            match_id: MatchId(5),
            red: vec!["Šutko".to_string()],
            blue: vec![],
        });
        report.errors.push(StatementFailure {
            sql: "SELECT 1".to_string(),
            params: vec![serde_json::json!(1)],
            err: "boom".to_string(),
        });
        report.write(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["unknownPlayers"], serde_json::json!(["Adam", "Zeman"]));
        assert_eq!(json["missedCourses"], serde_json::json!(["F9"]));
        assert_eq!(json["missedHoles"], serde_json::json!([]));
        assert_eq!(json["matches"][0]["matchId"], 5);
        assert_eq!(json["matches"][0]["red"][0], "Šutko");
        assert_eq!(json["errors"][0]["err"], "boom");
        assert_eq!(json["dryRun"], false);
        assert!(json["when"].is_string());
    }
}
