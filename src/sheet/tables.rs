use super::reader::Row;
use crate::config::{
    CourseColumns, GameColumns, HoleColumns, LeaderboardColumns, PlayerColumns, ResultColumns,
    ScheduleColumns,
};
use crate::model::{split_pair, MatchStatus, Side};

/// A player from the Players sheet
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub legacy_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Name` column, else "first last"
    pub full_name: String,
    pub hcp: Option<f64>,
    pub size: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub team: Option<Side>,
}

impl PlayerRow {
    pub fn from_row(row: &Row, c: &PlayerColumns) -> Self {
        let first_name = row.opt_text(&c.first_name);
        let last_name = row.opt_text(&c.last_name);
        let full_name = row.opt_text(&c.name).unwrap_or_else(|| {
            format!(
                "{} {}",
                first_name.as_deref().unwrap_or(""),
                last_name.as_deref().unwrap_or("")
            )
            .trim()
            .to_string()
        });

        Self {
            legacy_id: row.opt_text(&c.id),
            first_name,
            last_name,
            full_name,
            hcp: row.number(&c.hcp),
            size: row.opt_text(&c.size),
            phone: row.opt_text(&c.phone),
            photo: row.opt_text(&c.photo),
            team: Side::from_code(&row.text(&c.team)),
        }
    }

    pub fn has_identity(&self) -> bool {
        self.legacy_id.is_some() || !self.full_name.is_empty()
    }
}

/// A course from the Field difficulty sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRow {
    pub legacy_id: Option<String>,
    pub name: String,
    pub city: Option<String>,
    pub rating: Option<f64>,
    pub slope: Option<f64>,
}

impl CourseRow {
    pub fn from_row(row: &Row, c: &CourseColumns) -> Self {
        Self {
            legacy_id: row.opt_text(&c.id),
            name: row.text(&c.name),
            city: row.opt_text(&c.city),
            rating: row.number(&c.rating),
            slope: row.number(&c.slope),
        }
    }

    pub fn has_identity(&self) -> bool {
        self.legacy_id.is_some() || !self.name.is_empty()
    }
}

/// A hole from the Field holes sheet
#[derive(Debug, Clone, PartialEq)]
pub struct HoleRow {
    pub course_legacy_id: String,
    pub hole_number: Option<i64>,
    pub par: Option<i64>,
    pub stroke_index: Option<i64>,
    pub photo: Option<String>,
}

impl HoleRow {
    pub fn from_row(row: &Row, c: &HoleColumns) -> Self {
        Self {
            course_legacy_id: row.text(&c.course_id),
            hole_number: row.integer(&c.hole),
            par: row.integer(&c.par),
            stroke_index: row.integer(&c.stroke_index),
            photo: row.opt_text(&c.photo),
        }
    }
}

/// A day entry from the optional This_year_field sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub day: Option<i64>,
    pub course_legacy_id: Option<String>,
    /// Register codes, lowercased
    pub game_mode: Option<String>,
    pub scoring_mode: Option<String>,
    pub hcp_policy: Option<String>,
}

impl ScheduleRow {
    pub fn from_row(row: &Row, c: &ScheduleColumns) -> Self {
        let code = |col: &str| row.opt_text(col).map(|s| s.to_lowercase());
        Self {
            day: row.integer(&c.day),
            course_legacy_id: row.opt_text(&c.course_id),
            game_mode: code(c.game_mode.as_str()),
            scoring_mode: code(c.scoring_mode.as_str()),
            hcp_policy: code(c.hcp_policy.as_str()),
        }
    }
}

/// A match from the Games sheet
#[derive(Debug, Clone, PartialEq)]
pub struct GameRow {
    pub legacy_id: Option<String>,
    pub course_legacy_id: String,
    pub stage: Option<String>,
    pub red: Vec<String>,
    pub blue: Vec<String>,
    /// Raw status text, None when blank
    pub status: Option<String>,
}

impl GameRow {
    pub fn from_row(row: &Row, c: &GameColumns) -> Self {
        Self {
            legacy_id: row.opt_text(&c.id),
            course_legacy_id: row.text(&c.course_id),
            stage: row.opt_text(&c.stage),
            red: split_pair(&row.text(&c.red_names)),
            blue: split_pair(&row.text(&c.blue_names)),
            status: row.opt_text(&c.status),
        }
    }

    /// Parsed status; blank means finished, unknown text is None
    pub fn parsed_status(&self) -> Option<MatchStatus> {
        match &self.status {
            None => Some(MatchStatus::default()),
            Some(s) => MatchStatus::from_code(s),
        }
    }

    pub fn names(&self, side: Side) -> &[String] {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }
}

/// A per-hole result from the Results sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub game_id: String,
    pub hole_number: Option<i64>,
    pub red_score: Option<i64>,
    pub blue_score: Option<i64>,
}

impl ResultRow {
    pub fn from_row(row: &Row, c: &ResultColumns) -> Self {
        Self {
            game_id: row.text(&c.game_id),
            hole_number: row.integer(&c.hole),
            red_score: row.integer(&c.red_score),
            blue_score: row.integer(&c.blue_score),
        }
    }
}

/// Team points from the optional Leaderboard sheet
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub team: Option<Side>,
    pub points: Option<f64>,
}

impl LeaderboardRow {
    pub fn from_row(row: &Row, c: &LeaderboardColumns) -> Self {
        Self {
            team: Side::from_code(&row.text(&c.team)),
            points: row.number(&c.points),
        }
    }
}
