//! Import configuration: sheet names, column mapping, season and day defaults
//!
//! Every field has a default matching the AppSheet export layout, so a TOML
//! override only needs to name what differs:
//!
//! ```toml
//! [season]
//! year = 2026
//!
//! [columns.games]
//! stage = "Stage"
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub season: SeasonConfig,
    pub sheets: SheetNames,
    pub columns: ColumnMap,
    pub defaults: DayDefaults,
}

impl ImportConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    pub year: i64,
    pub name: String,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            year: 2025,
            name: "Dacan Open 2025".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub players: String,
    pub courses: String,
    pub holes: String,
    /// Optional
    pub schedule: String,
    pub games: String,
    pub results: String,
    /// Optional
    pub leaderboard: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            players: "Players".to_string(),
            courses: "Field difficulty".to_string(),
            holes: "Field holes".to_string(),
            schedule: "This_year_field".to_string(),
            games: "Games".to_string(),
            results: "Results".to_string(),
            leaderboard: "Leaderboard".to_string(),
        }
    }
}

/// Header text of each mapped column, per sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub players: PlayerColumns,
    pub courses: CourseColumns,
    pub holes: HoleColumns,
    pub schedule: ScheduleColumns,
    pub games: GameColumns,
    pub results: ResultColumns,
    pub leaderboard: LeaderboardColumns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerColumns {
    pub id: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub hcp: String,
    pub size: String,
    pub phone: String,
    pub photo: String,
    pub team: String,
}

impl Default for PlayerColumns {
    fn default() -> Self {
        Self {
            id: "ID_Players".to_string(),
            name: "Name".to_string(),
            first_name: "First name".to_string(),
            last_name: "Second name".to_string(),
            hcp: "HCP".to_string(),
            size: "Size".to_string(),
            phone: "Phone".to_string(),
            photo: "Photo".to_string(),
            team: "Team".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseColumns {
    pub id: String,
    pub name: String,
    pub city: String,
    pub rating: String,
    pub slope: String,
}

impl Default for CourseColumns {
    fn default() -> Self {
        Self {
            id: "FieldID".to_string(),
            name: "Field Name".to_string(),
            city: "City".to_string(),
            rating: "Rating".to_string(),
            slope: "Slope".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleColumns {
    pub course_id: String,
    pub hole: String,
    pub par: String,
    pub stroke_index: String,
    pub photo: String,
}

impl Default for HoleColumns {
    fn default() -> Self {
        Self {
            course_id: "FieldID".to_string(),
            hole: "Hole".to_string(),
            par: "Par".to_string(),
            stroke_index: "HCPIndex".to_string(),
            photo: "Photo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleColumns {
    pub day: String,
    pub course_id: String,
    pub game_mode: String,
    pub scoring_mode: String,
    pub hcp_policy: String,
}

impl Default for ScheduleColumns {
    fn default() -> Self {
        Self {
            day: "Day".to_string(),
            course_id: "FieldID".to_string(),
            game_mode: "GameMode".to_string(),
            scoring_mode: "Scoring".to_string(),
            hcp_policy: "HCP".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameColumns {
    pub id: String,
    pub course_id: String,
    pub stage: String,
    pub red_names: String,
    pub blue_names: String,
    pub status: String,
}

impl Default for GameColumns {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            course_id: "FieldID".to_string(),
            stage: "Tee".to_string(),
            red_names: "Red".to_string(),
            blue_names: "Blue".to_string(),
            status: "Status".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultColumns {
    pub game_id: String,
    pub hole: String,
    pub red_score: String,
    pub blue_score: String,
}

impl Default for ResultColumns {
    fn default() -> Self {
        Self {
            game_id: "GameID".to_string(),
            hole: "Hole".to_string(),
            red_score: "R Score".to_string(),
            blue_score: "B Score".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardColumns {
    pub team: String,
    pub points: String,
}

impl Default for LeaderboardColumns {
    fn default() -> Self {
        Self {
            team: "Team".to_string(),
            points: "Points".to_string(),
        }
    }
}

/// Register codes for one tournament day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPolicy {
    pub game_mode: String,
    pub scoring_mode: String,
    pub hcp_policy: String,
}

impl DayPolicy {
    fn new(game_mode: &str, scoring_mode: &str, hcp_policy: &str) -> Self {
        Self {
            game_mode: game_mode.to_string(),
            scoring_mode: scoring_mode.to_string(),
            hcp_policy: hcp_policy.to_string(),
        }
    }
}

/// Schedule defaults written by `seed` for day 1 and day 2
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DayDefaults {
    pub day1: DayPolicy,
    pub day2: DayPolicy,
}

impl Default for DayDefaults {
    fn default() -> Self {
        Self {
            day1: DayPolicy::new("team", "match_play", "texas_share_3_8"),
            day2: DayPolicy::new("individual", "match_play", "net_dacan"),
        }
    }
}
