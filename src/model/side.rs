use std::fmt;

/// One of the two competing parties in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Red, Side::Blue];

    /// Parse a side/team code, case-insensitive ("red", " Blue ")
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "red" => Some(Side::Red),
            "blue" => Some(Side::Blue),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Blue => "blue",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    /// Historical sheets mostly hold played games
    #[default]
    Finished,
}

impl MatchStatus {
    /// Accepts `not_started`, `in progress`, `In-Progress`, ...
    pub fn from_code(s: &str) -> Option<Self> {
        let code: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match code.as_str() {
            "not_started" => Some(MatchStatus::NotStarted),
            "in_progress" => Some(MatchStatus::InProgress),
            "finished" => Some(MatchStatus::Finished),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "not_started",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
