use thiserror::Error;

#[derive(Error, Debug)]
pub enum TourneyError {
    #[error("Season {0} not found - run `golf-tourney seed` first")]
    SeasonNotFound(i64),

    #[error("Statement failed: {message}\n  sql: {sql}")]
    Statement { sql: String, message: String },

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

impl From<calamine::Error> for TourneyError {
    fn from(e: calamine::Error) -> Self {
        TourneyError::Workbook(e.to_string())
    }
}

impl From<toml::de::Error> for TourneyError {
    fn from(e: toml::de::Error) -> Self {
        TourneyError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TourneyError>;
