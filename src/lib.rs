pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod resolve;
pub mod sheet;
pub mod store;

pub use config::ImportConfig;
pub use error::{Result, TourneyError};
pub use model::*;
