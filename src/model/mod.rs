pub mod ids;
pub mod name;
pub mod side;

pub use ids::{CourseId, HoleId, MatchId, PlayerId, SeasonId};
pub use name::{name_key, split_pair};
pub use side::{MatchStatus, Side};
