//! Seed fixtures and generated development data.

mod error;
#[cfg(feature = "fake")]
pub mod fake;
mod records;
mod summary;

pub use error::SeedError;
pub use records::{
    parse_comments, parse_news, parse_players, parse_teams, parse_users, CommentRecord,
    NewsRecord, PlayerRecord, TeamRecord, UserRecord, COMMENTS_FILE, NEWS_FILE, PLAYERS_FILE,
    TEAMS_FILE, USERS_FILE,
};
pub use summary::{PhaseCount, SeedSummary};
