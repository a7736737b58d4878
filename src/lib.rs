// topmatchnba - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod entities;
pub mod feeds;
pub mod merger;
pub mod lead_changes;
pub mod rating;
pub mod report;
pub mod pipeline;

// Re-export commonly used types
pub use entities::{Game, GameRating, Side, Team};
pub use feeds::{
    Feed, FeedError, GameHeaderRow, LineScoreRow, PlayByPlay, ResultSet, Row, Scoreboard,
    StandingRow, TeamLeaderRow,
};
pub use merger::GameRegistry;
pub use lead_changes::{
    count_lead_changes, count_lead_changes_in, parse_score, Lead, LeadChangeDetector,
};
pub use rating::{RatingEngine, RatingModel};
pub use report::{
    rank_games, read_report, report_file_name, report_path, parse_report_date, write_report,
    RankedGame,
};
pub use pipeline::{
    annotate_lead_changes, load_scoreboard, rate_day, DirectorySource, PlayByPlaySource,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
