// 📊 Daily Report - Ranked games for one date
//
// Output shape consumed by the web page: one JSON array per date, best game
// first, written to data/topmatchnba-DD-MM-YYYY.json

use crate::entities::{Game, GameRating};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const REPORT_PREFIX: &str = "topmatchnba-";
const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

// ============================================================================
// RANKING
// ============================================================================

/// Sort by rating total, best first. Ties keep their input order, and a
/// registry yields games by ascending game_id, so tied games of a day come
/// out in game_id order rather than scoreboard header order.
pub fn rank_games(mut games: Vec<Game>) -> Vec<Game> {
    games.sort_by(|a, b| b.game_rating.total.cmp(&a.game_rating.total));
    games
}

// ============================================================================
// REPORT RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedGame {
    pub game_id: String,
    pub date: NaiveDateTime,
    pub home_team: String,
    pub visitor_team: String,
    pub home_team_points: u32,
    pub visitor_team_points: u32,
    pub lead_changes: u32,
    pub maximum_points_player: u32,
    pub game_rating: GameRating,

    /// Same value as game_rating.total, under the key the page reads
    pub game_punctuation: u32,
}

impl From<&Game> for RankedGame {
    fn from(game: &Game) -> Self {
        RankedGame {
            game_id: game.game_id.clone(),
            date: game.date,
            home_team: game.home_team.display_name(),
            visitor_team: game.visitor_team.display_name(),
            home_team_points: game.home_team_points,
            visitor_team_points: game.visitor_team_points,
            lead_changes: game.lead_changes,
            maximum_points_player: game.maximum_points_player,
            game_rating: game.game_rating.clone(),
            game_punctuation: game.game_rating.total,
        }
    }
}

impl RankedGame {
    pub fn summary(&self) -> String {
        format!(
            "{} vs {}: {} ({} - {}, {} lead changes)",
            self.home_team,
            self.visitor_team,
            self.game_rating.total,
            self.home_team_points,
            self.visitor_team_points,
            self.lead_changes
        )
    }
}

// ============================================================================
// FILES
// ============================================================================

/// "topmatchnba-07-01-2024.json"
pub fn report_file_name(date: NaiveDate) -> String {
    format!("{}{}.json", REPORT_PREFIX, date.format(REPORT_DATE_FORMAT))
}

/// Parse the DD-MM-YYYY part of a report name
pub fn parse_report_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), REPORT_DATE_FORMAT).ok()
}

pub fn report_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(report_file_name(date))
}

/// Write already-ranked games as a pretty JSON array, creating `dir`
pub fn write_report(dir: &Path, date: NaiveDate, games: &[Game]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;

    let records: Vec<RankedGame> = games.iter().map(RankedGame::from).collect();
    let json = serde_json::to_string_pretty(&records).context("Failed to serialize report")?;

    let path = report_path(dir, date);
    fs::write(&path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok(path)
}

pub fn read_report(path: &Path) -> Result<Vec<RankedGame>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to open report: {}", path.display()))?;

    serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse report: {}", path.display()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RatingModel;
    use tempfile::TempDir;

    fn rated_game(game_id: &str, total: u32) -> Game {
        let date = NaiveDate::from_ymd_opt(2024, 1, 7)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut game = Game::new(
            date,
            game_id,
            format!("{}_home", game_id),
            format!("{}_visitor", game_id),
        );
        game.game_rating = GameRating::from_components(RatingModel::Rating, total, 0, 0, 0);
        game
    }

    #[test]
    fn test_rank_games_descending_and_stable() {
        let ranked = rank_games(vec![
            rated_game("a", 4),
            rated_game("b", 12),
            rated_game("c", 4),
            rated_game("d", 20),
        ]);

        let ids: Vec<&str> = ranked.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(report_file_name(date), "topmatchnba-07-01-2024.json");
        assert_eq!(parse_report_date("07-01-2024"), Some(date));
        assert_eq!(parse_report_date("2024-01-07"), None);
    }

    #[test]
    fn test_ranked_game_record() {
        let mut game = rated_game("g1", 10);
        game.home_team.team_city_name = "Boston".to_string();
        game.home_team.team_name = "Celtics".to_string();
        game.home_team_points = 120;
        game.visitor_team_points = 118;

        let record = RankedGame::from(&game);
        assert_eq!(record.home_team, "Boston Celtics");
        assert_eq!(record.visitor_team, "g1_visitor");
        assert_eq!(record.game_punctuation, 10);
        assert_eq!(record.game_rating.total, 10);
        assert!(record.summary().starts_with("Boston Celtics vs g1_visitor: 10"));
    }

    #[test]
    fn test_write_and_read_report() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("data");
        let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let games = rank_games(vec![rated_game("a", 6), rated_game("b", 18)]);

        let path = write_report(&out, date, &games).unwrap();
        assert!(path.ends_with("topmatchnba-07-01-2024.json"));

        let records = read_report(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].game_id, "b");
        assert_eq!(records[0].game_punctuation, 18);
        assert_eq!(records[1].game_id, "a");
    }

    #[test]
    fn test_read_missing_report() {
        let dir = TempDir::new().unwrap();
        let result = read_report(&dir.path().join("nope.json"));
        assert!(result.is_err());
    }
}
