// 🏗️ Daily Pipeline - Scoreboard + play-by-play → ranked games
//
// 1. Merge the scoreboard feeds into a GameRegistry
// 2. Count lead changes per game from its play-by-play
// 3. Rate every game on its final merged state
// 4. Rank, best first
//
// Any failure aborts the whole date; the caller decides about retries.

use crate::entities::Game;
use crate::feeds::{PlayByPlay, Scoreboard};
use crate::lead_changes::count_lead_changes_in;
use crate::merger::GameRegistry;
use crate::rating::RatingEngine;
use crate::report::rank_games;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// PLAY-BY-PLAY SOURCE
// ============================================================================

/// Where play-by-play documents come from.
///
/// The collector that talks to the stats provider lives outside this crate;
/// anything that can hand back a document per game id plugs in here.
pub trait PlayByPlaySource {
    fn play_by_play(&self, game_id: &str) -> Result<PlayByPlay>;

    /// Short label for log lines
    fn name(&self) -> &str {
        "play-by-play"
    }
}

/// Reads `<dir>/<game_id>.json` as saved by the collector
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySource { dir: dir.into() }
    }

    pub fn path_for(&self, game_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", game_id))
    }
}

impl PlayByPlaySource for DirectorySource {
    fn play_by_play(&self, game_id: &str) -> Result<PlayByPlay> {
        let path = self.path_for(game_id);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to open play-by-play: {}", path.display()))?;

        PlayByPlay::from_json(&data)
            .with_context(|| format!("Failed to parse play-by-play: {}", path.display()))
    }

    fn name(&self) -> &str {
        "directory"
    }
}

// ============================================================================
// STAGES
// ============================================================================

pub fn load_scoreboard(path: &Path) -> Result<Scoreboard> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to open scoreboard: {}", path.display()))?;

    Scoreboard::from_json(&data)
        .with_context(|| format!("Failed to parse scoreboard: {}", path.display()))
}

/// Fill `lead_changes` on every game of the registry
pub fn annotate_lead_changes(
    registry: &mut GameRegistry,
    source: &dyn PlayByPlaySource,
) -> Result<()> {
    for game in registry.games_mut() {
        let play_by_play = source.play_by_play(&game.game_id).with_context(|| {
            format!("Failed to load {} data for game {}", source.name(), game.game_id)
        })?;

        game.lead_changes = count_lead_changes_in(&play_by_play);
        debug!(
            game_id = %game.game_id,
            rows = play_by_play.rows.len(),
            lead_changes = game.lead_changes,
            "counted lead changes"
        );
    }

    Ok(())
}

/// Run the whole day: merge, lead changes, rating, ranking
pub fn rate_day(
    scoreboard: &Scoreboard,
    source: &dyn PlayByPlaySource,
    engine: &RatingEngine,
) -> Result<Vec<Game>> {
    let mut registry =
        GameRegistry::from_scoreboard(scoreboard).context("Failed to merge scoreboard feeds")?;
    info!(games = registry.len(), "merged scoreboard");

    annotate_lead_changes(&mut registry, source)?;

    for game in registry.games_mut() {
        engine.rate(game);
        debug!(
            game_id = %game.game_id,
            model = %game.game_rating.model,
            total = game.game_rating.total,
            "rated game"
        );
    }

    let ranked = rank_games(registry.into_games());
    info!(games = ranked.len(), model = %engine.model, "ranked games");

    Ok(ranked)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RatingModel;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct MemorySource {
        documents: HashMap<String, PlayByPlay>,
    }

    impl PlayByPlaySource for MemorySource {
        fn play_by_play(&self, game_id: &str) -> Result<PlayByPlay> {
            self.documents
                .get(game_id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no play-by-play for {}", game_id))
        }
    }

    fn pbp(scores: &[&str]) -> PlayByPlay {
        PlayByPlay::new(
            vec!["EVENTNUM".to_string(), "SCORE".to_string()],
            scores
                .iter()
                .enumerate()
                .map(|(i, s)| vec![json!(i), json!(s)])
                .collect(),
        )
    }

    fn line_score(game_id: &str, team_id: &str, name: &str, points: u32) -> Value {
        let mut row = vec![json!(""); 23];
        row[2] = json!(game_id);
        row[3] = json!(team_id);
        row[4] = json!(&name[..3]);
        row[5] = json!("City");
        row[6] = json!(name);
        row[22] = json!(points);
        Value::Array(row)
    }

    fn scoreboard() -> Scoreboard {
        let doc = json!({
            "resultSets": [
                {"name": "GameHeader", "headers": [], "rowSet": [
                    ["2024-01-07T00:00:00", 1, "g_close", 2, "Final", "", "h1", "v1"],
                    ["2024-01-07T00:00:00", 2, "g_blowout", 3, "Final", "", "h2", "v2"]
                ]},
                {"name": "LineScore", "headers": [], "rowSet": [
                    line_score("g_close", "h1", "Home One", 101),
                    line_score("g_close", "v1", "Visitor One", 100),
                    line_score("g_blowout", "h2", "Home Two", 130),
                    line_score("g_blowout", "v2", "Visitor Two", 95)
                ]},
                {"name": "TeamLeaders", "headers": [], "rowSet": [
                    ["g_close", 0, 0, 0, 0, 0, 0, 44],
                    ["g_blowout", 0, 0, 0, 0, 0, 0, 30]
                ]}
            ]
        });
        Scoreboard::from_json(&doc.to_string()).unwrap()
    }

    #[test]
    fn test_rate_day_ranks_close_game_first() {
        let source = MemorySource {
            documents: HashMap::from([
                ("g_close".to_string(), pbp(&["2 - 0", "2 - 3", "5 - 3", "5 - 6", "8 - 6"])),
                ("g_blowout".to_string(), pbp(&["0 - 2", "0 - 10"])),
            ]),
        };

        let ranked = rate_day(&scoreboard(), &source, &RatingEngine::new()).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].game_id, "g_close");
        assert_eq!(ranked[0].lead_changes, 4);
        // diff 1 → 10, unknown standings 0/0 → 8, 44 pts → 2, 4 changes → 2
        assert_eq!(ranked[0].game_rating.total, 22);
        assert_eq!(ranked[1].game_id, "g_blowout");
        assert_eq!(ranked[1].lead_changes, 0);
        assert_eq!(ranked[1].game_rating.total, 8);
    }

    #[test]
    fn test_rate_day_with_punctuation_model() {
        let source = MemorySource {
            documents: HashMap::from([
                ("g_close".to_string(), pbp(&["2 - 0", "2 - 3"])),
                ("g_blowout".to_string(), pbp(&[])),
            ]),
        };

        let engine = RatingEngine::with_model(RatingModel::Punctuation);
        let ranked = rate_day(&scoreboard(), &source, &engine).unwrap();

        // 8 + 6 + 2, lead changes are not scored
        assert_eq!(ranked[0].game_rating.total, 16);
        assert_eq!(ranked[0].game_rating.change_lead, 0);
        assert_eq!(ranked[0].lead_changes, 1);
    }

    #[test]
    fn test_rate_day_ties_come_out_in_game_id_order() {
        let doc = json!({
            "resultSets": [
                {"name": "GameHeader", "headers": [], "rowSet": [
                    ["2024-01-07T00:00:00", 1, "g_b", 2, "Final", "", "h1", "v1"],
                    ["2024-01-07T00:00:00", 2, "g_a", 3, "Final", "", "h2", "v2"]
                ]},
                {"name": "LineScore", "headers": [], "rowSet": [
                    line_score("g_b", "h1", "Home One", 100),
                    line_score("g_b", "v1", "Visitor One", 98),
                    line_score("g_a", "h2", "Home Two", 100),
                    line_score("g_a", "v2", "Visitor Two", 98)
                ]}
            ]
        });
        let scoreboard = Scoreboard::from_json(&doc.to_string()).unwrap();
        let source = MemorySource {
            documents: HashMap::from([
                ("g_a".to_string(), pbp(&["2 - 0"])),
                ("g_b".to_string(), pbp(&["2 - 0"])),
            ]),
        };

        let ranked = rate_day(&scoreboard, &source, &RatingEngine::new()).unwrap();

        assert_eq!(ranked[0].game_rating.total, ranked[1].game_rating.total);
        let ids: Vec<&str> = ranked.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["g_a", "g_b"]);
    }

    #[test]
    fn test_rate_day_missing_play_by_play_aborts() {
        let source = MemorySource {
            documents: HashMap::from([("g_close".to_string(), pbp(&[]))]),
        };

        let result = rate_day(&scoreboard(), &source, &RatingEngine::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_directory_source() {
        let dir = TempDir::new().unwrap();
        let doc = json!({
            "resultSets": [
                {
                    "name": "PlayByPlay",
                    "headers": ["EVENTNUM", "SCORE"],
                    "rowSet": [[1, "10 - 8"], [2, "12 - 14"]]
                }
            ]
        });
        fs::write(dir.path().join("0022300500.json"), doc.to_string()).unwrap();

        let source = DirectorySource::new(dir.path());
        let pbp = source.play_by_play("0022300500").unwrap();
        assert_eq!(count_lead_changes_in(&pbp), 1);

        assert!(source.play_by_play("0022300501").is_err());
    }

    #[test]
    fn test_load_scoreboard_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scoreboard.json");
        fs::write(&path, r#"{"resultSets": []}"#).unwrap();

        let scoreboard = load_scoreboard(&path).unwrap();
        assert!(scoreboard.game_headers().is_empty());

        fs::write(&path, "{").unwrap();
        assert!(load_scoreboard(&path).is_err());
    }
}
