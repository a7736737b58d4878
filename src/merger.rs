// 🔀 Feed Merger - Five feeds → one Game per game_id
//
// Order matters in one place only: headers create the Games, everything
// else enriches them. Standings run once per conference table.
//
//   from_scoreboard:
//     create_from_headers → apply_line_scores → apply_team_leaders
//       → apply_conf_standings(east) → apply_conf_standings(west)
//
// Every operation decodes its whole feed before touching the registry, so a
// malformed row aborts the call and leaves the registry as it was.

use crate::entities::{Game, Side};
use crate::feeds::{
    FeedError, GameHeaderRow, LineScoreRow, Row, Scoreboard, StandingRow, TeamLeaderRow,
};
use std::collections::BTreeMap;

// ============================================================================
// GAME REGISTRY
// ============================================================================

/// All Games of one batch, keyed by game_id.
///
/// Owned by a single run; Games are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRegistry {
    games: BTreeMap<String, Game>,
}

impl GameRegistry {
    pub fn new() -> Self {
        GameRegistry {
            games: BTreeMap::new(),
        }
    }

    /// Build a registry from a full scoreboard document
    pub fn from_scoreboard(scoreboard: &Scoreboard) -> Result<Self, FeedError> {
        let mut registry = GameRegistry::new();

        registry.create_from_headers(scoreboard.game_headers())?;
        registry.apply_line_scores(scoreboard.line_scores())?;
        registry.apply_team_leaders(scoreboard.team_leaders())?;
        registry.apply_conf_standings(scoreboard.east_conf_standings())?;
        registry.apply_conf_standings(scoreboard.west_conf_standings())?;

        Ok(registry)
    }

    // ========================================================================
    // MERGE OPERATIONS
    // ========================================================================

    /// Create one Game per header row; a repeated game_id replaces the
    /// earlier Game.
    pub fn create_from_headers(&mut self, rows: &[Row]) -> Result<(), FeedError> {
        let headers = rows
            .iter()
            .map(|row| GameHeaderRow::decode(row))
            .collect::<Result<Vec<_>, _>>()?;

        for header in headers {
            let game = Game::new(
                header.date,
                header.game_id,
                header.home_team_id,
                header.visitor_team_id,
            );
            self.games.insert(game.game_id.clone(), game);
        }

        Ok(())
    }

    /// Fill team names and points.
    ///
    /// A row whose team id is not the home id is applied to the visitor.
    /// Rows for games not in the registry are skipped.
    pub fn apply_line_scores(&mut self, rows: &[Row]) -> Result<(), FeedError> {
        let mut lines = Vec::new();
        for row in rows {
            let game_id = LineScoreRow::game_id(row)?;
            if !self.games.contains_key(&game_id) {
                continue;
            }
            lines.push(LineScoreRow::decode(row)?);
        }

        for line in lines {
            let Some(game) = self.games.get_mut(&line.game_id) else {
                continue;
            };

            let side = game.side_of(&line.team_id);
            let team = game.team_mut(side);
            team.team_abbreviation = line.team_abbreviation;
            team.team_city_name = line.team_city_name;
            team.team_name = line.team_name;

            if let Some(points) = line.points {
                game.set_points(side, points);
            }
        }

        Ok(())
    }

    /// Keep the running maximum of leader points per game
    pub fn apply_team_leaders(&mut self, rows: &[Row]) -> Result<(), FeedError> {
        let mut leaders = Vec::new();
        for row in rows {
            let game_id = TeamLeaderRow::game_id(row)?;
            if !self.games.contains_key(&game_id) {
                continue;
            }
            leaders.push(TeamLeaderRow::decode(row)?);
        }

        for leader in leaders {
            if let Some(game) = self.games.get_mut(&leader.game_id) {
                let points = leader.points.unwrap_or(0);
                game.maximum_points_player = game.maximum_points_player.max(points);
            }
        }

        Ok(())
    }

    /// Apply one conference table. Rows are already in rank order, so the
    /// position is the 1-based row index. Every game is scanned because a
    /// team can play in more than one game of the batch.
    pub fn apply_conf_standings(&mut self, rows: &[Row]) -> Result<(), FeedError> {
        let standings = rows
            .iter()
            .map(|row| StandingRow::decode(row))
            .collect::<Result<Vec<_>, _>>()?;

        for (index, standing) in standings.iter().enumerate() {
            let position = (index + 1) as u32;

            for game in self.games.values_mut() {
                for side in [Side::Home, Side::Visitor] {
                    let team = game.team_mut(side);
                    if team.team_id == standing.team_id {
                        team.conference = standing.conference.clone();
                        team.conference_position = position;
                    }
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    pub fn get(&self, game_id: &str) -> Option<&Game> {
        self.games.get(game_id)
    }

    pub fn get_mut(&mut self, game_id: &str) -> Option<&mut Game> {
        self.games.get_mut(game_id)
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.games.contains_key(game_id)
    }

    /// Insert a Game built elsewhere (replaces any Game with the same id)
    pub fn insert(&mut self, game: Game) {
        self.games.insert(game.game_id.clone(), game);
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games in ascending game_id order
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    pub fn games_mut(&mut self) -> impl Iterator<Item = &mut Game> {
        self.games.values_mut()
    }

    pub fn into_games(self) -> Vec<Game> {
        self.games.into_values().collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
