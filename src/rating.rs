// ⭐ Rating Engine - How worth watching was this game?
//
// Four independent threshold lookups, summed:
//   score_difference + standings + maximum_points_player + change_lead
//
// Two threshold families exist. `Rating` is the full model with lead changes
// (max 32). `Punctuation` is the earlier three-factor model (cap 20) that the
// first daily reports were ranked with.

use crate::entities::{Game, GameRating};
use serde::{Deserialize, Serialize};

// ============================================================================
// RATING MODEL
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingModel {
    /// Score difference, standings, player high and lead changes. Max 32.
    #[default]
    Rating,

    /// Score difference, standings and player high only. Cap 20.
    Punctuation,
}

impl RatingModel {
    pub fn name(&self) -> &'static str {
        match self {
            RatingModel::Rating => "rating",
            RatingModel::Punctuation => "punctuation",
        }
    }

    /// Upper bound of `GameRating::total` under this model
    pub fn max_total(&self) -> u32 {
        match self {
            RatingModel::Rating => 32,
            RatingModel::Punctuation => 20,
        }
    }
}

impl std::str::FromStr for RatingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rating" => Ok(RatingModel::Rating),
            "punctuation" => Ok(RatingModel::Punctuation),
            other => Err(format!(
                "unknown rating model '{}' (expected 'rating' or 'punctuation')",
                other
            )),
        }
    }
}

impl std::fmt::Display for RatingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// RATING ENGINE
// ============================================================================

pub struct RatingEngine {
    pub model: RatingModel,
}

impl RatingEngine {
    pub fn new() -> Self {
        RatingEngine {
            model: RatingModel::Rating,
        }
    }

    pub fn with_model(model: RatingModel) -> Self {
        RatingEngine { model }
    }

    /// Rate a fully merged game and store the breakdown on it.
    ///
    /// `lead_changes` must already be populated. The returned reference is
    /// the Game's own `game_rating`.
    pub fn rate<'a>(&self, game: &'a mut Game) -> &'a GameRating {
        game.game_rating = self.calculate(game);
        &game.game_rating
    }

    /// Compute the rating without touching the game
    pub fn calculate(&self, game: &Game) -> GameRating {
        let score_difference = self.score_difference(game.score_difference());
        let standings = self.standings(
            game.home_team.conference_position,
            game.visitor_team.conference_position,
        );
        let maximum_points_player = self.maximum_points_player(game.maximum_points_player);
        let change_lead = self.change_lead(game.lead_changes);

        GameRating::from_components(
            self.model,
            score_difference,
            standings,
            maximum_points_player,
            change_lead,
        )
    }

    /// Closer games score higher
    pub fn score_difference(&self, diff: u32) -> u32 {
        match self.model {
            RatingModel::Rating => match diff {
                d if d < 2 => 10,
                d if d < 4 => 8,
                d if d < 6 => 6,
                d if d < 10 => 4,
                _ => 0,
            },
            RatingModel::Punctuation => match diff {
                d if d < 5 => 8,
                d if d < 10 => 4,
                d if d < 15 => 2,
                _ => 0,
            },
        }
    }

    /// Bands are checked top to bottom; the first one that holds wins.
    ///
    /// Position 0 (no standings row) is compared literally.
    pub fn standings(&self, home_pos: u32, visitor_pos: u32) -> u32 {
        let both = |limit: u32| home_pos <= limit && visitor_pos <= limit;
        let either = |limit: u32| home_pos <= limit || visitor_pos <= limit;

        match self.model {
            RatingModel::Rating => {
                if both(2) {
                    8
                } else if both(4) {
                    6
                } else if both(7) {
                    4
                } else if either(3) {
                    2
                } else {
                    0
                }
            }
            RatingModel::Punctuation => {
                if both(3) {
                    6
                } else if both(7) {
                    4
                } else if either(3) {
                    2
                } else {
                    0
                }
            }
        }
    }

    /// Same table in both models
    pub fn maximum_points_player(&self, points: u32) -> u32 {
        if points > 50 {
            4
        } else if points > 40 {
            2
        } else {
            0
        }
    }

    pub fn change_lead(&self, lead_changes: u32) -> u32 {
        if self.model == RatingModel::Punctuation {
            return 0;
        }

        match lead_changes {
            n if n > 16 => 10,
            n if n > 10 => 8,
            n if n > 6 => 6,
            n if n > 3 => 2,
            _ => 0,
        }
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Team;
    use chrono::Utc;

    fn create_test_game(
        home_team_points: u32,
        visitor_team_points: u32,
        home_team_position: u32,
        visitor_team_position: u32,
        max_player_points: u32,
    ) -> Game {
        let mut game = Game::new(
            Utc::now().naive_utc(),
            "test_game_id",
            "home_team_id",
            "visitor_team_id",
        );
        game.home_team = Team::new("home_team_id").with_standing("", home_team_position);
        game.visitor_team = Team::new("visitor_team_id").with_standing("", visitor_team_position);
        game.home_team_points = home_team_points;
        game.visitor_team_points = visitor_team_points;
        game.maximum_points_player = max_player_points;
        game
    }

    fn punctuation(game: &mut Game) -> u32 {
        RatingEngine::with_model(RatingModel::Punctuation).rate(game).total
    }

    #[test]
    fn test_punctuation_tight_game() {
        let mut game = create_test_game(100, 98, 5, 4, 30);
        assert_eq!(punctuation(&mut game), 12);
    }

    #[test]
    fn test_punctuation_large_score_diff() {
        let mut game = create_test_game(120, 90, 2, 6, 28);
        assert_eq!(punctuation(&mut game), 4);
    }

    #[test]
    fn test_punctuation_high_scoring_player() {
        let mut game = create_test_game(110, 105, 8, 9, 51);
        assert_eq!(punctuation(&mut game), 8);
    }

    #[test]
    fn test_punctuation_top_teams() {
        let mut game = create_test_game(105, 100, 3, 3, 25);
        assert_eq!(punctuation(&mut game), 10);
    }

    #[test]
    fn test_rating_same_fixtures() {
        let engine = RatingEngine::new();

        let mut tight = create_test_game(100, 98, 5, 4, 30);
        assert_eq!(engine.rate(&mut tight).total, 12); // 8 + 4

        let mut blowout = create_test_game(120, 90, 2, 6, 28);
        assert_eq!(engine.rate(&mut blowout).total, 4); // 0 + 4

        let mut scorer = create_test_game(110, 105, 8, 9, 51);
        assert_eq!(engine.rate(&mut scorer).total, 10); // 6 + 0 + 4

        let mut top = create_test_game(105, 100, 3, 3, 25);
        assert_eq!(engine.rate(&mut top).total, 12); // 6 + 6
    }

    #[test]
    fn test_rate_writes_breakdown_into_game() {
        let engine = RatingEngine::new();
        let mut game = create_test_game(101, 100, 1, 2, 55);
        game.lead_changes = 17;

        engine.rate(&mut game);

        assert_eq!(game.game_rating.score_difference, 10);
        assert_eq!(game.game_rating.standings, 8);
        assert_eq!(game.game_rating.maximum_points_player, 4);
        assert_eq!(game.game_rating.change_lead, 10);
        assert_eq!(game.game_rating.total, 32);
        assert_eq!(game.game_rating.total, RatingModel::Rating.max_total());
        assert_eq!(game.game_rating.model, RatingModel::Rating);
    }

    #[test]
    fn test_calculate_does_not_mutate() {
        let engine = RatingEngine::new();
        let game = create_test_game(100, 99, 1, 1, 10);

        let rating = engine.calculate(&game);
        assert_eq!(rating.total, 18);
        assert_eq!(game.game_rating, GameRating::default());
    }

    #[test]
    fn test_score_difference_bands() {
        let engine = RatingEngine::new();
        let cases = [
            (0, 10),
            (1, 10),
            (2, 8),
            (3, 8),
            (4, 6),
            (5, 6),
            (6, 4),
            (9, 4),
            (10, 0),
            (40, 0),
        ];

        for (diff, expected) in cases {
            assert_eq!(engine.score_difference(diff), expected, "diff {}", diff);
        }
    }

    #[test]
    fn test_standings_first_band_wins() {
        let engine = RatingEngine::new();

        assert_eq!(engine.standings(1, 2), 8);
        assert_eq!(engine.standings(3, 4), 6);
        assert_eq!(engine.standings(2, 4), 6);
        assert_eq!(engine.standings(5, 7), 4);
        // Both ≤7 wins over "either ≤3"
        assert_eq!(engine.standings(1, 7), 4);
        assert_eq!(engine.standings(3, 12), 2);
        assert_eq!(engine.standings(12, 1), 2);
        assert_eq!(engine.standings(8, 9), 0);
    }

    #[test]
    fn test_standings_unknown_position_is_literal_zero() {
        let engine = RatingEngine::new();

        // Position 0 satisfies every "≤" band
        assert_eq!(engine.standings(0, 0), 8);
        assert_eq!(engine.standings(0, 9), 2);
    }

    #[test]
    fn test_maximum_points_player_bands() {
        let engine = RatingEngine::new();

        assert_eq!(engine.maximum_points_player(0), 0);
        assert_eq!(engine.maximum_points_player(40), 0);
        assert_eq!(engine.maximum_points_player(41), 2);
        assert_eq!(engine.maximum_points_player(50), 2);
        assert_eq!(engine.maximum_points_player(51), 4);
    }

    #[test]
    fn test_change_lead_bands() {
        let engine = RatingEngine::new();
        let cases = [(0, 0), (3, 0), (4, 2), (6, 2), (7, 6), (10, 6), (11, 8), (16, 8), (17, 10)];

        for (changes, expected) in cases {
            assert_eq!(engine.change_lead(changes), expected, "changes {}", changes);
        }

        let older = RatingEngine::with_model(RatingModel::Punctuation);
        assert_eq!(older.change_lead(30), 0);
    }

    #[test]
    fn test_rating_model_from_str() {
        assert_eq!("rating".parse::<RatingModel>().unwrap(), RatingModel::Rating);
        assert_eq!(" Punctuation ".parse::<RatingModel>().unwrap(), RatingModel::Punctuation);
        assert!("elo".parse::<RatingModel>().is_err());
    }
}
