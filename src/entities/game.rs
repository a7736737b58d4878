// 🗓️ Game Entity - One scheduled game and everything merged into it
//
// Identity: game_id (stable, primary key of the registry)
// Values: teams, points, player high, lead changes, rating
//
// A Game is created once from its header row and then mutated in place by
// every later feed. Each Game owns its two Teams; nothing is shared.

use super::team::Team;
use crate::rating::RatingModel;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================================================
// SIDE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Home,
    Visitor,
}

// ============================================================================
// GAME RATING
// ============================================================================

/// Rating breakdown stored on the Game
///
/// `total` is the sum of the four components at the moment of computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRating {
    pub standings: u32,
    pub score_difference: u32,
    pub maximum_points_player: u32,
    pub change_lead: u32,
    pub total: u32,

    /// Which threshold tables produced the components
    #[serde(default)]
    pub model: RatingModel,
}

impl GameRating {
    /// Build a rating from its components, computing the total
    pub fn from_components(
        model: RatingModel,
        score_difference: u32,
        standings: u32,
        maximum_points_player: u32,
        change_lead: u32,
    ) -> Self {
        GameRating {
            standings,
            score_difference,
            maximum_points_player,
            change_lead,
            total: score_difference + standings + maximum_points_player + change_lead,
            model,
        }
    }

    pub fn is_rated(&self) -> bool {
        self.total > 0
    }
}

// ============================================================================
// GAME ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    // ========================================================================
    // IDENTITY - set once from the header row
    // ========================================================================
    pub date: NaiveDateTime,
    pub game_id: String,

    // ========================================================================
    // TEAMS - exclusively owned
    // ========================================================================
    pub home_team: Team,
    pub visitor_team: Team,

    // ========================================================================
    // MERGED VALUES - 0 until the matching feed supplies them
    // ========================================================================
    pub home_team_points: u32,
    pub visitor_team_points: u32,

    /// Highest single-player total across all team-leader rows
    pub maximum_points_player: u32,

    /// Filled by the lead-change detector
    pub lead_changes: u32,

    pub game_rating: GameRating,
}

impl Game {
    /// Create a game from header data: both teams are id-only stubs
    pub fn new(
        date: NaiveDateTime,
        game_id: impl Into<String>,
        home_team_id: impl Into<String>,
        visitor_team_id: impl Into<String>,
    ) -> Self {
        Game {
            date,
            game_id: game_id.into(),
            home_team: Team::new(home_team_id),
            visitor_team: Team::new(visitor_team_id),
            home_team_points: 0,
            visitor_team_points: 0,
            maximum_points_player: 0,
            lead_changes: 0,
            game_rating: GameRating::default(),
        }
    }

    /// Which side a team id refers to.
    ///
    /// Exact match against the home id, anything else is the visitor.
    pub fn side_of(&self, team_id: &str) -> Side {
        if self.home_team.team_id == team_id {
            Side::Home
        } else {
            Side::Visitor
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Home => &mut self.home_team,
            Side::Visitor => &mut self.visitor_team,
        }
    }

    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_team_points,
            Side::Visitor => self.visitor_team_points,
        }
    }

    pub fn set_points(&mut self, side: Side, points: u32) {
        match side {
            Side::Home => self.home_team_points = points,
            Side::Visitor => self.visitor_team_points = points,
        }
    }

    /// Absolute margin between the two final scores
    pub fn score_difference(&self) -> u32 {
        self.home_team_points.abs_diff(self.visitor_team_points)
    }

    /// "Home vs Visitor" for display
    pub fn matchup(&self) -> String {
        format!(
            "{} vs {}",
            self.home_team.display_name(),
            self.visitor_team.display_name()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
