// 🏀 Team Entity - Stable identity + display values
//
// "team_id is IDENTITY (never changes), names and standings are VALUES"
//
// A Team starts as a stub carrying only its id (from the game header feed)
// and is filled in by the line-score and standings feeds.

use serde::{Deserialize, Serialize};

// ============================================================================
// TEAM ENTITY
// ============================================================================

/// One side of a game.
///
/// Identity: `team_id` (external id from the stats provider)
/// Values: display strings and conference standing (filled by the merger)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    // ========================================================================
    // IDENTITY - never changes once assigned
    // ========================================================================
    pub team_id: String,

    // ========================================================================
    // VALUES - empty until the line-score feed supplies them
    // ========================================================================
    pub team_abbreviation: String,
    pub team_city_name: String,
    pub team_name: String,

    /// Conference label as the standings feed writes it ("East", "West")
    pub conference: String,

    /// 1-based rank within the conference, 0 = unknown
    pub conference_position: u32,
}

impl Team {
    /// Create a stub with only the identity populated
    pub fn new(team_id: impl Into<String>) -> Self {
        Team {
            team_id: team_id.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set the conference standing
    pub fn with_standing(mut self, conference: impl Into<String>, position: u32) -> Self {
        self.conference = conference.into();
        self.conference_position = position;
        self
    }

    /// Builder pattern: set the display strings
    pub fn with_names(
        mut self,
        abbreviation: impl Into<String>,
        city: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.team_abbreviation = abbreviation.into();
        self.team_city_name = city.into();
        self.team_name = name.into();
        self
    }

    /// Check if a standings feed has ranked this team
    pub fn has_standing(&self) -> bool {
        self.conference_position > 0
    }

    /// Human-readable name for display
    ///
    /// "City Name" when the line score has been merged, otherwise the
    /// abbreviation, otherwise the raw id.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.team_city_name, self.team_name);
        let full = full.trim();

        if !full.is_empty() {
            return full.to_string();
        }

        if !self.team_abbreviation.is_empty() {
            return self.team_abbreviation.clone();
        }

        self.team_id.clone()
    }
}

// ============================================================================
// TESTS
// ============================================================================
