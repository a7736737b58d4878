// 🔁 Lead-Change Detector - Count how often the lead flipped
//
// SCORE is "<visitor> - <home>". Rows without a usable score are skipped.
// Passing through a tie does not count by itself: only home → visitor or
// visitor → home between consecutive scored rows does.

use crate::feeds::{column_position, PlayByPlay, Row};
use serde_json::Value;

/// Header of the play-by-play column that carries the running score
pub const SCORE_HEADER: &str = "SCORE";

const SCORE_SEPARATOR: &str = " - ";

// ============================================================================
// LEAD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    Home,
    Visitor,
    Tie,
}

impl Lead {
    pub fn classify(visitor_score: i64, home_score: i64) -> Lead {
        if home_score > visitor_score {
            Lead::Home
        } else if visitor_score > home_score {
            Lead::Visitor
        } else {
            Lead::Tie
        }
    }

    fn is_side(&self) -> bool {
        matches!(self, Lead::Home | Lead::Visitor)
    }
}

/// Parse "<visitor> - <home>" into (visitor, home)
pub fn parse_score(score: &str) -> Option<(i64, i64)> {
    let parts: Vec<&str> = score.split(SCORE_SEPARATOR).collect();
    if parts.len() != 2 {
        return None;
    }

    let visitor = parts[0].trim().parse::<i64>().ok()?;
    let home = parts[1].trim().parse::<i64>().ok()?;
    Some((visitor, home))
}

// ============================================================================
// DETECTOR
// ============================================================================

/// Streaming state machine: feed scores in temporal order, then `finish()`
#[derive(Debug, Clone, Default)]
pub struct LeadChangeDetector {
    previous_lead: Option<Lead>,
    lead_changes: u32,
}

impl LeadChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one row's score (None when the row has none)
    pub fn observe(&mut self, score: Option<&str>) {
        let Some((visitor, home)) = score.and_then(parse_score) else {
            return;
        };

        let current = Lead::classify(visitor, home);

        if let Some(previous) = self.previous_lead {
            if previous.is_side() && current.is_side() && previous != current {
                self.lead_changes += 1;
            }
        }

        self.previous_lead = Some(current);
    }

    /// Lead after the last scored row, None before any
    pub fn lead(&self) -> Option<Lead> {
        self.previous_lead
    }

    pub fn lead_changes(&self) -> u32 {
        self.lead_changes
    }

    pub fn finish(self) -> u32 {
        self.lead_changes
    }
}

// ============================================================================
// ROW STREAMS
// ============================================================================

/// Count lead changes across play-by-play rows, locating SCORE by header name
pub fn count_lead_changes(headers: &[String], rows: &[Row]) -> u32 {
    let score_column = column_position(headers, SCORE_HEADER);
    let mut detector = LeadChangeDetector::new();

    for row in rows {
        let score = score_column
            .and_then(|i| row.get(i))
            .and_then(Value::as_str);
        detector.observe(score);
    }

    detector.finish()
}

pub fn count_lead_changes_in(play_by_play: &PlayByPlay) -> u32 {
    count_lead_changes(&play_by_play.headers, &play_by_play.rows)
}

// ============================================================================
// TESTS
// ============================================================================
