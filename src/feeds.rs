// 📥 Feed Decoding - Typed rows over the stats provider's resultSets
//
// The provider ships every table as {"name", "headers", "rowSet"} where each
// row is a positional array. This module is the only place that knows the
// offsets: rows go in as JSON arrays and come out as named structs, or as a
// FeedError when a row is shorter than its schema.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One positional row as the provider sends it
pub type Row = Vec<Value>;

// ============================================================================
// FEED KIND
// ============================================================================

/// Feed - Which table a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feed {
    GameHeader,
    LineScore,
    TeamLeaders,
    ConfStandings,
}

impl Feed {
    pub fn name(&self) -> &'static str {
        match self {
            Feed::GameHeader => "GameHeader",
            Feed::LineScore => "LineScore",
            Feed::TeamLeaders => "TeamLeaders",
            Feed::ConfStandings => "ConfStandings",
        }
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum FeedError {
    /// Row is shorter than the offset being read
    #[error("{feed} row index out of range: index {index} but row has {len} fields")]
    MissingField { feed: Feed, index: usize, len: usize },

    #[error("{feed} field {index}: expected {expected}, found {found}")]
    InvalidField {
        feed: Feed,
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("{feed} invalid date: {value}")]
    InvalidDate { feed: Feed, value: String },

    #[error("document has no result sets")]
    MissingResultSet,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FeedError {
    /// True for the structural "row too short" failure
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, FeedError::MissingField { .. })
    }
}

// ============================================================================
// FIELD ACCESS
// ============================================================================

fn field(feed: Feed, row: &[Value], index: usize) -> Result<&Value, FeedError> {
    row.get(index).ok_or(FeedError::MissingField {
        feed,
        index,
        len: row.len(),
    })
}

/// Read an identifier or label.
///
/// The live feed sends team ids as numbers and game ids as strings, so both
/// are accepted and rendered as text.
pub fn text(feed: Feed, row: &[Value], index: usize) -> Result<String, FeedError> {
    match field(feed, row, index)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(FeedError::InvalidField {
            feed,
            index,
            expected: "string or number",
            found: other.to_string(),
        }),
    }
}

/// Read a points value. `null` means the provider has not filled it yet.
pub fn count(feed: Feed, row: &[Value], index: usize) -> Result<Option<u32>, FeedError> {
    let value = field(feed, row, index)?;

    if value.is_null() {
        return Ok(None);
    }

    let parsed = value
        .as_u64()
        .or_else(|| {
            // Some endpoints serialise integral stats as 30.0
            value
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        })
        .and_then(|n| u32::try_from(n).ok());

    parsed.map(Some).ok_or_else(|| FeedError::InvalidField {
        feed,
        index,
        expected: "non-negative integer",
        found: value.to_string(),
    })
}

fn require_width(feed: Feed, row: &[Value], width: usize) -> Result<(), FeedError> {
    if row.len() < width {
        return Err(FeedError::MissingField {
            feed,
            index: width - 1,
            len: row.len(),
        });
    }
    Ok(())
}

/// Parse GAME_DATE_EST ("2024-01-07T00:00:00"), or a bare date at midnight
pub fn parse_game_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ============================================================================
// TYPED ROWS
// ============================================================================

/// GameHeader row: [0]=date, [2]=game_id, [6]=home id, [7]=visitor id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameHeaderRow {
    pub date: NaiveDateTime,
    pub game_id: String,
    pub home_team_id: String,
    pub visitor_team_id: String,
}

impl GameHeaderRow {
    pub const WIDTH: usize = 8;

    pub fn decode(row: &[Value]) -> Result<Self, FeedError> {
        let feed = Feed::GameHeader;
        require_width(feed, row, Self::WIDTH)?;

        let raw_date = text(feed, row, 0)?;
        let date = parse_game_date(&raw_date).ok_or_else(|| FeedError::InvalidDate {
            feed,
            value: raw_date.clone(),
        })?;

        Ok(GameHeaderRow {
            date,
            game_id: text(feed, row, 2)?,
            home_team_id: text(feed, row, 6)?,
            visitor_team_id: text(feed, row, 7)?,
        })
    }
}

/// LineScore row: [2]=game_id, [3]=team_id, [4..=6]=names, [22]=points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScoreRow {
    pub game_id: String,
    pub team_id: String,
    pub team_abbreviation: String,
    pub team_city_name: String,
    pub team_name: String,
    pub points: Option<u32>,
}

impl LineScoreRow {
    pub const WIDTH: usize = 23;

    /// Read only the join key, so rows for other games can be skipped
    pub fn game_id(row: &[Value]) -> Result<String, FeedError> {
        text(Feed::LineScore, row, 2)
    }

    pub fn decode(row: &[Value]) -> Result<Self, FeedError> {
        let feed = Feed::LineScore;
        require_width(feed, row, Self::WIDTH)?;

        Ok(LineScoreRow {
            game_id: text(feed, row, 2)?,
            team_id: text(feed, row, 3)?,
            team_abbreviation: text(feed, row, 4)?,
            team_city_name: text(feed, row, 5)?,
            team_name: text(feed, row, 6)?,
            points: count(feed, row, 22)?,
        })
    }
}

/// TeamLeaders row: [0]=game_id, [7]=points of the team's top scorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLeaderRow {
    pub game_id: String,
    pub points: Option<u32>,
}

impl TeamLeaderRow {
    pub const WIDTH: usize = 8;

    pub fn game_id(row: &[Value]) -> Result<String, FeedError> {
        text(Feed::TeamLeaders, row, 0)
    }

    pub fn decode(row: &[Value]) -> Result<Self, FeedError> {
        let feed = Feed::TeamLeaders;
        require_width(feed, row, Self::WIDTH)?;

        Ok(TeamLeaderRow {
            game_id: text(feed, row, 0)?,
            points: count(feed, row, 7)?,
        })
    }
}

/// Conference standings row: [0]=team_id, [4]=conference label.
/// The rank is the row's position in the table, not a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingRow {
    pub team_id: String,
    pub conference: String,
}

impl StandingRow {
    pub const WIDTH: usize = 5;

    pub fn decode(row: &[Value]) -> Result<Self, FeedError> {
        let feed = Feed::ConfStandings;
        require_width(feed, row, Self::WIDTH)?;

        Ok(StandingRow {
            team_id: text(feed, row, 0)?,
            conference: text(feed, row, 4)?,
        })
    }
}

// ============================================================================
// DOCUMENTS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub headers: Vec<String>,

    #[serde(rename = "rowSet", default)]
    pub row_set: Vec<Row>,
}

/// Position of a column by header name
pub fn column_position(headers: &[String], header: &str) -> Option<usize> {
    headers.iter().position(|h| h == header)
}

/// Scoreboard document for one date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    #[serde(rename = "resultSets", default)]
    pub result_sets: Vec<ResultSet>,
}

impl Scoreboard {
    pub const GAME_HEADER: &'static str = "GameHeader";
    pub const LINE_SCORE: &'static str = "LineScore";
    pub const TEAM_LEADERS: &'static str = "TeamLeaders";
    pub const EAST_CONF_STANDINGS: &'static str = "EastConfStandingsByDay";
    pub const WEST_CONF_STANDINGS: &'static str = "WestConfStandingsByDay";

    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rows of a named table; a missing table reads as empty
    pub fn rows(&self, name: &str) -> &[Row] {
        self.result_sets
            .iter()
            .find(|rs| rs.name == name)
            .map(|rs| rs.row_set.as_slice())
            .unwrap_or(&[])
    }

    pub fn game_headers(&self) -> &[Row] {
        self.rows(Self::GAME_HEADER)
    }

    pub fn line_scores(&self) -> &[Row] {
        self.rows(Self::LINE_SCORE)
    }

    pub fn team_leaders(&self) -> &[Row] {
        self.rows(Self::TEAM_LEADERS)
    }

    pub fn east_conf_standings(&self) -> &[Row] {
        self.rows(Self::EAST_CONF_STANDINGS)
    }

    pub fn west_conf_standings(&self) -> &[Row] {
        self.rows(Self::WEST_CONF_STANDINGS)
    }
}

/// Play-by-play document for one game (first result set is the event log)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayByPlay {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl PlayByPlay {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        PlayByPlay { headers, rows }
    }

    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        let doc: Scoreboard = serde_json::from_str(json)?;
        let first = doc
            .result_sets
            .into_iter()
            .next()
            .ok_or(FeedError::MissingResultSet)?;

        Ok(PlayByPlay {
            headers: first.headers,
            rows: first.row_set,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
