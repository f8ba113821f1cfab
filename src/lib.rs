//! NBA playoff headline generation via nearest-neighbor retrieval
//!
//! Scrapes ESPN box scores, characterizes each game with a weighted feature
//! vector, and generates a headline for a new game by retargeting the
//! headline of its most similar historical game.

pub mod data;
pub mod features;
pub mod generate;
pub mod headline;
pub mod model;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// ESPN game identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub i64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side of the matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = HeadlinerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "home" => Ok(Side::Home),
            "away" => Ok(Side::Away),
            other => Err(HeadlinerError::Parse(format!("unknown side: {}", other))),
        }
    }
}

/// A value held for both sides of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub home: T,
    pub away: T,
}

impl<T> SidePair<T> {
    pub fn new(home: T, away: T) -> Self {
        SidePair { home, away }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

/// Team identity as rendered on the box-score page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamNames {
    /// Franchise name, e.g. "Raptors"
    pub team: String,
    /// City or region, e.g. "Toronto"
    pub city: String,
    /// Short code, e.g. "TOR"
    pub abbr: String,
}

/// Line score for one side: final total plus per-period scores
///
/// Overtime periods are appended after the fourth quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub total: u32,
    pub periods: Vec<u32>,
}

impl ScoreLine {
    /// Score for a 1-based period number, if played
    pub fn period(&self, number: usize) -> Option<u32> {
        if number == 0 {
            return None;
        }
        self.periods.get(number - 1).copied()
    }
}

/// Points leader for one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsLeader {
    pub leader: String,
    pub pts: u32,
    /// Field goals as made-attempted text, e.g. "12-25"
    pub fg: String,
    /// Free throws as made-attempted text
    pub ft: String,
}

/// Rebounds leader for one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReboundsLeader {
    pub leader: String,
    pub reb: u32,
    pub dreb: u32,
    pub oreb: u32,
}

/// Assists leader for one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistsLeader {
    pub leader: String,
    pub ast: u32,
    pub to: u32,
    pub min: u32,
}

/// One playoff game's box score and metadata
///
/// Constructed once, from a scraped page or a stored row, and read-only
/// afterwards. Identified externally by its [`GameId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub headline: String,
    /// Playoff round descriptor, e.g. "EASTERN CONFERENCE SEMIFINALS"
    pub round: String,
    pub winner: Side,
    pub names: SidePair<TeamNames>,
    pub scores: SidePair<ScoreLine>,
    pub quarters: u32,
    pub pts: SidePair<PointsLeader>,
    pub reb: SidePair<ReboundsLeader>,
    pub ast: SidePair<AssistsLeader>,
    /// Game number within the playoff series
    pub n_game: u32,
    /// Series wins for the home team before this game
    pub home_wins: u32,
    /// Series wins for the away team before this game
    pub away_wins: u32,
}

impl GameRecord {
    /// Final score of the winning side
    pub fn winning_score(&self) -> u32 {
        self.scores.get(self.winner).total
    }

    /// Final score of the losing side
    pub fn losing_score(&self) -> u32 {
        self.scores.get(self.winner.opposite()).total
    }

    /// Absolute final-score margin
    pub fn point_difference(&self) -> u32 {
        self.winning_score() - self.losing_score()
    }

    /// Signed score margin for a 1-based period, from the winner's perspective
    pub fn period_margin(&self, number: usize) -> Option<i64> {
        let winner = self.scores.get(self.winner).period(number)?;
        let loser = self.scores.get(self.winner.opposite()).period(number)?;
        Some(winner as i64 - loser as i64)
    }

    /// Winning side's leading scorer points minus the losing side's
    pub fn pts_leader_margin(&self) -> i64 {
        let winner = self.pts.get(self.winner).pts;
        let loser = self.pts.get(self.winner.opposite()).pts;
        winner as i64 - loser as i64
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum HeadlinerError {
    #[error("Acquisition failed for game {game_id}: {message}")]
    Acquisition { game_id: GameId, message: String },

    #[error("Scrape failed for {url}: {message}")]
    Scrape { url: String, message: String },

    #[error("Game {0} is not in the database")]
    UnknownGame(GameId),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate feature name: {0}")]
    DuplicateFeature(String),

    #[error("Feature '{feature}' failed to evaluate: {message}")]
    FeatureEvaluation { feature: String, message: String },

    #[error("Insufficient data: need at least {required} examples, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Index not fitted - call fit before query")]
    NotFitted,

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, HeadlinerError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub database_path: String,
    /// Directory for cached ESPN pages; no caching when absent
    pub cache_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub start_year: u16,
    /// Defaults to the current year when absent
    pub end_year: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                database_path: "data/headliner.db".to_string(),
                cache_dir: None,
            },
            scrape: ScrapeConfig {
                start_year: 2003,
                end_year: None,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HeadlinerError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HeadlinerError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HeadlinerError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
