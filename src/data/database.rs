//! SQLite storage for game records
//!
//! One row per game, keyed by ESPN game id. Nested structures (team names,
//! line scores, stat leaders) are stored as JSON text columns so a row
//! round-trips the full [`GameRecord`] losslessly.

use crate::{GameId, GameRecord, Result, Side};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::str::FromStr;

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                game_id INTEGER PRIMARY KEY,
                headline TEXT NOT NULL,
                round TEXT NOT NULL,
                winner TEXT NOT NULL,
                names TEXT NOT NULL,
                scores TEXT NOT NULL,
                quarters INTEGER NOT NULL,
                pts TEXT NOT NULL,
                reb TEXT NOT NULL,
                ast TEXT NOT NULL,
                n_game INTEGER NOT NULL,
                home_wins INTEGER NOT NULL,
                away_wins INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS schedule (
                game_id INTEGER PRIMARY KEY,
                season INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_schedule_season ON schedule(season);
            "#,
        )?;
        Ok(())
    }

    // ==================== Game Operations ====================

    /// Insert or replace a game record
    pub fn upsert_game(&self, game_id: GameId, record: &GameRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO games (game_id, headline, round, winner, names, scores,
                               quarters, pts, reb, ast, n_game, home_wins, away_wins)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(game_id) DO UPDATE SET
                headline = excluded.headline,
                round = excluded.round,
                winner = excluded.winner,
                names = excluded.names,
                scores = excluded.scores,
                quarters = excluded.quarters,
                pts = excluded.pts,
                reb = excluded.reb,
                ast = excluded.ast,
                n_game = excluded.n_game,
                home_wins = excluded.home_wins,
                away_wins = excluded.away_wins
            "#,
            params![
                game_id.0,
                record.headline,
                record.round,
                record.winner.as_str(),
                serde_json::to_string(&record.names)?,
                serde_json::to_string(&record.scores)?,
                record.quarters,
                serde_json::to_string(&record.pts)?,
                serde_json::to_string(&record.reb)?,
                serde_json::to_string(&record.ast)?,
                record.n_game,
                record.home_wins,
                record.away_wins,
            ],
        )?;
        Ok(())
    }

    /// Fetch a single game, if stored
    pub fn get_game(&self, game_id: GameId) -> Result<Option<GameRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT headline, round, winner, names, scores, quarters,
                        pts, reb, ast, n_game, home_wins, away_wins
                 FROM games WHERE game_id = ?1",
                params![game_id.0],
                Self::row_to_game,
            )
            .optional()?;
        Ok(record)
    }

    /// All stored games in ascending game-id order
    pub fn get_all_games(&self) -> Result<Vec<(GameId, GameRecord)>> {
        let mut stmt = self.conn.prepare(
            "SELECT game_id, headline, round, winner, names, scores, quarters,
                    pts, reb, ast, n_game, home_wins, away_wins
             FROM games ORDER BY game_id",
        )?;

        let games = stmt
            .query_map([], |row| {
                let game_id = GameId(row.get(0)?);
                let record = Self::row_to_game_with_offset(row, 1)?;
                Ok((game_id, record))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(games)
    }

    fn row_to_game(row: &rusqlite::Row) -> rusqlite::Result<GameRecord> {
        Self::row_to_game_with_offset(row, 0)
    }

    fn row_to_game_with_offset(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<GameRecord> {
        let winner_str: String = row.get(offset + 2)?;
        let winner = Side::from_str(&winner_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 2,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;

        Ok(GameRecord {
            headline: row.get(offset)?,
            round: row.get(offset + 1)?,
            winner,
            names: json_column(row, offset + 3)?,
            scores: json_column(row, offset + 4)?,
            quarters: row.get(offset + 5)?,
            pts: json_column(row, offset + 6)?,
            reb: json_column(row, offset + 7)?,
            ast: json_column(row, offset + 8)?,
            n_game: row.get(offset + 9)?,
            home_wins: row.get(offset + 10)?,
            away_wins: row.get(offset + 11)?,
        })
    }

    // ==================== Schedule Operations ====================

    /// Store discovered game ids for a season; already-known ids are kept
    pub fn insert_schedule_ids(&self, season: u16, ids: &[GameId]) -> Result<usize> {
        let mut inserted = 0;
        for id in ids {
            inserted += self.conn.execute(
                "INSERT OR IGNORE INTO schedule (game_id, season) VALUES (?1, ?2)",
                params![id.0, season],
            )?;
        }
        Ok(inserted)
    }

    /// Scheduled game ids with no stored game yet
    pub fn pending_ids(&self) -> Result<Vec<GameId>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.game_id FROM schedule s
             LEFT JOIN games g ON g.game_id = s.game_id
             WHERE g.game_id IS NULL
             ORDER BY s.game_id",
        )?;

        let ids = stmt
            .query_map([], |row| Ok(GameId(row.get(0)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    // ==================== Statistics ====================

    /// Number of stored game records
    pub fn count_games(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of discovered schedule ids
    pub fn count_schedule(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM schedule", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get store statistics
    pub fn get_stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            game_count: self.count_games()?,
            schedule_count: self.count_schedule()?,
            pending_count: self.pending_ids()?.len(),
        })
    }
}

fn json_column<T: serde::de::DeserializeOwned>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub game_count: usize,
    pub schedule_count: usize,
    /// Scheduled ids not yet synced into the games table
    pub pending_count: usize,
}
