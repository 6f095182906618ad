// SQLite persistence for ingested player lists and session state.
//
// The engine itself is pure; this store is the collaborator that holds the
// player list between CLI invocations. Ingesting a new file for a source
// replaces that source's rows wholesale; there is no merge path.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::model::{DataSource, PlayerRecord, Stats};

/// Upload bookkeeping for one source, shown by the CLI and kept in the
/// key-value state table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStatus {
    pub last_update: DateTime<Utc>,
    pub players: usize,
    pub row_errors: usize,
}

/// SQLite-backed persistence for player lists and key-value session state.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS players (
                source           TEXT NOT NULL,
                name             TEXT NOT NULL,
                position         TEXT NOT NULL,
                team             TEXT NOT NULL,
                opponent         TEXT NOT NULL,
                minutes          REAL NOT NULL,
                original_minutes REAL NOT NULL,
                stats            TEXT NOT NULL,
                original_stats   TEXT NOT NULL,
                PRIMARY KEY (source, name)
            );

            CREATE TABLE IF NOT EXISTS session_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Replace the entire player list for a source in one transaction.
    /// Insertion order preserves file order for later loads.
    pub fn replace_players(&self, source: DataSource, players: &[PlayerRecord]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;

        tx.execute(
            "DELETE FROM players WHERE source = ?1",
            params![source.as_str()],
        )
        .context("failed to clear previous player list")?;

        for player in players {
            let stats_json =
                serde_json::to_string(&player.stats).context("failed to serialize stats")?;
            let original_json = serde_json::to_string(&player.original_stats)
                .context("failed to serialize original stats")?;
            tx.execute(
                "INSERT OR REPLACE INTO players
                    (source, name, position, team, opponent, minutes,
                     original_minutes, stats, original_stats)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    source.as_str(),
                    player.name,
                    player.position,
                    player.team,
                    player.opponent,
                    player.minutes,
                    player.original_minutes,
                    stats_json,
                    original_json,
                ],
            )
            .context("failed to insert player")?;
        }

        tx.commit().context("failed to commit player replacement")
    }

    /// Load the stored player list for a source, in the order it was
    /// ingested. Returns an empty list when nothing has been ingested.
    pub fn load_players(&self, source: DataSource) -> Result<Vec<PlayerRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT name, position, team, opponent, minutes,
                        original_minutes, stats, original_stats
                 FROM players WHERE source = ?1 ORDER BY rowid",
            )
            .context("failed to prepare load_players query")?;

        let players = stmt
            .query_map(params![source.as_str()], |row| {
                let stats_json: String = row.get(6)?;
                let original_json: String = row.get(7)?;
                Ok((
                    PlayerRecord {
                        name: row.get(0)?,
                        position: row.get(1)?,
                        team: row.get(2)?,
                        opponent: row.get(3)?,
                        minutes: row.get(4)?,
                        original_minutes: row.get(5)?,
                        stats: Stats::default(),
                        original_stats: Stats::default(),
                    },
                    stats_json,
                    original_json,
                ))
            })
            .context("failed to query players")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map player rows")?;

        players
            .into_iter()
            .map(|(mut player, stats_json, original_json)| {
                player.stats = serde_json::from_str(&stats_json)
                    .context("failed to deserialize stats")?;
                player.original_stats = serde_json::from_str(&original_json)
                    .context("failed to deserialize original stats")?;
                Ok(player)
            })
            .collect()
    }

    /// Persist one player's current minutes and stats after an accepted
    /// adjustment. Baseline columns are left untouched.
    pub fn update_player(&self, source: DataSource, player: &PlayerRecord) -> Result<()> {
        let conn = self.conn();
        let stats_json =
            serde_json::to_string(&player.stats).context("failed to serialize stats")?;
        let updated = conn
            .execute(
                "UPDATE players SET minutes = ?1, stats = ?2
                 WHERE source = ?3 AND name = ?4",
                params![player.minutes, stats_json, source.as_str(), player.name],
            )
            .context("failed to update player")?;
        anyhow::ensure!(
            updated == 1,
            "player '{}' not found for source {}",
            player.name,
            source
        );
        Ok(())
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE
    /// so repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO session_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the
    /// key does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM session_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query session state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    const SELECTED_TEAM_KEY: &'static str = "selected_team";
    const ACTIVE_SOURCE_KEY: &'static str = "active_source";

    pub fn set_selected_team(&self, team: &str) -> Result<()> {
        self.save_state(
            Self::SELECTED_TEAM_KEY,
            &serde_json::Value::String(team.to_string()),
        )
    }

    pub fn selected_team(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::SELECTED_TEAM_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    pub fn set_active_source(&self, source: DataSource) -> Result<()> {
        self.save_state(
            Self::ACTIVE_SOURCE_KEY,
            &serde_json::to_value(source).context("failed to serialize source")?,
        )
    }

    pub fn active_source(&self) -> Result<Option<DataSource>> {
        match self.load_state(Self::ACTIVE_SOURCE_KEY)? {
            Some(value) => serde_json::from_value(value)
                .context("failed to deserialize active source")
                .map(Some),
            None => Ok(None),
        }
    }

    /// Record upload bookkeeping for a source.
    pub fn set_file_status(&self, source: DataSource, status: &FileStatus) -> Result<()> {
        self.save_state(
            &format!("file_status:{source}"),
            &serde_json::to_value(status).context("failed to serialize file status")?,
        )
    }

    pub fn file_status(&self, source: DataSource) -> Result<Option<FileStatus>> {
        match self.load_state(&format!("file_status:{source}"))? {
            Some(value) => serde_json::from_value(value)
                .context("failed to deserialize file status")
                .map(Some),
            None => Ok(None),
        }
    }

    /// Delete all players and session state, resetting to a clean slate.
    /// Uses a transaction with automatic rollback on error.
    pub fn clear_session(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM players", [])
            .context("failed to delete players")?;
        tx.execute("DELETE FROM session_state", [])
            .context("failed to delete session state")?;
        tx.commit().context("failed to commit clear_session")
    }
}
