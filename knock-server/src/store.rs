use knock_core::TrialRecord;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS trial_data (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    userId       TEXT,
    trialNumber  INTEGER,
    stimulus     TEXT,
    reactionTime INTEGER,
    knocked      BOOLEAN,
    correct      BOOLEAN,
    scoreChange  INTEGER,
    newScore     INTEGER,
    timestamp    DATETIME DEFAULT CURRENT_TIMESTAMP
)";

/// Append-only SQLite store for trial records.
///
/// One table, one insert per record; the session engine never reads back.
pub struct TrialStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl TrialStore {
    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Inserts one record and returns the generated row id.
    pub fn insert(&self, record: &TrialRecord) -> rusqlite::Result<i64> {
        let conn = self.conn.lock().expect("store poisoned");
        conn.execute(
            "INSERT INTO trial_data
                 (userId, trialNumber, stimulus, reactionTime, knocked, correct, scoreChange, newScore)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.user_id,
                record.trial_number as i64,
                record.stimulus,
                record.reaction_time as i64,
                record.knocked,
                record.correct,
                record.score_change,
                record.new_score,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Drops and recreates the trial table.
    pub fn reset(&self) -> rusqlite::Result<()> {
        let conn = self.conn.lock().expect("store poisoned");
        conn.execute_batch("DROP TABLE IF EXISTS trial_data")?;
        conn.execute_batch(SCHEMA)
    }

    pub fn count(&self) -> rusqlite::Result<i64> {
        let conn = self.conn.lock().expect("store poisoned");
        conn.query_row("SELECT COUNT(*) FROM trial_data", [], |row| row.get(0))
    }

    /// Location of the database file, for the export endpoint.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
