use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::model::SessionId;
use crate::error::{CatalogError, Result};

/// Sessions excluded because their recordings are wrongly georeferenced.
pub const DEFAULT_BLACKLIST: [&str; 6] = [
    "rdb6_2DJI_0006",
    "rdb6_2DJI_0007",
    "rdb6_2DJI_0008",
    "rdb6_2DJI_0009",
    "rdb6_DJI_0016",
    "rdb3_M1DJI_0021",
];

const LIST_TABLES_SQL: &str = "SELECT tbl_name FROM sqlite_master WHERE type='table'";

// ---------------------------------------------------------------------------
// SessionBlacklist
// ---------------------------------------------------------------------------

/// Immutable set of session names to drop. Matching is exact and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBlacklist {
    names: BTreeSet<String>,
}

impl SessionBlacklist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Keep every session.
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

}

impl Default for SessionBlacklist {
    fn default() -> Self {
        Self::new(DEFAULT_BLACKLIST)
    }
}

// ---------------------------------------------------------------------------
// SessionIndexer
// ---------------------------------------------------------------------------

/// Lists the recording sessions of a session store, one per table.
#[derive(Debug, Clone, Default)]
pub struct SessionIndexer {
    blacklist: SessionBlacklist,
}

impl SessionIndexer {
    pub fn new(blacklist: SessionBlacklist) -> Self {
        Self { blacklist }
    }

    /// Return every table name of the store at `db_path` that is not
    /// blacklisted, in the order SQLite reports them.
    ///
    /// The store is opened read-only, so a missing file is an error rather
    /// than a freshly created empty database.
    pub fn list_sessions(&self, db_path: &Path) -> Result<Vec<SessionId>> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| CatalogError::StoreUnavailable {
            path: db_path.to_path_buf(),
            source,
        })?;

        let names = query_table_names(&conn).map_err(|e| CatalogError::from_query(db_path, e))?;
        let total = names.len();

        let sessions: Vec<SessionId> = names
            .into_iter()
            .filter(|name| {
                log::debug!("found session table {name}");
                let skip = self.blacklist.contains(name);
                if skip {
                    log::debug!("skipping blacklisted session {name}");
                }
                !skip
            })
            .map(SessionId::new)
            .collect();

        log::info!(
            "indexed {} sessions from {} ({} blacklisted)",
            sessions.len(),
            db_path.display(),
            total - sessions.len()
        );
        Ok(sessions)
    }
}

fn query_table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(LIST_TABLES_SQL)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}
