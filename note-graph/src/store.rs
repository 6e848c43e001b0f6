//! Reads notes from the Bear sqlite database.
//!
//! Bear keeps its database inside its sandbox container; we never open that
//! file directly but work on a copy in the configured tmp directory.

use crate::error::GraphError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Location of the Bear database relative to `$HOME`.
pub const BEAR_DB_RELATIVE: &str =
    "Library/Group Containers/9K33E3U3T4.net.shinyfrog.bear/Application Data/database.sqlite";

const NOTE_QUERY: &str =
    "SELECT ZTITLE, ZTEXT, ZUNIQUEIDENTIFIER FROM ZSFNOTE WHERE ZTRASHED LIKE '0'";

/// One note as stored: title, markdown body and Bear's unique identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub title: String,
    pub text: String,
    pub uuid: String,
}

/// Returns the path of the live Bear database.
pub fn bear_db_path() -> Result<PathBuf, GraphError> {
    let home = std::env::var_os("HOME").ok_or(GraphError::NoHome)?;
    Ok(PathBuf::from(home).join(BEAR_DB_RELATIVE))
}

/// Copies the database into `tmp` and returns the copy's path.
pub fn copy_database(source: &Path, tmp: &Path) -> Result<PathBuf, GraphError> {
    let destination = tmp.join("BearExportTemp.sqlite");
    log::info!("Copying Bear database to {}", destination.display());
    std::fs::copy(source, &destination).map_err(|err| GraphError::ReadFile {
        path: source.to_path_buf(),
        source: err,
    })?;
    Ok(destination)
}

/// Fetches all non-trashed notes from the database at `db`.
pub fn fetch_notes(db: &Path) -> Result<Vec<Note>, GraphError> {
    log::info!("Fetching notes from (the copy of) the database");
    let conn = Connection::open(db)?;
    let notes = notes_from(&conn)?;
    log::info!("Fetched {} notes from the (copy of the) Bear database", notes.len());
    Ok(notes)
}

fn notes_from(conn: &Connection) -> Result<Vec<Note>, GraphError> {
    let mut stmt = conn.prepare(NOTE_QUERY)?;
    let rows = stmt.query_map([], |row| {
        Ok(Note {
            // Title and text are nullable in Bear's schema.
            title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
            text: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            uuid: row.get(2)?,
        })
    })?;
    let mut notes = Vec::new();
    for note in rows {
        notes.push(note?);
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE ZSFNOTE (
                 ZTITLE TEXT,
                 ZTEXT TEXT,
                 ZUNIQUEIDENTIFIER TEXT,
                 ZTRASHED INTEGER
             );
             INSERT INTO ZSFNOTE VALUES ('note title', 'some text and a #tag', '42', 0);
             INSERT INTO ZSFNOTE VALUES ('empty note title', NULL, '43', 0);
             INSERT INTO ZSFNOTE VALUES ('trashed', 'gone', '44', 1);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn trashed_notes_are_excluded() {
        let notes = notes_from(&seeded_connection()).unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.uuid != "44"));
    }

    #[test]
    fn null_text_becomes_empty() {
        let notes = notes_from(&seeded_connection()).unwrap();
        let empty = notes.iter().find(|n| n.uuid == "43").unwrap();
        assert_eq!(empty.text, "");
        assert_eq!(empty.title, "empty note title");
    }

    #[test]
    fn fetch_notes_opens_a_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.sqlite");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE ZSFNOTE (
                     ZTITLE TEXT,
                     ZTEXT TEXT,
                     ZUNIQUEIDENTIFIER TEXT,
                     ZTRASHED INTEGER
                 );
                 INSERT INTO ZSFNOTE VALUES ('on disk', 'body', '1', 0);",
            )
            .unwrap();
        }
        let notes = fetch_notes(&path).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "on disk");
    }

    #[test]
    fn copy_database_places_the_copy_in_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.sqlite");
        std::fs::write(&source, b"not really a database").unwrap();
        let copy = copy_database(&source, dir.path()).unwrap();
        assert_eq!(copy, dir.path().join("BearExportTemp.sqlite"));
        assert_eq!(std::fs::read(copy).unwrap(), b"not really a database");
    }

    #[test]
    fn copying_a_missing_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.sqlite");
        assert!(copy_database(&missing, dir.path()).is_err());
    }
}
