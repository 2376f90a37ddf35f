//! Table definitions

use rusqlite::Connection;

use crate::error::Result;

/// Name of the users table
pub const USER_TABLE: &str = "user";
/// Name of the notes table
pub const NOTE_TABLE: &str = "note";

const STATEMENTS: [&str; 2] = [
    r#"CREATE TABLE IF NOT EXISTS "user" (
        "id" INTEGER NOT NULL,
        "email" TEXT NOT NULL UNIQUE,
        PRIMARY KEY("id" AUTOINCREMENT)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "note" (
        "id" INTEGER NOT NULL,
        "user_id" INTEGER NOT NULL,
        "text" TEXT,
        "is_sync_with_cloud" INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY("user_id") REFERENCES "user"("id"),
        PRIMARY KEY("id" AUTOINCREMENT)
    )"#,
];

/// Create both tables if they are missing.
///
/// Existing files with this layout are used untouched.
pub fn ensure(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for stmt in STATEMENTS {
        tx.execute(stmt, [])?;
    }
    tx.commit()?;

    tracing::info!("Ensured tables `{USER_TABLE}` and `{NOTE_TABLE}`");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("SELECT name FROM pragma_table_info('{table}') ORDER BY cid"))
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn test_creates_tables_with_expected_columns() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();

        assert_eq!(table_columns(&conn, USER_TABLE), vec!["id", "email"]);
        assert_eq!(
            table_columns(&conn, NOTE_TABLE),
            vec!["id", "user_id", "text", "is_sync_with_cloud"]
        );
    }

    #[test]
    fn test_ensure_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        conn.execute("INSERT INTO user (email) VALUES ('a@x.com')", [])
            .unwrap();
        ensure(&conn).unwrap();

        let users: i64 = conn
            .query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))
            .unwrap();
        assert_eq!(users, 1);
    }

    #[test]
    fn test_sync_flag_defaults_to_false() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        conn.execute("INSERT INTO user (email) VALUES ('a@x.com')", [])
            .unwrap();
        conn.execute("INSERT INTO note (user_id, text) VALUES (1, 'x')", [])
            .unwrap();

        let flag: i64 = conn
            .query_row("SELECT is_sync_with_cloud FROM note", [], |row| row.get(0))
            .unwrap();
        assert_eq!(flag, 0);
    }
}
