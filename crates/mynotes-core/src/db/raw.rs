//! Raw table access: rows in and out as [`RawRow`] mappings.

use std::fmt;

use rusqlite::params_from_iter;
use rusqlite::types::Value;

use super::connection::LocalStore;
use super::schema::{NOTE_TABLE, USER_TABLE};
use crate::error::{Error, Result};
use crate::models::RawRow;

/// The two tables of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    User,
    Note,
}

impl Table {
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => USER_TABLE,
            Self::Note => NOTE_TABLE,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-column equality filter (`WHERE column = value`)
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    column: &'static str,
    value: Value,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    fn clause(&self) -> String {
        format!(" WHERE \"{}\" = ?", self.column)
    }
}

impl LocalStore {
    /// Select whole rows, optionally filtered, in id order
    pub fn query(&self, table: Table, filter: Option<&Filter>) -> Result<Vec<RawRow>> {
        let conn = self.connection()?;
        let mut sql = format!("SELECT * FROM \"{table}\"");
        if let Some(filter) = filter {
            sql.push_str(&filter.clause());
        }
        sql.push_str(" ORDER BY \"id\"");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(filter.map(|f| &f.value)), RawRow::from_sqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Insert one row and return its new id
    pub fn insert(&self, table: Table, values: &RawRow) -> Result<i64> {
        if values.is_empty() {
            return Err(Error::Database(format!("empty insert into {table}")));
        }

        let conn = self.connection()?;
        let columns = values
            .columns()
            .map(|column| format!("\"{column}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; values.len()].join(", ");
        let sql = format!("INSERT INTO \"{table}\" ({columns}) VALUES ({placeholders})");

        conn.execute(&sql, params_from_iter(values.values()))?;
        Ok(conn.last_insert_rowid())
    }

    /// Overwrite the given columns on matching rows; returns the affected count
    pub fn update(&self, table: Table, values: &RawRow, filter: &Filter) -> Result<usize> {
        if values.is_empty() {
            return Err(Error::Database(format!("empty update of {table}")));
        }

        let conn = self.connection()?;
        let assignments = values
            .columns()
            .map(|column| format!("\"{column}\" = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE \"{table}\" SET {assignments}{}", filter.clause());

        let params = values.values().chain(std::iter::once(&filter.value));
        Ok(conn.execute(&sql, params_from_iter(params))?)
    }

    /// Delete matching rows (all rows without a filter); returns the affected count
    pub fn delete(&self, table: Table, filter: Option<&Filter>) -> Result<usize> {
        let conn = self.connection()?;
        let mut sql = format!("DELETE FROM \"{table}\"");
        if let Some(filter) = filter {
            sql.push_str(&filter.clause());
        }
        Ok(conn.execute(&sql, params_from_iter(filter.map(|f| &f.value)))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use pretty_assertions::assert_eq;

    fn setup() -> LocalStore {
        let mut store = LocalStore::new(StoreConfig::in_memory());
        store.open().unwrap();
        store
    }

    #[test]
    fn test_insert_returns_new_ids() {
        let store = setup();
        let first = store
            .insert(Table::User, &RawRow::new().with("email", "a@x.com".to_string()))
            .unwrap();
        let second = store
            .insert(Table::User, &RawRow::new().with("email", "b@x.com".to_string()))
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_query_with_filter() {
        let store = setup();
        store
            .insert(Table::User, &RawRow::new().with("email", "a@x.com".to_string()))
            .unwrap();
        store
            .insert(Table::User, &RawRow::new().with("email", "b@x.com".to_string()))
            .unwrap();

        let all = store.query(Table::User, None).unwrap();
        assert_eq!(all.len(), 2);

        let filter = Filter::eq("email", "b@x.com".to_string());
        let rows = store.query(Table::User, Some(&filter)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_update_and_delete_counts() {
        let store = setup();
        let user_id = store
            .insert(Table::User, &RawRow::new().with("email", "a@x.com".to_string()))
            .unwrap();
        let note_id = store
            .insert(
                Table::Note,
                &RawRow::new()
                    .with("user_id", user_id)
                    .with("text", String::new()),
            )
            .unwrap();

        let changed = store
            .update(
                Table::Note,
                &RawRow::new().with("text", "hi".to_string()),
                &Filter::eq("id", note_id),
            )
            .unwrap();
        assert_eq!(changed, 1);

        let missing = store
            .update(
                Table::Note,
                &RawRow::new().with("text", "hi".to_string()),
                &Filter::eq("id", 99_i64),
            )
            .unwrap();
        assert_eq!(missing, 0);

        assert_eq!(store.delete(Table::Note, None).unwrap(), 1);
        assert_eq!(store.delete(Table::Note, None).unwrap(), 0);
    }

    #[test]
    fn test_note_requires_existing_user() {
        let store = setup();
        let result = store.insert(
            Table::Note,
            &RawRow::new()
                .with("user_id", 42_i64)
                .with("text", String::new()),
        );
        assert!(matches!(result, Err(Error::Sqlite(_))));
    }

    #[test]
    fn test_closed_store_is_not_open() {
        let store = LocalStore::new(StoreConfig::in_memory());
        assert!(matches!(
            store.query(Table::Note, None),
            Err(Error::NotOpen)
        ));
    }
}
