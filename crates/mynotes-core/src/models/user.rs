//! User model

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::row::{DecodeError, RawRow};

pub(crate) const ID_COLUMN: &str = "id";
pub(crate) const EMAIL_COLUMN: &str = "email";

/// A locally known account, keyed by its normalised email.
///
/// Two users are the same user when their ids match, whatever their emails say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: i64,
    email: String,
}

impl User {
    /// Decode a row of the `user` table
    pub fn from_row(row: &RawRow) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.integer(ID_COLUMN)?,
            email: row.text(EMAIL_COLUMN)?,
        })
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Canonical form used for storing and comparing emails
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(id: i64, email: &str) -> RawRow {
        RawRow::new()
            .with(ID_COLUMN, id)
            .with(EMAIL_COLUMN, email.to_string())
    }

    #[test]
    fn test_from_row() {
        let user = User::from_row(&row(4, "a@x.com")).unwrap();
        assert_eq!(user.id(), 4);
        assert_eq!(user.email(), "a@x.com");
    }

    #[test]
    fn test_equality_is_by_id_only() {
        let a = User::from_row(&row(1, "a@x.com")).unwrap();
        let renamed = User::from_row(&row(1, "b@x.com")).unwrap();
        let other = User::from_row(&row(2, "a@x.com")).unwrap();
        assert_eq!(a, renamed);
        assert_ne!(a, other);
    }

    #[test]
    fn test_from_row_requires_email() {
        let result = User::from_row(&RawRow::new().with(ID_COLUMN, 1_i64));
        assert_eq!(
            result.unwrap_err(),
            DecodeError::MissingColumn("email".to_string())
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }
}
