//! Login and role checks
//!
//! Credentials are compared as stored plaintext. A [`Session`] can only be
//! obtained through [`Database::login`], and every write in the record store
//! asks the session for permission, so the role check cannot be skipped by
//! calling the store directly.

use rusqlite::{ErrorCode, OptionalExtension};
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::parser::{check_value, SqlValue};
use crate::schema::USERS;
use crate::store::schema_gen::generate_insert;
use crate::store::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Map a stored role string; anything other than `admin` is read-only
    pub fn from_stored(s: &str) -> Self {
        if s == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn can_write(self) -> bool {
        self == Role::Admin
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(StoreError::validation("role", format!("'{}' is not admin or user", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
}

/// An authenticated user
#[derive(Debug, Clone)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub(crate) fn require_write(&self, action: impl Into<String>) -> Result<()> {
        if self.role().can_write() {
            return Ok(());
        }
        let action = action.into();
        tracing::warn!(user = %self.user.username, %action, "write rejected for read-only role");
        Err(StoreError::Forbidden { action })
    }
}

impl Database {
    /// Exact, case-sensitive credential match
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, username, password, role FROM users WHERE username = ?1 AND password = ?2",
                [username, password],
                |row| {
                    let role: String = row.get(3)?;
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password: row.get(2)?,
                        role: Role::from_stored(&role),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Authenticate and open a session; `None` on bad credentials
    pub fn login(&self, username: &str, password: &str) -> Result<Option<Session>> {
        match self.authenticate(username, password)? {
            Some(user) => {
                tracing::info!(user = %user.username, role = %user.role, "login");
                Ok(Some(Session { user }))
            }
            None => {
                tracing::warn!(user = %username, "login rejected");
                Ok(None)
            }
        }
    }

    /// Create a login; requires an admin session
    pub fn add_user(&self, session: &Session, username: &str, password: &str, role: Role) -> Result<i64> {
        session.require_write("add user")?;

        let values = [
            SqlValue::from(username),
            SqlValue::from(password),
            SqlValue::from(role.as_str()),
        ];
        let checked = USERS
            .columns
            .iter()
            .zip(values)
            .map(|(col, value)| check_value(col, value))
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = self.conn().prepare_cached(&generate_insert(&USERS))?;
        for (idx, value) in checked.iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        match stmt.raw_execute() {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(StoreError::validation("username", format!("'{}' already exists", username)));
            }
            Err(e) => return Err(e.into()),
        }

        let id = self.conn().last_insert_rowid();
        tracing::info!(user = %username, %role, by = %session.user().username, "added user");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_credentials() {
        let (db, _) = Database::open_in_memory().unwrap();

        let admin = db.authenticate("admin", "admin").unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(db.authenticate("admin", "wrong").unwrap().is_none());
        assert!(db.authenticate("Admin", "admin").unwrap().is_none());

        let user = db.login("user", "user").unwrap().unwrap();
        assert_eq!(user.role(), Role::User);
    }

    #[test]
    fn test_read_only_session_cannot_write() {
        let (db, _) = Database::open_in_memory().unwrap();
        let session = db.login("user", "user").unwrap().unwrap();

        let err = db.delete(&session, "dishes", 1).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden { .. }));
        assert_eq!(db.count("dishes").unwrap(), 20);

        let err = db.add_user(&session, "guest", "guest", Role::User).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden { .. }));
    }

    #[test]
    fn test_add_user() {
        let (db, _) = Database::open_in_memory().unwrap();
        let admin = db.login("admin", "admin").unwrap().unwrap();

        db.add_user(&admin, "chef", "s3cret", Role::User).unwrap();
        let chef = db.login("chef", "s3cret").unwrap().unwrap();
        assert_eq!(chef.role(), Role::User);

        let dup = db.add_user(&admin, "chef", "other", Role::Admin).unwrap_err();
        assert!(matches!(dup, StoreError::Validation { ref field, .. } if field == "username"));

        let empty = db.add_user(&admin, "", "x", Role::User).unwrap_err();
        assert!(matches!(empty, StoreError::Validation { .. }));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::from_stored("manager"), Role::User);
    }
}
