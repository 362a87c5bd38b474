//! User accounts

use crate::store::db::Database;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{Role, User};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

/// A user together with the stored password hash
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

const USER_COLUMNS: &str = "id, name, email, role";

pub(crate) fn user_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        email: row.get(offset + 2)?,
        role: row.get(offset + 3)?,
    })
}

/// Same as `user_from_row` but for LEFT JOIN columns that may be NULL
pub(crate) fn optional_user_from_row(
    row: &Row<'_>,
    offset: usize,
) -> rusqlite::Result<Option<User>> {
    match row.get::<_, Option<i64>>(offset)? {
        Some(_) => user_from_row(row, offset).map(Some),
        None => Ok(None),
    }
}

impl Database {
    /// Insert a new account. Duplicate emails (any case) give `Conflict`.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> StoreResult<User> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (name, email, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name, email, password_hash, role, now.timestamp_millis()],
            )
            .map_err(|e| StoreError::from_insert(e, "user"))?;

            Ok(User {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                email: email.to_string(),
                role,
            })
        })
    }

    /// Case-insensitive lookup, including the password hash
    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        self.with_conn(|conn| {
            let found = conn
                .query_row(
                    &format!(
                        "SELECT {}, password_hash FROM users WHERE email = ?1",
                        USER_COLUMNS
                    ),
                    params![email.trim()],
                    |row| {
                        Ok(StoredUser {
                            user: user_from_row(row, 0)?,
                            password_hash: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            Ok(found)
        })
    }

    pub fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                    params![id],
                    |row| user_from_row(row, 0),
                )
                .optional()?;
            Ok(user)
        })
    }

    /// All accounts ordered by name
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {} FROM users ORDER BY name COLLATE NOCASE, id",
                USER_COLUMNS
            ))?;
            let users = stmt
                .query_map([], |row| user_from_row(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        })
    }

    /// Number of staff accounts (ADMIN and SENIOR_ADMIN)
    pub fn count_admins(&self) -> StoreResult<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE role IN ('ADMIN', 'SENIOR_ADMIN')",
                [],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find_user() {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user("Asha", "asha@example.com", "salt$hash", Role::User, Utc::now())
            .unwrap();
        assert!(user.id > 0);

        let stored = db.find_user_by_email("ASHA@example.com").unwrap().unwrap();
        assert_eq!(stored.user, user);
        assert_eq!(stored.password_hash, "salt$hash");

        assert_eq!(db.get_user(user.id).unwrap(), Some(user));
        assert!(db.get_user(999).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("A", "dup@example.com", "h", Role::User, Utc::now())
            .unwrap();
        let err = db
            .create_user("B", "Dup@Example.com", "h", Role::Admin, Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_list_users_and_count_admins() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        db.create_user("Zed", "z@example.com", "h", Role::User, now).unwrap();
        db.create_user("amy", "a@example.com", "h", Role::Admin, now).unwrap();
        db.create_user("Bo", "b@example.com", "h", Role::SeniorAdmin, now)
            .unwrap();

        let names: Vec<_> = db
            .list_users()
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["amy", "Bo", "Zed"]);
        assert_eq!(db.count_admins().unwrap(), 2);
    }
}
