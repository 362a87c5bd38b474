//! Complaint categories

use crate::store::db::Database;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::Category;
use rusqlite::params;

/// Categories created on first start
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("General", "Anything that fits nowhere else"),
    ("Academic", "Courses, exams, grading and faculty"),
    ("Hostel", "Rooms, mess and residential facilities"),
    ("Infrastructure", "Buildings, network, power and equipment"),
    ("Administration", "Fees, documents and office services"),
    ("Other", "Uncategorized issues"),
];

impl Database {
    /// Categories ordered by name; inactive ones only when asked
    pub fn list_categories(&self, include_inactive: bool) -> StoreResult<Vec<Category>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, name, description, is_active FROM categories
                 WHERE ?1 OR is_active = 1
                 ORDER BY name COLLATE NOCASE",
            )?;
            let categories = stmt
                .query_map(params![include_inactive], |row| {
                    Ok(Category {
                        category_id: row.get(0)?,
                        category_name: row.get(1)?,
                        description: row.get(2)?,
                        is_active: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
    }

    pub fn insert_category(&self, name: &str, description: Option<&str>) -> StoreResult<Category> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO categories (name, description, is_active) VALUES (?1, ?2, 1)",
                params![name.trim(), description],
            )
            .map_err(|e| StoreError::from_insert(e, "category"))?;

            Ok(Category {
                category_id: conn.last_insert_rowid(),
                category_name: name.trim().to_string(),
                description: description.map(str::to_string),
                is_active: true,
            })
        })
    }

    /// Insert any missing default category. Returns how many were added.
    pub fn seed_default_categories(&self) -> StoreResult<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut added = 0;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT OR IGNORE INTO categories (name, description, is_active)
                     VALUES (?1, ?2, 1)",
                )?;
                for (name, description) in DEFAULT_CATEGORIES {
                    added += stmt.execute(params![name, description])?;
                }
            }
            tx.commit()?;
            Ok(added)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.seed_default_categories().unwrap(), DEFAULT_CATEGORIES.len());
        assert_eq!(db.seed_default_categories().unwrap(), 0);
        assert_eq!(db.list_categories(false).unwrap().len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_inactive_categories_hidden() {
        let db = Database::open_in_memory().unwrap();
        let cat = db.insert_category("Transport", Some("Buses")).unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE categories SET is_active = 0 WHERE id = ?1",
                params![cat.category_id],
            )?;
            Ok(())
        })
        .unwrap();

        assert!(db.list_categories(false).unwrap().is_empty());
        assert_eq!(db.list_categories(true).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_category_conflicts() {
        let db = Database::open_in_memory().unwrap();
        db.insert_category("Sports", None).unwrap();
        let err = db.insert_category("sports", None).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
