//! Student directory

use crate::store::db::Database;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{Student, StudentInput};
use rusqlite::{params, OptionalExtension, Row};

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        department: row.get(3)?,
        phone: row.get(4)?,
    })
}

/// Blank phone numbers are stored as NULL
fn phone(input: &StudentInput) -> Option<&str> {
    input
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

impl Database {
    pub fn list_students(&self) -> StoreResult<Vec<Student>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, name, email, department, phone FROM students ORDER BY id",
            )?;
            let students = stmt
                .query_map([], student_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(students)
        })
    }

    pub fn get_student(&self, id: i64) -> StoreResult<Option<Student>> {
        self.with_conn(|conn| {
            let student = conn
                .query_row(
                    "SELECT id, name, email, department, phone FROM students WHERE id = ?1",
                    params![id],
                    student_from_row,
                )
                .optional()?;
            Ok(student)
        })
    }

    /// Insert a student; a taken email gives `Conflict`
    pub fn insert_student(&self, input: &StudentInput) -> StoreResult<Student> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO students (name, email, department, phone) VALUES (?1, ?2, ?3, ?4)",
                params![
                    input.name.trim(),
                    input.email.trim(),
                    input.department.trim(),
                    phone(input)
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "student email"))?;

            Ok(Student {
                id: conn.last_insert_rowid(),
                name: input.name.trim().to_string(),
                email: input.email.trim().to_string(),
                department: input.department.trim().to_string(),
                phone: phone(input).map(str::to_string),
            })
        })
    }

    /// Replace every field of a student
    pub fn update_student(&self, id: i64, input: &StudentInput) -> StoreResult<Student> {
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE students SET name = ?2, email = ?3, department = ?4, phone = ?5
                     WHERE id = ?1",
                    params![
                        id,
                        input.name.trim(),
                        input.email.trim(),
                        input.department.trim(),
                        phone(input)
                    ],
                )
                .map_err(|e| StoreError::from_insert(e, "student email"))?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("student {}", id)));
            }

            Ok(Student {
                id,
                name: input.name.trim().to_string(),
                email: input.email.trim().to_string(),
                department: input.department.trim().to_string(),
                phone: phone(input).map(str::to_string),
            })
        })
    }

    pub fn delete_student(&self, id: i64) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM students WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str) -> StudentInput {
        StudentInput {
            name: name.to_string(),
            email: email.to_string(),
            department: "CSE".to_string(),
            phone: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_student_crud() {
        let db = Database::open_in_memory().unwrap();
        let created = db.insert_student(&input(" Ravi ", "ravi@example.com")).unwrap();
        assert_eq!(created.name, "Ravi");
        assert_eq!(created.phone, None);

        let mut edit = input("Ravi K", "ravi@example.com");
        edit.phone = Some("555-0101".to_string());
        let updated = db.update_student(created.id, &edit).unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0101"));
        assert_eq!(db.get_student(created.id).unwrap(), Some(updated));

        assert_eq!(db.list_students().unwrap().len(), 1);
        assert!(db.delete_student(created.id).unwrap());
        assert!(db.get_student(created.id).unwrap().is_none());
    }

    #[test]
    fn test_student_email_unique() {
        let db = Database::open_in_memory().unwrap();
        db.insert_student(&input("A", "same@example.com")).unwrap();
        let other = db.insert_student(&input("B", "other@example.com")).unwrap();

        let err = db.insert_student(&input("C", "SAME@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = db
            .update_student(other.id, &input("B", "same@example.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_update_missing_student() {
        let db = Database::open_in_memory().unwrap();
        let err = db.update_student(77, &input("A", "a@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
