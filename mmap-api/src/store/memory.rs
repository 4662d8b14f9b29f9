//! In-memory student store.

use async_trait::async_trait;

use super::{Student, StoreError, StudentStore};

/// Seeded, read-only roster kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStudentStore {
    rows: Vec<(String, Student)>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a student belonging to `school_id`.
    pub fn with_student(mut self, school_id: impl Into<String>, student: Student) -> Self {
        self.rows.push((school_id.into(), student));
        self
    }

    /// Add several students belonging to `school_id`.
    pub fn with_students<I>(self, school_id: &str, students: I) -> Self
    where
        I: IntoIterator<Item = Student>,
    {
        students
            .into_iter()
            .fold(self, |store, s| store.with_student(school_id, s))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn list_by_school(
        &self,
        school_id: &str,
        limit: usize,
    ) -> Result<Vec<Student>, StoreError> {
        let mut students: Vec<Student> = self
            .rows
            .iter()
            .filter(|(school, _)| school == school_id)
            .map(|(_, s)| s.clone())
            .collect();
        // Ascending by last name with missing names last, as Postgres orders NULLs.
        students.sort_by(|a, b| {
            (a.last_name.is_none(), &a.last_name).cmp(&(b.last_name.is_none(), &b.last_name))
        });
        students.truncate(limit);
        Ok(students)
    }
}
