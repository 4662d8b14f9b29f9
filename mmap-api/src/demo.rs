//! Built-in demo roster and assessment planning.
//!
//! The demo roster backs `/v1/students` and the assessment plan endpoint, and
//! seeds the in-memory store when no database is configured.

use serde::Serialize;

use crate::store::{MemoryStudentStore, Student};

/// School id the demo roster is filed under in the in-memory store.
pub const DEMO_SCHOOL_ID: &str = "demo";

/// The fixed four-student demo roster.
pub fn demo_students() -> Vec<Student> {
    [
        ("stu-001", "Artemisia", "Richardson-Hatcher", "primary-a", "2015-09-22"),
        ("stu-002", "Macatee", "Richardson-Hatcher", "primary-a", "2020-06-17"),
        ("stu-003", "Jamal", "Ortiz", "lower-el-1", "2014-02-08"),
        ("stu-004", "Sofia", "Nguyen", "lower-el-1", "2013-11-30"),
    ]
    .into_iter()
    .map(|(id, first, last, classroom, dob)| Student {
        id: id.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        classroom_id: Some(classroom.to_string()),
        dob: Some(dob.to_string()),
    })
    .collect()
}

/// In-memory store holding the demo roster under [`DEMO_SCHOOL_ID`].
pub fn demo_store() -> MemoryStudentStore {
    MemoryStudentStore::new().with_students(DEMO_SCHOOL_ID, demo_students())
}

/// A skill to work on, with lessons that target it.
#[derive(Debug, Clone, Serialize)]
pub struct Goal {
    pub skill: &'static str,
    pub suggested_lessons: Vec<&'static str>,
}

/// A short-window assessment plan for one student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPlan {
    pub student_id: String,
    pub window_weeks: u32,
    pub focus: &'static str,
    pub goals: Vec<Goal>,
}

/// Build the literacy plan for `student_id`, or `None` if the student is not
/// on the demo roster.
pub fn assessment_plan(student_id: &str) -> Option<AssessmentPlan> {
    demo_students().iter().find(|s| s.id == student_id)?;

    Some(AssessmentPlan {
        student_id: student_id.to_string(),
        window_weeks: 6,
        focus: "literacy",
        goals: vec![
            Goal {
                skill: "phonemic awareness",
                suggested_lessons: vec!["Sound Sorting", "Phonogram 3-Part Cards"],
            },
            Goal {
                skill: "decoding (CVC)",
                suggested_lessons: vec!["Pink Box 1", "Moveable Alphabet — CVC"],
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_for_known_student() {
        let plan = assessment_plan("stu-003").unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["studentId"], "stu-003");
        assert_eq!(json["windowWeeks"], 6);
        assert_eq!(json["focus"], "literacy");
        assert_eq!(json["goals"][1]["skill"], "decoding (CVC)");
        assert_eq!(json["goals"][0]["suggested_lessons"][0], "Sound Sorting");
    }

    #[test]
    fn test_plan_for_unknown_student() {
        assert!(assessment_plan("stu-999").is_none());
    }

    #[test]
    fn test_demo_store_is_seeded() {
        assert_eq!(demo_store().len(), 4);
    }
}
