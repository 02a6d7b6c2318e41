use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub name: String,
    pub active: bool,
}

/// Latest recorded grade for a (student, subject) pair, or one step of a
/// student's edit history. `grade` 0 with no date is the "never graded"
/// sentinel; recorded grades are always 2..=5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeRecord {
    pub date: Option<NaiveDate>,
    pub grade: u8,
}

pub const GRADE_MIN: u8 = 2;
pub const GRADE_MAX: u8 = 5;

/// In-memory gradebook: ordered roster and subject list, latest grade per
/// (student, subject) pair, and an append-only per-student history with one
/// entry per edit regardless of subject.
///
/// Names are the keys. Removing or renaming a student or subject leaves any
/// existing grade/history entries under the old name; they are invisible to
/// the grid and dropped at the next save, while history keeps the audit
/// trail as it was entered.
#[derive(Debug, Default)]
pub struct GradeStore {
    pub(crate) students: Vec<Student>,
    pub(crate) subjects: Vec<String>,
    pub(crate) grades: HashMap<(String, String), GradeRecord>,
    pub(crate) history: HashMap<String, Vec<GradeRecord>>,
    sort_ascending: bool,
}

fn clean_name(raw: &str, what: &str) -> Result<String, StoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidArgument(format!(
            "{what} name must not be empty"
        )));
    }
    Ok(name.to_string())
}

impl GradeStore {
    pub fn new() -> Self {
        Self {
            sort_ascending: true,
            ..Self::default()
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn add_student(&mut self, name: &str) -> Result<(), StoreError> {
        let name = clean_name(name, "student")?;
        // Duplicates are allowed; the roster is an ordered list, not a set.
        self.students.push(Student { name, active: true });
        Ok(())
    }

    pub fn remove_student(&mut self, name: &str) -> Result<(), StoreError> {
        let pos = self
            .students
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| StoreError::NotFound(format!("student not found: {name}")))?;
        self.students.remove(pos);
        Ok(())
    }

    pub fn rename_student(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        let new = clean_name(new, "student")?;
        let student = self
            .students
            .iter_mut()
            .find(|s| s.name == old)
            .ok_or_else(|| StoreError::NotFound(format!("student not found: {old}")))?;
        student.name = new;
        Ok(())
    }

    pub fn set_active(&mut self, name: &str, active: bool) -> Result<(), StoreError> {
        let student = self
            .students
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| StoreError::NotFound(format!("student not found: {name}")))?;
        student.active = active;
        Ok(())
    }

    pub fn add_subject(&mut self, name: &str) -> Result<(), StoreError> {
        let name = clean_name(name, "subject")?;
        self.subjects.push(name);
        Ok(())
    }

    pub fn remove_subject(&mut self, name: &str) -> Result<(), StoreError> {
        let pos = self
            .subjects
            .iter()
            .position(|s| s == name)
            .ok_or_else(|| StoreError::NotFound(format!("subject not found: {name}")))?;
        self.subjects.remove(pos);
        Ok(())
    }

    pub fn rename_subject(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        let new = clean_name(new, "subject")?;
        let subject = self
            .subjects
            .iter_mut()
            .find(|s| *s == old)
            .ok_or_else(|| StoreError::NotFound(format!("subject not found: {old}")))?;
        *subject = new;
        Ok(())
    }

    /// Overwrites the latest grade for the pair and appends the edit to the
    /// student's history. History never shrinks.
    pub fn record_grade(
        &mut self,
        student: &str,
        subject: &str,
        grade: u8,
        date: NaiveDate,
    ) -> Result<(), StoreError> {
        if !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
            return Err(StoreError::InvalidArgument(format!(
                "grade must be in {GRADE_MIN}..={GRADE_MAX}, got {grade}"
            )));
        }
        let record = GradeRecord {
            date: Some(date),
            grade,
        };
        self.grades
            .insert((student.to_string(), subject.to_string()), record);
        self.history
            .entry(student.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    /// Latest grade for the pair, or the ungraded sentinel. Never fails.
    pub fn grade_of(&self, student: &str, subject: &str) -> GradeRecord {
        self.grades
            .get(&(student.to_string(), subject.to_string()))
            .copied()
            .unwrap_or_default()
    }

    pub fn history_of(&self, student: &str) -> &[GradeRecord] {
        self.history.get(student).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Stable sort of the roster by the latest grade in `subject` (missing
    /// grades sort as 0), in the stored direction. The direction flips after
    /// every call; returns whether this call sorted ascending.
    pub fn sort_students_by_grade(&mut self, subject: &str) -> bool {
        let applied = self.sort_ascending;
        let grades = &self.grades;
        let grade_key =
            |s: &Student| grades.get(&(s.name.clone(), subject.to_string())).map_or(0, |r| r.grade);
        if applied {
            self.students.sort_by_cached_key(grade_key);
        } else {
            self.students
                .sort_by_cached_key(|s| std::cmp::Reverse(grade_key(s)));
        }
        self.sort_ascending = !applied;
        applied
    }

    /// Drops everything, including history and the pending sort direction.
    /// Used by the loader before replaying a document.
    pub fn clear(&mut self) {
        self.students.clear();
        self.subjects.clear();
        self.grades.clear();
        self.history.clear();
        self.sort_ascending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn record_then_read_back() {
        let mut store = GradeStore::new();
        store.add_student("Alice").unwrap();
        store.add_student("Bob").unwrap();
        store.add_subject("Math").unwrap();

        store.record_grade("Alice", "Math", 5, date(2024, 1, 10)).unwrap();

        let rec = store.grade_of("Alice", "Math");
        assert_eq!(rec.grade, 5);
        assert_eq!(rec.date, Some(date(2024, 1, 10)));

        let missing = store.grade_of("Bob", "Math");
        assert_eq!(missing.grade, 0);
        assert_eq!(missing.date, None);

        assert_eq!(store.history_of("Alice").len(), 1);
        assert!(store.history_of("Bob").is_empty());
    }

    #[test]
    fn overwrite_keeps_history_growing() {
        let mut store = GradeStore::new();
        store.add_student("Alice").unwrap();
        store.add_subject("Math").unwrap();

        store.record_grade("Alice", "Math", 3, date(2024, 1, 10)).unwrap();
        store.record_grade("Alice", "Math", 5, date(2024, 2, 1)).unwrap();

        assert_eq!(store.grade_of("Alice", "Math").grade, 5);
        let history = store.history_of("Alice");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].grade, 3);
        assert_eq!(history[1].grade, 5);
    }

    #[test]
    fn grade_range_is_enforced() {
        let mut store = GradeStore::new();
        assert!(matches!(
            store.record_grade("Alice", "Math", 1, date(2024, 1, 10)),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.record_grade("Alice", "Math", 6, date(2024, 1, 10)),
            Err(StoreError::InvalidArgument(_))
        ));
        assert_eq!(store.grade_of("Alice", "Math").grade, 0);
        assert!(store.history_of("Alice").is_empty());
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut store = GradeStore::new();
        assert!(matches!(
            store.add_student("   "),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.add_subject(""),
            Err(StoreError::InvalidArgument(_))
        ));
        store.add_student("Alice").unwrap();
        assert!(matches!(
            store.rename_student("Alice", " "),
            Err(StoreError::InvalidArgument(_))
        ));
        assert_eq!(store.students()[0].name, "Alice");
    }

    #[test]
    fn missing_names_are_not_found() {
        let mut store = GradeStore::new();
        assert!(matches!(
            store.remove_student("Nobody"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.rename_subject("Nothing", "Something"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.set_active("Nobody", false),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn rename_leaves_old_keys_in_place() {
        let mut store = GradeStore::new();
        store.add_student("Alice").unwrap();
        store.add_subject("Math").unwrap();
        store.record_grade("Alice", "Math", 4, date(2024, 3, 1)).unwrap();

        store.rename_student("Alice", "Alicia").unwrap();

        assert_eq!(store.students()[0].name, "Alicia");
        assert_eq!(store.grade_of("Alicia", "Math").grade, 0);
        assert_eq!(store.grade_of("Alice", "Math").grade, 4);
        assert!(store.history_of("Alicia").is_empty());
        assert_eq!(store.history_of("Alice").len(), 1);
    }

    #[test]
    fn remove_keeps_history() {
        let mut store = GradeStore::new();
        store.add_student("Alice").unwrap();
        store.add_subject("Math").unwrap();
        store.record_grade("Alice", "Math", 2, date(2024, 3, 1)).unwrap();

        store.remove_student("Alice").unwrap();

        assert!(store.students().is_empty());
        assert_eq!(store.history_of("Alice").len(), 1);
        assert_eq!(store.grade_of("Alice", "Math").grade, 2);
    }

    #[test]
    fn sort_toggles_direction_and_is_stable() {
        let mut store = GradeStore::new();
        for name in ["Ann", "Ben", "Cay", "Dee"] {
            store.add_student(name).unwrap();
        }
        store.add_subject("Math").unwrap();
        store.record_grade("Ann", "Math", 5, date(2024, 1, 1)).unwrap();
        store.record_grade("Ben", "Math", 3, date(2024, 1, 1)).unwrap();
        store.record_grade("Cay", "Math", 3, date(2024, 1, 1)).unwrap();
        // Dee stays ungraded and sorts as 0.

        let ascending = store.sort_students_by_grade("Math");
        assert!(ascending);
        let names: Vec<&str> = store.students().iter().map(|s| s.name.as_str()).collect();
        // Ben before Cay: equal grades keep roster order.
        assert_eq!(names, ["Dee", "Ben", "Cay", "Ann"]);

        let ascending = store.sort_students_by_grade("Math");
        assert!(!ascending);
        let names: Vec<&str> = store.students().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Ann", "Ben", "Cay", "Dee"]);
    }

    #[test]
    fn active_flag_does_not_gate_grading() {
        let mut store = GradeStore::new();
        store.add_student("Alice").unwrap();
        store.add_subject("Math").unwrap();
        store.set_active("Alice", false).unwrap();
        assert!(!store.students()[0].active);

        store.record_grade("Alice", "Math", 4, date(2024, 5, 5)).unwrap();
        assert_eq!(store.grade_of("Alice", "Math").grade, 4);
    }
}
