use crate::store::{GradeRecord, GradeStore, Student};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Fixed name of the persisted document, relative to the workspace.
pub const GRADES_FILE: &str = "grades.json";

const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unparseable date: {0:?}")]
    Format(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed grades document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradesDoc {
    pub students: Vec<StudentDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentDoc {
    pub name: String,
    pub grades: Vec<GradeDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeDoc {
    pub subject: String,
    pub date: String,
    pub grade: u8,
}

/// Renders a record date in the document's `dd.MM.yyyy` format; the no-date
/// sentinel renders as the empty string.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Parses a document date. The empty string is the no-date sentinel (that is
/// what never-graded pairs serialize as); anything else must match
/// `dd.MM.yyyy` exactly.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, CodecError> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| CodecError::Format(raw.to_string()))
}

/// Builds the document from the live store: one entry per roster student in
/// roster order, one grade per **current** subject, sentinels included.
/// Grades keyed under removed subjects or removed/renamed students are not
/// visited and therefore drop out of the saved document.
pub fn serialize(store: &GradeStore) -> GradesDoc {
    let students = store
        .students()
        .iter()
        .map(|student| StudentDoc {
            name: student.name.clone(),
            grades: store
                .subjects()
                .iter()
                .map(|subject| {
                    let rec = store.grade_of(&student.name, subject);
                    GradeDoc {
                        subject: subject.clone(),
                        date: format_date(rec.date),
                        grade: rec.grade,
                    }
                })
                .collect(),
        })
        .collect();
    GradesDoc { students }
}

/// Replaces the store's entire contents with the document: subjects are the
/// de-duplicated union of all subject fields in first-seen order, and every
/// document entry replays as one grade-table write plus one history append,
/// in document order.
///
/// The document is fully parsed before the store is touched, so a bad date
/// aborts the whole load and leaves the previous state intact.
pub fn apply(doc: &GradesDoc, store: &mut GradeStore) -> Result<(), CodecError> {
    let mut parsed: Vec<(String, Vec<(String, GradeRecord)>)> =
        Vec::with_capacity(doc.students.len());
    for student in &doc.students {
        let mut grades = Vec::with_capacity(student.grades.len());
        for entry in &student.grades {
            let record = GradeRecord {
                date: parse_date(&entry.date)?,
                // Range checking happens at the editing boundary; the
                // document is taken as written.
                grade: entry.grade,
            };
            grades.push((entry.subject.clone(), record));
        }
        parsed.push((student.name.clone(), grades));
    }

    store.clear();
    for (name, grades) in parsed {
        store.students.push(Student {
            name: name.clone(),
            active: true,
        });
        for (subject, record) in grades {
            if !store.subjects.contains(&subject) {
                store.subjects.push(subject.clone());
            }
            store.grades.insert((name.clone(), subject), record);
            store.history.entry(name.clone()).or_default().push(record);
        }
    }
    Ok(())
}

pub fn save_to(path: &Path, store: &GradeStore) -> Result<(), CodecError> {
    let data = serde_json::to_vec_pretty(&serialize(store))?;
    fs::write(path, data)?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// First run: the file was absent, so an empty one was created and the
    /// in-memory state was left untouched.
    CreatedEmpty,
}

pub fn load_from(path: &Path, store: &mut GradeStore) -> Result<LoadOutcome, CodecError> {
    if !path.exists() {
        fs::File::create(path)?;
        return Ok(LoadOutcome::CreatedEmpty);
    }
    let data = fs::read_to_string(path)?;
    let doc: GradesDoc = serde_json::from_str(&data)?;
    apply(&doc, store)?;
    Ok(LoadOutcome::Loaded)
}
