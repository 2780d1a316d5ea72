use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{StudentId, SubjectId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudentError {
    #[error("student name cannot be empty")]
    EmptyName,
}

/// A student as served by the backend.
///
/// `created_at` and `last_update` are stamped by the server; `overall_progress`
/// is the server-cached percentage attached to student reads. The client
/// recomputes the live value from progress data when it has it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub subjects: Vec<SubjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_progress: Option<u8>,
}

impl Student {
    /// Returns true when the student is enrolled in the subject.
    #[must_use]
    pub fn is_enrolled(&self, subject_id: &SubjectId) -> bool {
        self.subjects.contains(subject_id)
    }
}

/// Validated payload for creating or replacing a student.
///
/// The server assigns ids and timestamps; the draft carries everything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    name: String,
    avatar: String,
    grade: String,
    notes: String,
    subjects: Vec<SubjectId>,
}

pub const DEFAULT_AVATAR: &str = "\u{1F466}";
pub const DEFAULT_GRADE: &str = "Grade 1";

impl StudentDraft {
    /// Creates a draft, trimming fields and applying form defaults.
    ///
    /// # Errors
    ///
    /// Returns `StudentError::EmptyName` if the name is empty or
    /// whitespace-only.
    pub fn new(
        name: impl Into<String>,
        avatar: impl Into<String>,
        grade: impl Into<String>,
        notes: impl Into<String>,
        subjects: Vec<SubjectId>,
    ) -> Result<Self, StudentError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StudentError::EmptyName);
        }

        let avatar = avatar.into().trim().to_owned();
        let grade = grade.into().trim().to_owned();

        Ok(Self {
            name: name.trim().to_owned(),
            avatar: if avatar.is_empty() {
                DEFAULT_AVATAR.to_owned()
            } else {
                avatar
            },
            grade: if grade.is_empty() {
                DEFAULT_GRADE.to_owned()
            } else {
                grade
            },
            notes: notes.into().trim().to_owned(),
            subjects,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    #[must_use]
    pub fn grade(&self) -> &str {
        &self.grade
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }
}
