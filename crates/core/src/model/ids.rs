use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a Student.
///
/// Identifiers are opaque strings assigned by the server (`student_...`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

/// Unique identifier for a Subject.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

/// Unique identifier for a Level within a subject.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(String);

/// Unique identifier for a Chapter within a level.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(String);

/// Unique identifier for a Task within a chapter.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Creates an id from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true when the id is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(StudentId);
string_id!(SubjectId);
string_id!(LevelId);
string_id!(ChapterId);
string_id!(TaskId);

impl ChapterId {
    /// Mints a fresh chapter id for client-created chapters.
    #[must_use]
    pub fn mint() -> Self {
        Self(format!("chapter_{}", Uuid::new_v4().simple()))
    }
}

impl TaskId {
    /// Mints a fresh task id for client-created tasks.
    #[must_use]
    pub fn mint() -> Self {
        Self(format!("task_{}", Uuid::new_v4().simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_id_display() {
        let id = StudentId::new("student_001");
        assert_eq!(id.to_string(), "student_001");
        assert_eq!(id.as_str(), "student_001");
    }

    #[test]
    fn subject_id_from_str() {
        let id: SubjectId = "math".into();
        assert_eq!(id, SubjectId::new("math"));
    }

    #[test]
    fn task_id_debug_includes_type() {
        let id = TaskId::new("task_001");
        assert_eq!(format!("{id:?}"), "TaskId(task_001)");
    }

    #[test]
    fn minted_ids_are_unique_and_prefixed() {
        let a = TaskId::mint();
        let b = TaskId::mint();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("task_"));

        let c = ChapterId::mint();
        assert!(c.as_str().starts_with("chapter_"));
    }

    #[test]
    fn empty_id_is_detected() {
        assert!(LevelId::new("").is_empty());
        assert!(!LevelId::new("grade_1").is_empty());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = SubjectId::new("math");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"math\"");
        let back: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
