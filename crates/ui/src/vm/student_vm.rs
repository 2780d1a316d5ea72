use tracker_core::model::{Student, StudentId, Subject};

use crate::vm::time_fmt::format_date;

/// Card on the student picker grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentCardVm {
    pub id: StudentId,
    pub name: String,
    pub avatar: String,
    pub progress_label: String,
    pub subjects_label: String,
}

/// Row in the admin roster list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentAdminRowVm {
    pub id: StudentId,
    pub title: String,
    pub meta_line: String,
    pub progress_line: String,
}

fn subject_names(student: &Student, subjects: &[Subject], with_icon: bool) -> String {
    let names: Vec<String> = student
        .subjects
        .iter()
        .map(|subject_id| {
            subjects
                .iter()
                .find(|subject| &subject.id == subject_id)
                .map_or_else(
                    || subject_id.to_string(),
                    |subject| {
                        if with_icon {
                            format!("{}{}", subject.icon, subject.name)
                        } else {
                            subject.name.clone()
                        }
                    },
                )
        })
        .collect();

    if names.is_empty() {
        "none yet".to_owned()
    } else {
        names.join(", ")
    }
}

/// Convert the roster into picker cards.
#[must_use]
pub fn map_student_cards(students: &[Student], subjects: &[Subject]) -> Vec<StudentCardVm> {
    students
        .iter()
        .map(|student| StudentCardVm {
            id: student.id.clone(),
            name: student.name.clone(),
            avatar: student.avatar.clone(),
            progress_label: format!("Overall: {}%", student.overall_progress.unwrap_or(0)),
            subjects_label: format!("Subjects: {}", subject_names(student, subjects, true)),
        })
        .collect()
}

/// Convert the roster into admin rows.
#[must_use]
pub fn map_student_admin_rows(students: &[Student], subjects: &[Subject]) -> Vec<StudentAdminRowVm> {
    students
        .iter()
        .map(|student| {
            let grade = if student.grade.is_empty() {
                "not set"
            } else {
                &student.grade
            };
            let added = student
                .created_at
                .map_or_else(|| "unknown".to_owned(), format_date);
            StudentAdminRowVm {
                id: student.id.clone(),
                title: format!("{} {}", student.avatar, student.name),
                meta_line: format!(
                    "Grade: {grade} | Subjects: {}",
                    subject_names(student, subjects, false)
                ),
                progress_line: format!(
                    "Progress: {}% | Added: {added}",
                    student.overall_progress.unwrap_or(0)
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::model::SubjectId;

    fn student(subjects: Vec<SubjectId>, progress: Option<u8>) -> Student {
        Student {
            id: StudentId::new("student_001"),
            name: "Mia".to_owned(),
            avatar: "A".to_owned(),
            grade: "Grade 1".to_owned(),
            notes: String::new(),
            subjects,
            created_at: None,
            last_update: None,
            overall_progress: progress,
        }
    }

    fn subject(id: &str, name: &str, icon: &str) -> Subject {
        Subject::new(id, name, icon, "", "").unwrap()
    }

    #[test]
    fn card_joins_known_subjects_with_icons() {
        let subjects = vec![subject("math", "Math", "#"), subject("art", "Art", "~")];
        let cards = map_student_cards(
            &[student(
                vec![SubjectId::new("math"), SubjectId::new("ghost")],
                Some(40),
            )],
            &subjects,
        );

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].progress_label, "Overall: 40%");
        // Unknown ids fall back to the raw id.
        assert_eq!(cards[0].subjects_label, "Subjects: #Math, ghost");
    }

    #[test]
    fn card_without_subjects_or_progress() {
        let cards = map_student_cards(&[student(Vec::new(), None)], &[]);
        assert_eq!(cards[0].progress_label, "Overall: 0%");
        assert_eq!(cards[0].subjects_label, "Subjects: none yet");
    }

    #[test]
    fn admin_row_reports_grade_and_added_date() {
        let mut s = student(vec![SubjectId::new("math")], Some(12));
        s.created_at = Some(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let rows = map_student_admin_rows(&[s], &[subject("math", "Math", "#")]);

        assert_eq!(rows[0].title, "A Mia");
        assert_eq!(rows[0].meta_line, "Grade: Grade 1 | Subjects: Math");
        assert_eq!(rows[0].progress_line, "Progress: 12% | Added: 2024-01-15");
    }
}
