use chrono::{DateTime, Utc};
use tracker_core::model::{StudentProgress, Subject, TaskStatus};

/// One line in the dashboard's recent-activity list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityVm {
    pub icon: &'static str,
    pub title: String,
    pub detail: String,
    pub at: Option<DateTime<Utc>>,
}

/// Collects every task the student has touched, newest first, truncated to
/// `limit` entries.
#[must_use]
pub fn map_recent_activities(
    subjects: &[Subject],
    progress: &StudentProgress,
    limit: usize,
) -> Vec<ActivityVm> {
    let mut activities: Vec<ActivityVm> = Vec::new();

    for (subject_id, subject_progress) in &progress.subjects {
        let Some(subject) = subjects.iter().find(|subject| &subject.id == subject_id) else {
            continue;
        };
        for task in subject.tasks() {
            let Some(entry) = subject_progress.task(&task.id) else {
                continue;
            };
            let (icon, detail) = match entry.status {
                TaskStatus::Completed => ("\u{2705}", "Completed".to_owned()),
                TaskStatus::InProgress => (
                    "\u{1F504}",
                    format!("In progress (step {})", entry.current_step + 1),
                ),
                TaskStatus::Pending => ("\u{23F3}", "Not started".to_owned()),
            };
            activities.push(ActivityVm {
                icon,
                title: format!("{} - {}", subject.name, task.name),
                detail,
                at: entry.last_activity(),
            });
        }
    }

    activities.sort_by(|a, b| b.at.cmp(&a.at));
    activities.truncate(limit);
    activities
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::model::{
        Chapter, ChapterId, Level, LevelId, StudentId, SubjectId, Task, TaskId, TaskKind,
    };
    use tracker_core::steps::{complete_step, start_task};
    use tracker_core::time::fixed_now;

    fn subject(tasks: Vec<Task>) -> Subject {
        let mut subject = Subject::new("math", "Math", "", "", "").unwrap();
        subject.levels = vec![Level {
            id: LevelId::new("grade_1"),
            name: "Grade 1".to_owned(),
            chapters: vec![Chapter {
                id: ChapterId::new("numbers"),
                name: "Numbers".to_owned(),
                description: String::new(),
                tasks,
            }],
        }];
        subject
    }

    fn task(id: &str) -> Task {
        Task {
            id: TaskId::new(id),
            name: id.to_owned(),
            kind: TaskKind::Concept,
            steps: vec!["one".to_owned()],
            estimated_time: 30,
            difficulty: 1,
            prerequisites: Vec::new(),
        }
    }

    #[test]
    fn newest_activity_comes_first_and_list_truncates() {
        let subject = subject(vec![task("t1"), task("t2"), task("t3")]);
        let mut progress = StudentProgress::empty(StudentId::new("student_001"));
        progress.ensure_subject(&subject);

        let now = fixed_now();
        let earlier = now - chrono::Duration::hours(2);

        // t1 finished two hours ago; t2 just completed.
        let mut old = start_task(1, earlier);
        complete_step(&mut old, 0, 1, earlier).unwrap();
        progress.put_task(&SubjectId::new("math"), TaskId::new("t1"), old);

        let mut fresh = start_task(1, now);
        complete_step(&mut fresh, 0, 1, now).unwrap();
        progress.put_task(&SubjectId::new("math"), TaskId::new("t2"), fresh);

        let activities = map_recent_activities(&[subject.clone()], &progress, 5);
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].title, "Math - t2");
        assert_eq!(activities[0].detail, "Completed");
        assert_eq!(activities[1].title, "Math - t1");

        let truncated = map_recent_activities(&[subject], &progress, 1);
        assert_eq!(truncated.len(), 1);
        assert_eq!(truncated[0].title, "Math - t2");
    }

    #[test]
    fn in_progress_activity_names_the_step() {
        let subject = subject(vec![task("t1")]);
        let mut progress = StudentProgress::empty(StudentId::new("student_001"));
        progress.ensure_subject(&subject);
        progress.put_task(
            &SubjectId::new("math"),
            TaskId::new("t1"),
            start_task(1, fixed_now()),
        );

        let activities = map_recent_activities(&[subject], &progress, 5);
        assert_eq!(activities[0].detail, "In progress (step 1)");
        assert_eq!(activities[0].icon, "\u{1F504}");
    }

    #[test]
    fn untouched_tasks_produce_no_activity() {
        let subject = subject(vec![task("t1")]);
        let mut progress = StudentProgress::empty(StudentId::new("student_001"));
        progress.ensure_subject(&subject);

        assert!(map_recent_activities(&[subject], &progress, 5).is_empty());
    }
}
