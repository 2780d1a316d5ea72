use tracker_core::model::{StepState, Task, TaskProgress, TaskStatus};
use tracker_core::progress::step_percent;

use crate::vm::subject_vm::stars;
use crate::vm::time_fmt::format_datetime;

/// Display state of one step row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDisplayState {
    Completed,
    Skipped,
    Current,
    Pending,
}

impl StepDisplayState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            StepDisplayState::Completed => "step-item step-item--completed",
            StepDisplayState::Skipped => "step-item step-item--skipped",
            StepDisplayState::Current => "step-item step-item--current",
            StepDisplayState::Pending => "step-item step-item--pending",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            StepDisplayState::Completed => "\u{2705}",
            StepDisplayState::Skipped => "\u{23ED}\u{FE0F}",
            StepDisplayState::Current => "\u{1F504}",
            StepDisplayState::Pending => "\u{23F3}",
        }
    }
}

/// One step row on the task page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepVm {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub state: StepDisplayState,
    pub completed_at_label: Option<String>,
    pub can_complete: bool,
    pub can_skip: bool,
    pub can_uncomplete: bool,
}

/// Header plus step list for the task page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskDetailVm {
    pub name: String,
    pub stars: String,
    pub time_label: String,
    pub percent: u8,
    pub step_counter_label: String,
    pub completed: bool,
    pub steps: Vec<StepVm>,
}

/// Builds the task page display from the task and its progress.
///
/// Steps past the current pointer cannot be acted on; steps at or before it
/// offer complete/skip until they are done, then undo.
#[must_use]
pub fn map_task_detail(task: &Task, progress: &TaskProgress) -> TaskDetailVm {
    let total = task.step_count();
    let completed = progress.status == TaskStatus::Completed;

    let steps = task
        .steps
        .iter()
        .enumerate()
        .map(|(index, description)| {
            let record_state = progress
                .step_progress
                .get(index)
                .map_or(StepState::Incomplete, |record| record.state());
            let is_current = index == progress.current_step;
            let is_pending = index > progress.current_step;

            let state = match record_state {
                StepState::Completed => StepDisplayState::Completed,
                StepState::Skipped => StepDisplayState::Skipped,
                StepState::Incomplete if is_current => StepDisplayState::Current,
                StepState::Incomplete => StepDisplayState::Pending,
            };

            let completed_at_label = progress
                .step_progress
                .get(index)
                .and_then(|record| record.completed_at)
                .map(|at| format!("Done {}", format_datetime(at)));

            let done = record_state != StepState::Incomplete;
            StepVm {
                index,
                title: format!("Step {}", index + 1),
                description: description.clone(),
                state,
                completed_at_label,
                can_complete: !is_pending && !done,
                can_skip: !is_pending && !done,
                can_uncomplete: !is_pending && done,
            }
        })
        .collect();

    let step_counter_label = if completed {
        format!("All {total} steps done")
    } else {
        format!(
            "Step {} of {}",
            (progress.current_step + 1).min(total.max(1)),
            total
        )
    };

    TaskDetailVm {
        name: task.name.clone(),
        stars: stars(task.difficulty),
        time_label: format!("{} min", task.estimated_time),
        percent: step_percent(Some(progress), total),
        step_counter_label,
        completed,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::model::{TaskId, TaskKind};
    use tracker_core::steps::{complete_step, skip_step, start_task};
    use tracker_core::time::fixed_now;

    fn task() -> Task {
        Task {
            id: TaskId::new("task_001"),
            name: "Count to ten".to_owned(),
            kind: TaskKind::Concept,
            steps: vec!["Count".to_owned(), "Write".to_owned(), "Quiz".to_owned()],
            estimated_time: 30,
            difficulty: 2,
            prerequisites: Vec::new(),
        }
    }

    #[test]
    fn fresh_task_shows_first_step_current() {
        let vm = map_task_detail(&task(), &start_task(3, fixed_now()));

        assert_eq!(vm.percent, 0);
        assert_eq!(vm.step_counter_label, "Step 1 of 3");
        assert!(!vm.completed);

        assert_eq!(vm.steps[0].state, StepDisplayState::Current);
        assert!(vm.steps[0].can_complete);
        assert!(vm.steps[0].can_skip);
        assert!(!vm.steps[0].can_uncomplete);

        assert_eq!(vm.steps[1].state, StepDisplayState::Pending);
        assert!(!vm.steps[1].can_complete);
    }

    #[test]
    fn mixed_progress_maps_each_state() {
        let now = fixed_now();
        let mut progress = start_task(3, now);
        complete_step(&mut progress, 0, 3, now).unwrap();
        skip_step(&mut progress, 1, 3, now).unwrap();

        let vm = map_task_detail(&task(), &progress);
        assert_eq!(vm.percent, 67);
        assert_eq!(vm.step_counter_label, "Step 3 of 3");

        assert_eq!(vm.steps[0].state, StepDisplayState::Completed);
        assert!(vm.steps[0].can_uncomplete);
        assert!(vm.steps[0].completed_at_label.is_some());

        assert_eq!(vm.steps[1].state, StepDisplayState::Skipped);
        assert!(vm.steps[1].can_uncomplete);

        assert_eq!(vm.steps[2].state, StepDisplayState::Current);
        assert!(vm.steps[2].can_complete);
    }

    #[test]
    fn completed_task_counts_all_steps() {
        let now = fixed_now();
        let mut progress = start_task(3, now);
        for index in 0..3 {
            complete_step(&mut progress, index, 3, now).unwrap();
        }

        let vm = map_task_detail(&task(), &progress);
        assert!(vm.completed);
        assert_eq!(vm.percent, 100);
        assert_eq!(vm.step_counter_label, "All 3 steps done");
        assert!(vm.steps.iter().all(|step| step.can_uncomplete));
    }

    #[test]
    fn header_carries_difficulty_and_time() {
        let vm = map_task_detail(&task(), &start_task(3, fixed_now()));
        assert_eq!(vm.stars, "\u{2B50}\u{2B50}");
        assert_eq!(vm.time_label, "30 min");
        assert_eq!(vm.name, "Count to ten");
    }
}
