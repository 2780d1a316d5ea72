mod activity_vm;
mod stats_vm;
mod student_vm;
mod subject_vm;
mod task_vm;
mod time_fmt;

pub use activity_vm::{ActivityVm, map_recent_activities};
pub use stats_vm::{StatTileVm, map_stat_tiles};
pub use student_vm::{
    StudentAdminRowVm, StudentCardVm, map_student_admin_rows, map_student_cards,
};
pub use subject_vm::{
    ChapterVm, SubjectAdminRowVm, SubjectCardVm, TaskRowVm, map_chapters, map_subject_admin_rows,
    map_subject_cards,
};
pub use task_vm::{StepDisplayState, StepVm, TaskDetailVm, map_task_detail};
pub use time_fmt::{format_date, format_datetime};
