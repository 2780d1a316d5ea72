mod admin;
mod dashboard;
mod modals;
mod state;
mod students;
mod subject;
mod task;

pub use admin::AdminView;
pub use dashboard::DashboardView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use students::StudentsView;
pub use subject::SubjectView;
pub use task::TaskView;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
