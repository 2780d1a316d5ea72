use dioxus::prelude::*;

/// Failure surfaced by a view load. Action failures go to the toast stack
/// instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Message(String),
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn from_error(err: &impl std::fmt::Display) -> Self {
        Self::Message(err.to_string())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ViewError::Message(message) => message,
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
