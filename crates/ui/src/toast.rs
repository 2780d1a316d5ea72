//! Transient toast notifications.
//!
//! Every action failure and success surfaces here; toasts dismiss themselves
//! after a few seconds.

use dioxus::prelude::*;

const TOAST_SECONDS: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    fn class(self) -> &'static str {
        match self {
            ToastLevel::Info => "toast toast--info",
            ToastLevel::Success => "toast toast--success",
            ToastLevel::Error => "toast toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

/// Handle to the toast stack. Copyable, pulled from the context anywhere.
#[derive(Clone, Copy)]
pub struct Toaster {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl Toaster {
    /// Install the toaster into the component tree. Call once, near the root.
    pub fn provide() -> Self {
        use_context_provider(|| Self {
            toasts: Signal::new(Vec::new()),
            next_id: Signal::new(0),
        })
    }

    #[must_use]
    pub fn from_context() -> Self {
        use_context::<Self>()
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        let id = {
            let mut next = self.next_id;
            let id = next();
            next.set(id + 1);
            id
        };
        self.toasts.write().push(Toast {
            id,
            level,
            message: message.into(),
        });

        let mut toasts = self.toasts;
        spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(TOAST_SECONDS)).await;
            toasts.write().retain(|toast| toast.id != id);
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    fn current(&self) -> Vec<Toast> {
        self.toasts.read().clone()
    }
}

/// Renders the active toasts in a fixed corner stack.
#[component]
pub fn ToastHost() -> Element {
    let toaster = Toaster::from_context();
    let toasts = toaster.current();

    rsx! {
        div { class: "toast-stack",
            for toast in toasts {
                div { key: "{toast.id}", class: "{toast.level.class()}", "{toast.message}" }
            }
        }
    }
}
