use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::toast::ToastHost;
use crate::views::{AdminView, DashboardView, StudentsView, SubjectView, TaskView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", StudentsView)] Students {},
        #[route("/students/:student_id", DashboardView)] Dashboard { student_id: String },
        #[route("/students/:student_id/subjects/:subject_id", SubjectView)] SubjectTasks { student_id: String, subject_id: String },
        #[route("/students/:student_id/subjects/:subject_id/tasks/:task_id", TaskView)] TaskDetail { student_id: String, subject_id: String, task_id: String },
        #[route("/admin", AdminView)] Admin {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Topbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
            ToastHost {}
        }
    }
}

#[component]
fn Topbar() -> Element {
    rsx! {
        nav { class: "topbar",
            h1 { class: "topbar-title", "Progress" }
            ul { class: "topbar-links",
                li { Link { to: Route::Students {}, "Students" } }
                li { Link { to: Route::Admin {}, "Admin" } }
            }
        }
    }
}
