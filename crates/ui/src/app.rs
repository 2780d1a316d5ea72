use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;
use crate::toast::Toaster;

#[component]
pub fn App() -> Element {
    Toaster::provide();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Stable OS/window title; per-page headers live inside the pages.
        document::Title { "Progress" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
