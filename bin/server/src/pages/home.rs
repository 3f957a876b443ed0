//! Home page component.

use leptos::prelude::*;

/// The home page component. Static content only; no data loading.
#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <div>"This is the content of the root page"</div>
        </div>
    }
}
