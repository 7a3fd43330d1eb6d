use leptos::prelude::*;

#[component]
pub fn StatusLine(#[prop(into)] status: Signal<String>) -> impl IntoView {
    view! {
        <p class="status" role="status">
            {move || status.get()}
        </p>
    }
}
