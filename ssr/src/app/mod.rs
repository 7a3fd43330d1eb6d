use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Meta, MetaTags, Style};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};
use page::dashboard::DashboardPage;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #1d1f24; }
.app { max-width: 960px; margin: 0 auto; padding: 1.5rem; }
.header { display: flex; justify-content: space-between; align-items: center; }
.status { min-height: 1.5rem; color: #4b5563; }
.tournaments { display: grid; gap: 1rem; }
.tournament, .player-stats, .admin-actions { background: #fff; border-radius: 8px; padding: 1rem; }
.field { display: flex; flex-direction: column; margin-bottom: 0.5rem; }
button { margin-right: 0.5rem; }
button:disabled { opacity: 0.5; }
"#;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Meta name="description" content="Tournament dashboard" />
        <Style>{STYLE}</Style>
        <Router>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("") view=DashboardPage />
                </Routes>
            </main>
        </Router>
    }
}
