use desktop_runtime::{DesktopProvider, DesktopShell};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Mitchell Ivin XP" />
        <Meta name="description" content="A Windows XP styled portfolio desktop." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=DesktopEntry />
                    <Route path="/*any" view=DesktopEntry />
                </Routes>
            </main>
        </Router>
    }
}

/// Desktop mounted at the site root. `?open=<program>` opens a program once on load.
#[component]
pub fn DesktopEntry() -> impl IntoView {
    let query = use_query_map();
    let open = query.with_untracked(|map| map.get("open").cloned());

    view! {
        <DesktopProvider open=open.unwrap_or_default()>
            <DesktopShell />
        </DesktopProvider>
    }
}
