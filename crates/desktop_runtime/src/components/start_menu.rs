use super::*;
use crate::start_menu::StartMenuItem;

fn item_class(item: &StartMenuItem) -> &'static str {
    match item {
        StartMenuItem::Program { .. } => "start-menu-item program",
        StartMenuItem::Link { .. } => "start-menu-item link",
        StartMenuItem::Disabled { .. } => "start-menu-item disabled",
        StartMenuItem::LogOff => "start-menu-item log-off",
    }
}

#[component]
pub(super) fn StartMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let snapshot = runtime.snapshot;
    let open = move || snapshot.with(|s| s.start_menu_open);

    view! {
        <Show when=open fallback=|| ()>
            <nav
                id="start-menu"
                class="start-menu"
                role="menu"
                on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
            >
                <header class="start-menu-header">
                    <img src="./assets/gui/boot/userlogin.webp" alt="" />
                    <span>"Mitchell Ivin"</span>
                </header>
                <ul class="start-menu-items">
                    {move || {
                        snapshot
                            .with(|s| s.start_menu_items.clone())
                            .into_iter()
                            .enumerate()
                            .map(|(index, item)| {
                                let enabled = item.is_enabled();
                                view! {
                                    <li
                                        class=item_class(&item)
                                        role="menuitem"
                                        aria-disabled=(!enabled).to_string()
                                        on:click=move |ev: web_sys::MouseEvent| {
                                            stop_mouse_event(&ev);
                                            if enabled {
                                                runtime
                                                    .dispatch_input(
                                                        ShellInput::StartMenuItemActivated(index),
                                                    );
                                            }
                                        }
                                    >
                                        <img src=item.icon().to_string() alt="" />
                                        <span>{item.label().to_string()}</span>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </nav>
        </Show>
    }
}
