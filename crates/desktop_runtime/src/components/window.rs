use super::*;
use crate::{model::WindowState, snapshot::STATUS_BAR_HEIGHT};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let window = Signal::derive({
        let window_id = window_id.clone();
        move || runtime.snapshot.with(|s| s.window(&window_id).cloned())
    });

    let focus = {
        let window_id = window_id.clone();
        move |_: web_sys::PointerEvent| {
            runtime.dispatch_input(ShellInput::FocusWindow(window_id.clone()));
        }
    };
    let minimize = {
        let window_id = window_id.clone();
        move || runtime.dispatch_input(ShellInput::MinimizeWindow(window_id.clone()))
    };
    let toggle_maximize = {
        let window_id = window_id.clone();
        move || runtime.dispatch_input(ShellInput::ToggleMaximize(window_id.clone()))
    };
    let close = {
        let window_id = window_id.clone();
        move || runtime.dispatch_input(ShellInput::CloseWindow(window_id.clone()))
    };
    let begin_move = {
        let window_id = window_id.clone();
        move |ev: web_sys::PointerEvent| {
            if ev.button() != 0 || (ev.pointer_type() != "mouse" && !ev.is_primary()) {
                return;
            }
            try_set_pointer_capture(&ev);
            ev.prevent_default();
            ev.stop_propagation();
            runtime.dispatch_input(ShellInput::BeginDrag {
                window: window_id.clone(),
                pointer: pointer_from_pointer_event(&ev),
            });
        }
    };

    move || {
        window.get().map(|win| {
            let minimized = win.state == WindowState::Minimized;
            let maximized = win.state == WindowState::Maximized;
            let mut style = rect_style(win.rect.x, win.rect.y, win.rect.w, win.rect.h);
            match win.z_index {
                Some(z) => style.push_str(&format!("z-index:{z};")),
                None => style.push_str("display:none;"),
            }
            let class = format!(
                "desktop-window{}{}{}{}",
                if win.active { " active" } else { "" },
                if minimized { " minimized" } else { "" },
                if maximized { " maximized" } else { "" },
                if win.dragging { " dragging" } else { "" },
            );
            let (focus, begin_move) = (focus.clone(), begin_move.clone());
            let (minimize, toggle_maximize, toggle_on_title, close) = (
                minimize.clone(),
                toggle_maximize.clone(),
                toggle_maximize.clone(),
                close.clone(),
            );
            let (can_minimize, can_maximize) = (win.can_minimize, win.can_maximize);

            view! {
                <section
                    class=class
                    style=style
                    role="dialog"
                    aria-label=win.title.clone()
                    on:pointerdown=focus
                >
                    <header
                        class="title-bar"
                        on:pointerdown=begin_move
                        on:dblclick=move |ev: web_sys::MouseEvent| {
                            stop_mouse_event(&ev);
                            if can_maximize {
                                toggle_on_title();
                            }
                        }
                    >
                        <img class="title-bar-icon" src=win.icon.clone() alt="" />
                        <span class="title-bar-text">{win.title.clone()}</span>
                        <div class="title-bar-controls">
                            <Show when=move || can_minimize fallback=|| ()>
                                <button
                                    aria-label="Minimize"
                                    on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                                    on:click={
                                        let minimize = minimize.clone();
                                        move |ev: web_sys::MouseEvent| {
                                            stop_mouse_event(&ev);
                                            minimize();
                                        }
                                    }
                                />
                            </Show>
                            <Show when=move || can_maximize fallback=|| ()>
                                <button
                                    aria-label=if maximized { "Restore" } else { "Maximize" }
                                    on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                                    on:click={
                                        let toggle_maximize = toggle_maximize.clone();
                                        move |ev: web_sys::MouseEvent| {
                                            stop_mouse_event(&ev);
                                            toggle_maximize();
                                        }
                                    }
                                />
                            </Show>
                            <button
                                aria-label="Close"
                                on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                                on:click=move |ev: web_sys::MouseEvent| {
                                    stop_mouse_event(&ev);
                                    close();
                                }
                            />
                        </div>
                    </header>
                    <div class="window-body" />
                    {win.status_bar.then(|| view! {
                        <footer
                            class="status-bar"
                            style=format!("height:{STATUS_BAR_HEIGHT}px;")
                        >
                            <p class="status-bar-field">{win.status_text.clone()}</p>
                            {win
                                .status_items
                                .iter()
                                .map(|item| view! { <p class="status-bar-field">{item.clone()}</p> })
                                .collect_view()}
                        </footer>
                    })}
                </section>
            }
        })
    }
}
