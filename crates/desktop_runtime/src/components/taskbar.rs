use std::time::Duration;

use super::*;
use crate::taskbar::{format_clock, local_clock_time, TRAY_PROGRAM};

fn clock_label() -> String {
    let (hour, minute) = local_clock_time();
    format_clock(hour, minute)
}

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let snapshot = runtime.snapshot;
    let clock = create_rw_signal(clock_label());

    match set_interval_with_handle(move || clock.set(clock_label()), Duration::from_secs(1)) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => logging::warn!("taskbar clock timer failed: {err:?}"),
    }

    let entry_ids = move || {
        snapshot.with(|s| {
            s.taskbar
                .iter()
                .map(|entry| entry.id.clone())
                .collect::<Vec<WindowId>>()
        })
    };
    let strip_class = move || snapshot.with(|s| s.taskbar_layout.mode.css_class());

    view! {
        <footer class="taskbar" role="toolbar" aria-label="Taskbar">
            <button
                id="start-button"
                class=move || {
                    if snapshot.with(|s| s.start_pressed) { "start-button pressed" } else { "start-button" }
                }
                aria-haspopup="menu"
                aria-expanded=move || snapshot.with(|s| s.start_menu_open).to_string()
                on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                on:click=move |ev: web_sys::MouseEvent| {
                    stop_mouse_event(&ev);
                    runtime.dispatch_input(ShellInput::StartButtonClicked);
                }
            >
                <img src="./assets/gui/taskbar/start-button.webp" alt="start" />
            </button>
            <div class=strip_class>
                <For each=entry_ids key=|id| id.clone() let:window_id>
                    <TaskbarButton window_id=window_id />
                </For>
            </div>
            <div class="taskbar-tray">
                <button
                    class="tray-shortcut"
                    title=TRAY_PROGRAM
                    aria-label="Media Player"
                    on:click=move |ev: web_sys::MouseEvent| {
                        stop_mouse_event(&ev);
                        runtime.dispatch_input(ShellInput::TrayMediaClicked);
                    }
                >
                    <img src="./assets/gui/start-menu/media-player.webp" alt="" />
                </button>
                <span class="taskbar-clock">{move || clock.get()}</span>
            </div>
        </footer>
    }
}

#[component]
fn TaskbarButton(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let entry = Signal::derive({
        let window_id = window_id.clone();
        move || {
            runtime
                .snapshot
                .with(|s| s.taskbar.iter().find(|entry| entry.id == window_id).cloned())
        }
    });
    let width = move || runtime.snapshot.with(|s| s.taskbar_layout.item_width);

    move || {
        let window_id = window_id.clone();
        entry.get().map(|entry| {
            view! {
                <button
                    class=if entry.active { "taskbar-item active" } else { "taskbar-item" }
                    style=move || format!("width:{}px;", width())
                    title=entry.title.clone()
                    aria-pressed=entry.active.to_string()
                    on:click=move |ev: web_sys::MouseEvent| {
                        stop_mouse_event(&ev);
                        runtime.dispatch_input(ShellInput::TaskbarItemClicked(window_id.clone()));
                    }
                >
                    <img src=entry.icon.clone() alt="" />
                    <span class="taskbar-item-title">{entry.title.clone()}</span>
                </button>
            }
        })
    }
}
