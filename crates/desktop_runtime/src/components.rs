//! Desktop shell UI composition and interaction surfaces.

mod frames;
mod start_menu;
mod taskbar;
mod window;

use leptos::*;

use self::{frames::FrameLayer, start_menu::StartMenu, taskbar::Taskbar, window::DesktopWindow};

use crate::{
    model::{Point, WindowId},
    runtime::ShellInput,
    session::SessionPhase,
    snapshot::IconView,
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> Point {
    Point::new(ev.client_x(), ev.client_y())
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn rect_style(x: i32, y: i32, w: i32, h: i32) -> String {
    format!("left:{x}px;top:{y}px;width:{w}px;height:{h}px;")
}

#[component]
/// Renders the full desktop shell: wallpaper, icons, windows, frames, taskbar, and start menu.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let snapshot = runtime.snapshot;

    let dragging_window = move || {
        snapshot.with_untracked(|s| s.windows.iter().any(|window| window.dragging))
    };
    let pointer_move = window_event_listener(ev::pointermove, move |ev| {
        let pointer = pointer_from_pointer_event(&ev);
        if dragging_window() {
            runtime.dispatch_input(ShellInput::DragMoved(pointer));
        } else if snapshot.with_untracked(|s| s.selection_rect.is_some()) || ev.buttons() == 1 {
            runtime.dispatch_input(ShellInput::DesktopPointerMoved(pointer));
        }
    });
    on_cleanup(move || pointer_move.remove());

    let pointer_up = window_event_listener(ev::pointerup, move |ev| {
        if dragging_window() {
            runtime.dispatch_input(ShellInput::EndDrag(pointer_from_pointer_event(&ev)));
        }
        runtime.dispatch_input(ShellInput::DesktopPointerUp);
    });
    on_cleanup(move || pointer_up.remove());

    let pointer_cancel = window_event_listener(ev::pointercancel, move |_| {
        runtime.dispatch_input(ShellInput::CancelDrag);
        runtime.dispatch_input(ShellInput::DesktopPointerUp);
    });
    on_cleanup(move || pointer_cancel.remove());

    let on_shell_pointer_down = move |_| {
        if snapshot.with_untracked(|s| s.start_menu_open) {
            runtime.dispatch_input(ShellInput::OutsideStartMenuPressed);
        }
    };
    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            style=move || format!("background-image:url('{}');", snapshot.with(|s| s.wallpaper))
            on:pointerdown=on_shell_pointer_down
            inert=move || snapshot.with(|s| s.phase != SessionPhase::Desktop)
        >
            <DesktopIcons />
            <WindowLayer />
            <FrameLayer />
            <StartMenu />
            <Taskbar />
        </div>
        <SessionOverlay />
    }
}

#[component]
fn WindowLayer() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let window_ids = move || {
        runtime.snapshot.with(|s| {
            s.windows
                .iter()
                .map(|window| window.id.clone())
                .collect::<Vec<WindowId>>()
        })
    };

    view! {
        <div class="window-layer">
            <For each=window_ids key=|id| id.clone() let:window_id>
                <DesktopWindow window_id=window_id />
            </For>
        </div>
    }
}

#[component]
fn DesktopIcons() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let snapshot = runtime.snapshot;
    let icon_ids = move || {
        snapshot.with(|s| {
            s.icons
                .iter()
                .map(|icon| icon.program_id.clone())
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div
            class="desktop-surface"
            on:pointerdown=move |ev: web_sys::PointerEvent| {
                if ev.button() != 0 {
                    return;
                }
                runtime
                    .dispatch_input(ShellInput::DesktopPointerDown {
                        point: pointer_from_pointer_event(&ev),
                        ctrl: ev.ctrl_key(),
                    });
            }
            on:click=move |_| runtime.dispatch_input(ShellInput::DesktopClicked)
        >
            <For each=icon_ids key=|id| id.clone() let:program_id>
                <DesktopIconButton icon=Signal::derive({
                    let program_id = program_id.clone();
                    move || {
                        snapshot
                            .with(|s| {
                                s.icons.iter().find(|icon| icon.program_id == program_id).cloned()
                            })
                    }
                }) />
            </For>
            {move || {
                snapshot
                    .with(|s| s.selection_rect)
                    .map(|rect| {
                        view! {
                            <div
                                class="selection-rectangle"
                                style=rect_style(rect.x, rect.y, rect.w, rect.h)
                            />
                        }
                    })
            }}
        </div>
    }
}

#[component]
fn DesktopIconButton(icon: Signal<Option<IconView>>) -> impl IntoView {
    let runtime = use_desktop_runtime();

    move || {
        icon.get().map(|icon| {
            let class = match (icon.selected, icon.highlighted) {
                (true, _) => "desktop-icon selected",
                (false, true) => "desktop-icon highlighted",
                (false, false) => "desktop-icon",
            };
            let click_program = icon.program_id.clone();
            let open_program = icon.program_id.clone();
            view! {
                <div
                    class=class
                    style=rect_style(icon.rect.x, icon.rect.y, icon.rect.w, icon.rect.h)
                    title=icon.title.clone()
                    on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                    on:click=move |ev: web_sys::MouseEvent| {
                        stop_mouse_event(&ev);
                        runtime
                            .dispatch_input(ShellInput::IconClicked {
                                program: click_program.clone(),
                                ctrl: ev.ctrl_key(),
                            });
                    }
                    on:dblclick=move |ev: web_sys::MouseEvent| {
                        stop_mouse_event(&ev);
                        runtime.dispatch_input(ShellInput::IconDoubleClicked(open_program.clone()));
                    }
                >
                    <img src=icon.icon.clone() alt="" draggable="false" />
                    <span class="desktop-icon-label">{icon.title.clone()}</span>
                </div>
            }
        })
    }
}

#[component]
fn SessionOverlay() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let phase = Signal::derive(move || runtime.snapshot.with(|s| s.phase));

    move || match phase.get() {
        SessionPhase::Booting => view! {
            <div class="boot-screen" role="status" aria-label="Starting">
                <img src="./assets/gui/boot/boot-logo.webp" alt="" />
                <div class="boot-progress" aria-hidden="true"></div>
            </div>
        }
        .into_view(),
        SessionPhase::LoggedOut => view! {
            <div class="login-screen">
                <button
                    class="login-user"
                    on:click=move |_| runtime.dispatch_input(ShellInput::LogIn)
                >
                    <img src="./assets/gui/boot/userlogin.webp" alt="" />
                    <span>"Mitchell Ivin"</span>
                </button>
            </div>
        }
        .into_view(),
        SessionPhase::Desktop => ().into_view(),
    }
}
