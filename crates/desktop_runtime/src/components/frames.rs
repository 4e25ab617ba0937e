//! Pooled content frames, drawn in their own layer above the window chrome.
//!
//! A frame element is keyed by program and document generation, so moving it between windows or
//! parking it never reloads the document; only a new generation rebuilds the `<iframe>`.

use desktop_shell_contract::ProgramId;

use super::*;
use crate::snapshot::FrameView;

#[component]
pub(super) fn FrameLayer() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let keys = move || {
        runtime.snapshot.with(|s| {
            s.frames
                .iter()
                .map(|frame| (frame.program_id.clone(), frame.generation))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="frame-layer">
            <For each=keys key=|key| key.clone() let:key>
                <ContentFrame program_id=key.0 />
            </For>
        </div>
    }
}

fn frame_style(frame: &FrameView) -> String {
    match (frame.rect, frame.z_index) {
        (Some(rect), Some(z)) => format!("{}z-index:{z};", rect_style(rect.x, rect.y, rect.w, rect.h)),
        _ => "display:none;".to_string(),
    }
}

#[component]
fn ContentFrame(program_id: ProgramId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let frame = Signal::derive({
        let program_id = program_id.clone();
        move || runtime.snapshot.with(|s| s.frame(&program_id).cloned())
    });
    let Some(initial) = frame.get_untracked() else {
        return ().into_view();
    };

    let style = move || frame.with(|f| f.as_ref().map(frame_style).unwrap_or_default());
    let flag = move |pick: fn(&FrameView) -> bool| {
        move || frame.with(|f| f.as_ref().is_some_and(pick))
    };
    let owner = move || frame.with(|f| f.as_ref().and_then(|f| f.window.clone()));

    view! {
        <iframe
            id=initial.dom_id.clone()
            class="content-frame"
            src=initial.source.clone()
            title=initial.program_id.to_string()
            style=style
        />
        <Show when=flag(|f| f.inactive_mask) fallback=|| ()>
            <div
                class="inactive-mask"
                style=style
                on:pointerdown=move |_| {
                    if let Some(window) = owner() {
                        runtime.dispatch_input(ShellInput::FocusWindow(window));
                    }
                }
            />
        </Show>
        <Show when=flag(|f| f.content_overlay) fallback=|| ()>
            <div
                class="content-overlay"
                style=style
                on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                on:click=move |_| {
                    if let Some(window) = owner() {
                        runtime.dispatch_input(ShellInput::ContentOverlayClicked(window));
                    }
                }
            />
        </Show>
        <Show when=flag(|f| f.loading) fallback=|| ()>
            <div class="content-loading" style=style aria-busy="true">
                <span>"Loading..."</span>
            </div>
        </Show>
    }
    .into_view()
}
