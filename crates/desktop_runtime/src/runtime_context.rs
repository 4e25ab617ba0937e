//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived [`DesktopRuntime`], mirrors it into a reactive
//! [`DesktopSnapshot`], and installs the browser listeners that feed it (resize, keyboard,
//! content-frame messages, timers). UI composition stays in [`crate::components`].

use std::{rc::Rc, time::Duration};

use desktop_shell_contract::ProgramId;
use leptos::*;
use platform_host::{unix_time_ms_now, SystemClock};
use platform_host_web::{
    decode_message_data, frame_source_matches, is_trusted_origin, open_external_url, page_origin,
    post_message_to_frame, viewport_size, WebSessionStore,
};
use serde_json::Value;

use crate::{
    config::ShellConfig,
    events::{ShellEvent, Topic},
    frame_pool::frame_dom_id,
    model::Viewport,
    programs::ProgramRegistry,
    runtime::{DesktopRuntime, ShellInput},
    session::{SessionPhase, BOOT_SCREEN_MS},
    snapshot::DesktopSnapshot,
};

#[derive(Clone, Copy)]
/// Leptos context for reading the desktop snapshot and dispatching [`ShellInput`] values.
pub struct DesktopRuntimeContext {
    /// Shell runtime shared by every component.
    pub runtime: StoredValue<DesktopRuntime>,
    /// Render projection refreshed after every input.
    pub snapshot: RwSignal<DesktopSnapshot>,
    /// Input dispatch callback.
    pub dispatch: Callback<ShellInput>,
}

impl DesktopRuntimeContext {
    /// Dispatches one input through the runtime context callback.
    pub fn dispatch_input(&self, input: ShellInput) {
        self.dispatch.call(input);
    }

    /// Routes a content-frame message and refreshes the snapshot.
    pub fn deliver_frame_message(&self, program: &ProgramId, data: &Value) {
        self.runtime
            .with_value(|runtime| runtime.deliver_frame_message(program, data));
        refresh_snapshot(self.runtime, self.snapshot);
    }

    /// Opens a `?open=` deep link and refreshes the snapshot.
    pub fn open_deep_link(&self, raw: &str) {
        self.runtime.with_value(|runtime| runtime.open_deep_link(raw));
        refresh_snapshot(self.runtime, self.snapshot);
    }
}

fn refresh_snapshot(runtime: StoredValue<DesktopRuntime>, snapshot: RwSignal<DesktopSnapshot>) {
    let next = runtime.with_value(DesktopRuntime::snapshot);
    if snapshot.with_untracked(|current| current != &next) {
        snapshot.set(next);
    }
}

fn builtin_registry() -> ProgramRegistry {
    match ProgramRegistry::builtin() {
        Ok(registry) => registry,
        Err(err) => {
            logging::error!("program catalog rejected: {err}");
            ProgramRegistry::default()
        }
    }
}

fn current_viewport() -> Viewport {
    let (width, height) = viewport_size();
    Viewport::new(width, height)
}

fn install_host_effects(runtime: &DesktopRuntime) {
    // Subscriptions live as long as the bus.
    let _ = runtime.bus().subscribe(Topic::FramePostMessage, |event| {
        if let ShellEvent::FramePostRequested { program, message } = event {
            if let Err(err) = post_message_to_frame(&frame_dom_id(program), &message.to_value()) {
                logging::warn!("frame post to {program} failed: {err}");
            }
        }
    });
    let _ = runtime.bus().subscribe(Topic::UrlOpen, |event| {
        if let ShellEvent::UrlOpenRequested { url } = event {
            if let Err(err) = open_external_url(url) {
                logging::warn!("external url open failed: {err}");
            }
        }
    });
}

fn install_browser_listeners(context: DesktopRuntimeContext) {
    let resize = window_event_listener(ev::resize, move |_| {
        context.dispatch_input(ShellInput::ViewportResized(current_viewport()));
    });
    on_cleanup(move || resize.remove());

    let keydown = window_event_listener(ev::keydown, move |ev| {
        context.dispatch_input(ShellInput::KeyPressed(ev.key()));
    });
    on_cleanup(move || keydown.remove());

    let blur = window_event_listener(ev::blur, move |_| {
        context.dispatch_input(ShellInput::CancelDrag);
    });
    on_cleanup(move || blur.remove());

    let message = window_event_listener(ev::message, move |ev| {
        let origin = ev.origin();
        if !is_trusted_origin(&origin, &page_origin()) {
            logging::warn!("frame message from untrusted origin `{origin}` ignored");
            return;
        }
        let Some(data) = decode_message_data(ev.data()) else {
            return;
        };
        let source = ev
            .source()
            .map(wasm_bindgen::JsValue::from)
            .unwrap_or(wasm_bindgen::JsValue::NULL);
        let sender = context.snapshot.with_untracked(|snapshot| {
            snapshot
                .frame_sender(|dom_id| frame_source_matches(dom_id, &source))
                .cloned()
        });
        if let Some(program) = sender {
            context.deliver_frame_message(&program, &data);
        }
    });
    on_cleanup(move || message.remove());
}

fn status_due(snapshot: RwSignal<DesktopSnapshot>) -> Memo<Option<u64>> {
    create_memo(move |_| snapshot.with(|snapshot| snapshot.next_status_due_ms))
}

fn install_timers(context: DesktopRuntimeContext) {
    let due = status_due(context.snapshot);
    create_effect(move |_| {
        let Some(due_ms) = due.get() else {
            return;
        };
        let delay = due_ms.saturating_sub(unix_time_ms_now());
        set_timeout(
            move || context.dispatch_input(ShellInput::FlushStatus),
            Duration::from_millis(delay),
        );
    });

    if context.snapshot.with_untracked(|snapshot| snapshot.phase) == SessionPhase::Booting {
        set_timeout(
            move || context.dispatch_input(ShellInput::BootFinished),
            Duration::from_millis(u64::from(BOOT_SCREEN_MS)),
        );
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and resumes the session.
pub fn DesktopProvider(
    /// Program named by the `?open=` query parameter, opened once on mount.
    #[prop(optional, into)]
    open: Option<String>,
    children: Children,
) -> impl IntoView {
    let shell = DesktopRuntime::new(
        ShellConfig::default(),
        builtin_registry(),
        current_viewport(),
        Rc::new(SystemClock),
        Rc::new(WebSessionStore),
    );
    install_host_effects(&shell);

    let snapshot = create_rw_signal(shell.snapshot());
    let runtime = store_value(shell);
    let dispatch = Callback::new(move |input: ShellInput| {
        runtime.with_value(|runtime| runtime.dispatch(input));
        refresh_snapshot(runtime, snapshot);
    });

    let context = DesktopRuntimeContext {
        runtime,
        snapshot,
        dispatch,
    };
    provide_context(context);

    install_browser_listeners(context);
    install_timers(context);
    if let Some(raw) = open.filter(|raw| !raw.is_empty()) {
        context.open_deep_link(&raw);
    }

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use platform_host::{ManualClock, MemorySessionStore};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_timer_reruns_only_when_the_due_time_changes() {
        let reactive = create_runtime();
        let shell = DesktopRuntime::new(
            ShellConfig::default(),
            builtin_registry(),
            Viewport::new(1600, 1000),
            Rc::new(ManualClock::starting_at(0)),
            Rc::new(MemorySessionStore::default()),
        );
        let snapshot = create_rw_signal(shell.snapshot());
        let due = status_due(snapshot);
        let runs = Rc::new(Cell::new(0));
        let scheduled = create_memo({
            let runs = Rc::clone(&runs);
            move |_| {
                runs.set(runs.get() + 1);
                due.get()
            }
        });

        assert_eq!(scheduled.get(), None);
        snapshot.update(|snapshot| snapshot.start_menu_open = true);
        assert_eq!(scheduled.get(), None);
        assert_eq!(runs.get(), 1);

        snapshot.update(|snapshot| snapshot.next_status_due_ms = Some(5_000));
        assert_eq!(scheduled.get(), Some(5_000));
        snapshot.update(|snapshot| snapshot.start_menu_open = false);
        assert_eq!(scheduled.get(), Some(5_000));
        assert_eq!(runs.get(), 2);

        reactive.dispose();
    }
}
