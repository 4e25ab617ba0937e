//! Pool of content frames, one per known program.
//!
//! Frames are created up front and parked while no window shows them, so opening a window
//! reuses an already loaded document. A frame is never re-created while its program stays in the
//! catalog; instead its `generation` changes when the document must start over, which is what the
//! view layer keys the frame element on.

use std::collections::BTreeMap;

use desktop_shell_contract::ProgramId;

use crate::{model::WindowId, programs::ProgramDescriptor, programs::ProgramRegistry};

/// Returns the DOM id of the frame element hosting `program`.
pub fn frame_dom_id(program: &ProgramId) -> String {
    format!("content-frame-{program}")
}

/// Borrowed reference to a pooled frame, held by a window while it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHandle {
    program_id: ProgramId,
    generation: u32,
}

impl ContentHandle {
    /// Program whose frame this is.
    pub fn program_id(&self) -> &ProgramId {
        &self.program_id
    }

    /// Document generation the handle was acquired for.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// DOM id of the frame element.
    pub fn dom_id(&self) -> String {
        frame_dom_id(&self.program_id)
    }
}

/// One pooled frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSlot {
    /// Program hosted by the frame.
    pub program_id: ProgramId,
    /// Content document URI.
    pub source: String,
    /// Bumped every time the document must reload.
    pub generation: u32,
    /// Window currently showing the frame.
    pub attached_to: Option<WindowId>,
    /// Whether the current document reported `content-ready`.
    pub loaded: bool,
    /// Whether the frame was created before anyone asked for it.
    pub prewarmed: bool,
    /// Whether the document survives its window closing.
    pub persists_across_close: bool,
}

/// Frame pool keyed by program id; at most one slot per program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFramePool {
    slots: BTreeMap<ProgramId, FrameSlot>,
}

impl ContentFramePool {
    /// Creates a pool with one parked, loading frame per program in `registry`.
    pub fn prewarmed(registry: &ProgramRegistry) -> Self {
        let slots = registry
            .iter()
            .map(|program| (program.id.clone(), Self::new_slot(program, true)))
            .collect();
        Self { slots }
    }

    fn new_slot(program: &ProgramDescriptor, prewarmed: bool) -> FrameSlot {
        FrameSlot {
            program_id: program.id.clone(),
            source: program.source.clone(),
            generation: 0,
            attached_to: None,
            loaded: false,
            prewarmed,
            persists_across_close: program.persists_across_close,
        }
    }

    /// Attaches the frame of `program` to `window`, creating it on demand when the pool has none.
    pub fn acquire(&mut self, program: &ProgramDescriptor, window: &WindowId) -> ContentHandle {
        let slot = self
            .slots
            .entry(program.id.clone())
            .or_insert_with(|| Self::new_slot(program, false));
        slot.attached_to = Some(window.clone());
        ContentHandle {
            program_id: slot.program_id.clone(),
            generation: slot.generation,
        }
    }

    /// Detaches and parks the frame behind `handle`.
    ///
    /// Frames of programs that do not persist across close get a new generation so the next
    /// window starts from a fresh document. Stale or already released handles are ignored and
    /// return `false`.
    pub fn release(&mut self, handle: &ContentHandle) -> bool {
        let Some(slot) = self.slots.get_mut(&handle.program_id) else {
            return false;
        };
        if slot.generation != handle.generation || slot.attached_to.is_none() {
            return false;
        }
        slot.attached_to = None;
        if !slot.persists_across_close {
            slot.generation = slot.generation.wrapping_add(1);
            slot.loaded = false;
        }
        true
    }

    /// Records that the current document of `program` finished loading.
    pub fn mark_loaded(&mut self, program: &ProgramId) -> bool {
        match self.slots.get_mut(program) {
            Some(slot) => {
                slot.loaded = true;
                true
            }
            None => false,
        }
    }

    /// Returns the slot of `program`.
    pub fn slot(&self, program: &ProgramId) -> Option<&FrameSlot> {
        self.slots.get(program)
    }

    /// Iterates every slot in program order.
    pub fn slots(&self) -> impl Iterator<Item = &FrameSlot> {
        self.slots.values()
    }

    /// Returns `true` when a parked frame for `program` is ready to be reused.
    pub fn is_parked(&self, program: &ProgramId) -> bool {
        self.slots
            .get(program)
            .map(|slot| slot.attached_to.is_none())
            .unwrap_or(false)
    }

    /// Number of pooled frames.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when no frame exists.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
