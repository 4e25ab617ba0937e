//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side wiring layer for the desktop shell: the
//! `sessionStorage` adapter, content-frame messaging helpers, viewport measurement, and external
//! URL opening. Every entry point compiles on non-`wasm32` targets as an inert fallback so the
//! runtime can be tested natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod external_url;
pub mod frames;
pub mod storage;
pub mod viewport;

pub use external_url::open_external_url;
pub use frames::{
    decode_message_data, frame_source_matches, is_trusted_origin, page_origin,
    post_message_to_frame,
};
pub use storage::session_storage::WebSessionStore;
pub use viewport::viewport_size;
