//! HTTP presentation layer.
//!
//! A static JSON health payload at `/`, the browser UI at the configured
//! mount path, and two API endpoints the UI's buttons call independently.

pub mod handlers;
pub mod router;
pub mod state;
pub mod ui;

pub use handlers::{RootResponse, SpeakRequest, TranscribeResponse};
pub use router::create_router;
pub use state::AppState;
