//! Shared application state for request handlers.

use crate::pipeline::Pipeline;

/// State injected into every handler via `axum::extract::State`.
///
/// Cheap to clone: the pipeline is a bundle of shared handles.
#[derive(Clone)]
pub struct AppState {
    /// The processing pipeline built once at startup.
    pub pipeline: Pipeline,
    /// Path under which the browser UI is mounted (e.g. `/app`).
    pub mount_path: String,
}

impl AppState {
    pub fn new(pipeline: Pipeline, mount_path: impl Into<String>) -> Self {
        Self {
            pipeline,
            mount_path: mount_path.into(),
        }
    }
}
