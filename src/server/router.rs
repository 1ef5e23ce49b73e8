//! Route table and middleware stack.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::server::handlers::{root_handler, speak_handler, transcribe_handler, ui_handler};
use crate::server::state::AppState;

/// Uploads are capped at 25 MiB — generous for voice clips.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the application router: a static root health route plus the UI and
/// its API endpoints mounted under the configured path.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mount = state.mount_path.clone();

    Router::new()
        .route("/", get(root_handler))
        .route(&mount, get(ui_handler))
        .route(&format!("{mount}/api/transcribe"), post(transcribe_handler))
        .route(&format!("{mount}/api/speak"), post(speak_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}
