use axum::{
    body::Body,
    extract::{Request, State},
    http::Uri,
    response::Response,
};
use state::server::AppState;

use crate::app::shell;

/// Serves files from the site root, rendering the app's not-found page for
/// anything else.
pub async fn file_and_error_handler(
    uri: Uri,
    State(state): State<AppState>,
    req: Request<Body>,
) -> Response {
    let handler = leptos_axum::file_and_error_handler::<AppState, _>(shell);
    handler(uri, State(state), req).await
}
