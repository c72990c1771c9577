//! Axum router wiring.
//!
//! Built-in routes (`/healthz`, `/whoami`, `/metrics`, admin API), all
//! behind the URL filter.

use axum::{extract::State, http::HeaderMap, routing::get, Router};

use crate::{admin, app_state::AppState, filter};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(healthz))
        .route("/whoami", get(whoami))
        .route("/metrics", get(metrics));

    if state.cfg().admin.enabled {
        router = router.merge(admin::routes(&state.cfg().admin.path_prefix));
    }

    filter::install(router, state.clone()).with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Principal name as the filter sees it.
async fn whoami(State(app): State<AppState>, headers: HeaderMap) -> String {
    app.identity().principal(&headers).await
}

async fn metrics(State(app): State<AppState>) -> String {
    app.metrics().render()
}
