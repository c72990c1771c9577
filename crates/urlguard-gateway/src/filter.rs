//! Host integration: the request filter middleware.
//!
//! Runs in front of every route. The decision is made on the raw request
//! path (`Uri::path`, no query string, no normalization) against the snapshot
//! that is current when the request arrives.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use urlguard_core::Decision;

use crate::app_state::AppState;

/// Install the filter over every route (and the fallback) of `router`.
///
/// Call once at startup, after all routes are registered: routes added
/// after this call are not filtered.
pub fn install<S>(router: Router<S>, state: AppState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(state, url_filter))
}

pub async fn url_filter(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let principal = app.identity().principal(req.headers()).await;
    let snapshot = app.rule_source().snapshot();

    let started = Instant::now();
    let decision = snapshot.decide(req.uri().path(), &principal);

    let metrics = app.metrics();
    metrics.evaluation_duration.observe(&[], started.elapsed());

    match decision {
        Decision::Block { rule } => {
            metrics.decisions.inc(&[("outcome", "block")]);
            tracing::info!(path = %req.uri().path(), %principal, rule, "request blocked");
            StatusCode::FORBIDDEN.into_response()
        }
        Decision::Allow => {
            metrics.decisions.inc(&[("outcome", "allow")]);
            tracing::debug!(path = %req.uri().path(), %principal, "request allowed");
            next.run(req).await
        }
    }
}
