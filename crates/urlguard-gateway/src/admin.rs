//! Rule administration API.
//!
//! `GET {prefix}/rules` shows the live snapshot, `PUT {prefix}/rules`
//! replaces it. Writes are strict: a sequence containing any pattern that
//! does not compile is rejected and the live snapshot is kept. These routes
//! sit behind the filter like any other route.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use urlguard_core::error::UrlGuardError;
use urlguard_core::{PatternDiagnostic, Rule};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::store::RuleSource;

#[derive(Debug, Serialize)]
pub struct RulesView {
    pub version: u64,
    pub rules: Vec<Rule>,
    pub diagnostics: Vec<PatternDiagnostic>,
}

pub fn routes(prefix: &str) -> Router<AppState> {
    Router::new().route(
        &format!("{prefix}/rules"),
        get(get_rules).put(put_rules),
    )
}

fn view(app: &AppState) -> RulesView {
    let store = app.rules();
    let version = store.version();
    let snap = store.snapshot();
    RulesView {
        version,
        rules: snap.rules().to_vec(),
        diagnostics: snap.diagnostics().to_vec(),
    }
}

pub async fn get_rules(State(app): State<AppState>) -> Json<RulesView> {
    Json(view(&app))
}

pub async fn put_rules(
    State(app): State<AppState>,
    body: Result<Json<Vec<Rule>>, JsonRejection>,
) -> Result<Json<RulesView>, ApiError> {
    let metrics = app.metrics();
    let Json(rules) = body.map_err(|e| {
        metrics.rule_publishes.inc(&[("result", "rejected")]);
        UrlGuardError::BadRequest(format!("invalid rules body: {}", e.body_text()))
    })?;

    match app.rules().publish_strict(rules) {
        Ok(version) => {
            metrics.rule_publishes.inc(&[("result", "ok")]);
            tracing::info!(version, "rules replaced via admin api");
            Ok(Json(view(&app)))
        }
        Err(e) => {
            metrics.rule_publishes.inc(&[("result", "rejected")]);
            tracing::warn!(error = %e, "rule update rejected");
            Err(e.into())
        }
    }
}
