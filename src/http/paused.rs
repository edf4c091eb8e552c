use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Action, ContextMap, Error, PausedExecution, ResumeAction};

use super::{ApiError, DebugApi, parse_body};

#[derive(Debug, Deserialize)]
struct ResumeRequest {
    #[serde(default)]
    action: String,
    #[serde(default)]
    data: Option<ContextMap>,
}

/// GET /paused
pub(super) async fn list(State(api): State<DebugApi>) -> Json<Vec<PausedExecution>> {
    Json(api.manager.list_paused())
}

/// GET /paused/:id
pub(super) async fn get(
    State(api): State<DebugApi>,
    Path(id): Path<String>,
) -> Result<Json<PausedExecution>, ApiError> {
    api.manager
        .get_paused(&id)
        .map(Json)
        .ok_or_else(|| Error::execution_not_found(&id).into())
}

/// POST /paused/:id/resume
///
/// The request is validated before the execution is looked up, so a bad
/// action is a 400 even for an unknown id.
pub(super) async fn resume(
    State(api): State<DebugApi>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let req: ResumeRequest = parse_body(&body)?;
    let action: Action = req.action.parse()?;
    let decision = ResumeAction::new(action).with_data(req.data.unwrap_or_default());

    api.manager.resume(&id, decision)?;
    Ok(Json(json!({ "status": "resumed", "action": action })))
}
