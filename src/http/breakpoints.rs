use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Breakpoint, Error};

use super::{ApiError, DebugApi, parse_body};

#[derive(Debug, Deserialize)]
struct SetBreakpointRequest {
    #[serde(default)]
    pipeline: String,
    #[serde(default)]
    step: String,
    #[serde(default)]
    condition: Option<String>,
}

/// GET /breakpoints
pub(super) async fn list(State(api): State<DebugApi>) -> Json<Vec<Breakpoint>> {
    Json(api.manager.list_breakpoints())
}

/// POST /breakpoints
///
/// Creates or replaces the breakpoint for `pipeline`/`step`.
pub(super) async fn set(
    State(api): State<DebugApi>,
    body: Bytes,
) -> Result<(StatusCode, Json<Breakpoint>), ApiError> {
    let req: SetBreakpointRequest = parse_body(&body)?;
    if req.pipeline.is_empty() {
        return Err(Error::validation("pipeline is required").into());
    }
    if req.step.is_empty() {
        return Err(Error::validation("step is required").into());
    }
    let bp = api
        .manager
        .set_breakpoint(&req.pipeline, &req.step, req.condition.as_deref());
    Ok((StatusCode::CREATED, Json(bp)))
}

/// DELETE /breakpoints
///
/// Removes every breakpoint and aborts every paused execution.
pub(super) async fn clear(State(api): State<DebugApi>) -> Json<Value> {
    api.manager.clear_all();
    Json(json!({ "status": "cleared" }))
}

/// DELETE /breakpoints/:pipeline/:step
pub(super) async fn remove(
    State(api): State<DebugApi>,
    Path((pipeline, step)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    if !api.manager.remove_breakpoint(&pipeline, &step) {
        return Err(Error::breakpoint_not_found(format!("{pipeline}:{step}")).into());
    }
    Ok(Json(json!({ "status": "removed" })))
}

/// PUT /breakpoints/:pipeline/:step/enable
pub(super) async fn enable(
    State(api): State<DebugApi>,
    Path((pipeline, step)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    if !api.manager.enable_breakpoint(&pipeline, &step) {
        return Err(Error::breakpoint_not_found(format!("{pipeline}:{step}")).into());
    }
    Ok(Json(json!({ "status": "enabled" })))
}

/// PUT /breakpoints/:pipeline/:step/disable
pub(super) async fn disable(
    State(api): State<DebugApi>,
    Path((pipeline, step)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    if !api.manager.disable_breakpoint(&pipeline, &step) {
        return Err(Error::breakpoint_not_found(format!("{pipeline}:{step}")).into());
    }
    Ok(Json(json!({ "status": "disabled" })))
}
