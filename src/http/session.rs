use axum::{Json, extract::State};

use crate::SessionState;

use super::{ApiError, DebugApi};

/// GET /state
pub(super) async fn state(State(api): State<DebugApi>) -> Json<SessionState> {
    Json(api.session.state())
}

/// POST /step
///
/// 409 unless the session is paused; re-fetch `/state` before retrying.
pub(super) async fn step(State(api): State<DebugApi>) -> Result<Json<SessionState>, ApiError> {
    api.session.step()?;
    Ok(Json(api.session.state()))
}

/// POST /continue
pub(super) async fn continue_(State(api): State<DebugApi>) -> Result<Json<SessionState>, ApiError> {
    api.session.continue_()?;
    Ok(Json(api.session.state()))
}

/// POST /reset
pub(super) async fn reset(State(api): State<DebugApi>) -> Json<SessionState> {
    api.session.reset();
    Json(api.session.state())
}
