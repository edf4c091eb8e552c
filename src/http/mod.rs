//! HTTP adapter for the breakpoint manager and the debug session.
//!
//! Enable with the `http` feature. All routes live under `/api/v1/debug`:
//!
//! - `GET /breakpoints` - list pipeline breakpoints
//! - `POST /breakpoints` - create or replace (`{pipeline, step, condition?}`), 201
//! - `DELETE /breakpoints` - clear all, aborting every paused execution
//! - `DELETE /breakpoints/{pipeline}/{step}` - remove
//! - `PUT /breakpoints/{pipeline}/{step}/enable` and `.../disable`
//! - `GET /paused` - list paused executions
//! - `GET /paused/{id}` - inspect one
//! - `POST /paused/{id}/resume` - deliver `{action, data?}`
//! - `GET /state`, `POST /step`, `POST /continue`, `POST /reset` - session
//!
//! Malformed bodies and unknown actions are 400, unknown scopes and ids 404,
//! session commands in the wrong status 409.

mod breakpoints;
mod error;
mod paused;
mod session;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;

use crate::{BreakpointManager, DebugSession, Error};

pub use error::ApiError;

/// Route prefix of the debug API.
pub const BASE_PATH: &str = "/api/v1/debug";

/// Shared state of the debug API handlers.
#[derive(Clone)]
pub struct DebugApi {
    pub manager: Arc<BreakpointManager>,
    pub session: Arc<DebugSession>,
}

impl DebugApi {
    pub fn new(manager: Arc<BreakpointManager>, session: Arc<DebugSession>) -> Self {
        Self { manager, session }
    }
}

/// Builds the debug API router, mounted under [`BASE_PATH`].
pub fn router(api: DebugApi) -> Router {
    let routes = Router::new()
        .route(
            "/breakpoints",
            get(breakpoints::list)
                .post(breakpoints::set)
                .delete(breakpoints::clear),
        )
        .route(
            "/breakpoints/:pipeline/:step",
            axum::routing::delete(breakpoints::remove),
        )
        .route("/breakpoints/:pipeline/:step/enable", put(breakpoints::enable))
        .route("/breakpoints/:pipeline/:step/disable", put(breakpoints::disable))
        .route("/paused", get(paused::list))
        .route("/paused/:id", get(paused::get))
        .route("/paused/:id/resume", post(paused::resume))
        .route("/state", get(session::state))
        .route("/step", post(session::step))
        .route("/continue", post(session::continue_))
        .route("/reset", post(session::reset))
        .with_state(api);

    Router::new().nest(BASE_PATH, routes)
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| Error::validation(format!("invalid request body: {e}")).into())
}
