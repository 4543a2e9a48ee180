//! Router for the schedule API

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json},
    routing::post,
};
use http::{HeaderValue, header};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::planner::{
    ParseMode, PlannedSchedule, ScheduleRequest, ScheduleTextParser, ics, plan_schedule,
};

type SharedState = Arc<AppState>;

async fn plan(state: &AppState, body: public::ScheduleRequest) -> Result<PlannedSchedule, ApiError> {
    let request = ScheduleRequest::new(&body.tasks, &body.preferences, body.start_time.as_deref());

    let timezone = state.config.timezone;
    let parser = match body.date {
        Some(date) => ScheduleTextParser::new(date, timezone),
        None => ScheduleTextParser::today(timezone),
    };
    let mode = if body.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    let planned = plan_schedule(state.service.as_ref(), &request, &parser.mode(mode)).await?;
    Ok(planned)
}

async fn schedule_handler(
    State(state): State<SharedState>,
    Json(body): Json<public::ScheduleRequest>,
) -> Result<Json<public::ScheduleResponse>, ApiError> {
    let planned = plan(&state, body).await?;
    Ok(Json(public::ScheduleResponse::from(&planned)))
}

async fn ics_handler(
    State(state): State<SharedState>,
    Json(body): Json<public::ScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let planned = plan(&state, body).await?;
    let content_type = format!("{}; charset=utf-8", ics::CONTENT_TYPE);
    let disposition = format!("attachment; filename=\"{}\"", ics::DEFAULT_FILE_NAME);

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_str(&content_type)?),
            (header::CONTENT_DISPOSITION, HeaderValue::from_str(&disposition)?),
        ],
        ics::to_bytes(&planned.events),
    ))
}

/// Create the schedule router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(schedule_handler))
        .route("/ics", post(ics_handler))
}
