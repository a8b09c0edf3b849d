//! Payment schedule API endpoints

use api_types::schedule::{ScheduleCreated, ScheduleEnd, ScheduleList, ScheduleNew, ScheduleView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::MoneyCents;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(schedule: engine::PaymentSchedule) -> ScheduleView {
    ScheduleView {
        id: schedule.id,
        user_id: schedule.user_id,
        weekly_amount_minor: schedule.weekly_amount.cents(),
        start_date: schedule.start_date,
        end_date: schedule.end_date,
        note: schedule.note,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ScheduleList>, ServerError> {
    if state.engine.user(user_id).await?.is_none() {
        return Err(ServerError::NotFound(format!("user {user_id}")));
    }
    let schedules = state
        .engine
        .schedules_for(user_id)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(ScheduleList { schedules }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ScheduleNew>,
) -> Result<(StatusCode, Json<ScheduleCreated>), ServerError> {
    let id = state
        .engine
        .add_schedule(
            user_id,
            MoneyCents::new(payload.weekly_amount_minor),
            payload.start_date,
            payload.end_date,
            payload.note.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ScheduleCreated { id })))
}

pub async fn end(
    State(state): State<ServerState>,
    Path(schedule_id): Path<Uuid>,
    Json(payload): Json<ScheduleEnd>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .end_schedule(schedule_id, payload.end_date)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
