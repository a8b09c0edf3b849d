//! Flatmate API endpoints

use api_types::flatmate::{FlatmateCreated, FlatmateList, FlatmateNew, FlatmateView, UserRole};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

fn map_role(role: engine::UserRole) -> UserRole {
    match role {
        engine::UserRole::Admin => UserRole::Admin,
        engine::UserRole::Member => UserRole::Member,
    }
}

pub(crate) fn view(flatmate: engine::Flatmate) -> FlatmateView {
    FlatmateView {
        id: flatmate.id,
        name: flatmate.name,
        email: flatmate.email,
        role: map_role(flatmate.role),
    }
}

/// Every flatmate of the household
pub async fn list(State(state): State<ServerState>) -> Result<Json<FlatmateList>, ServerError> {
    let flatmates = state.engine.users().await?.into_iter().map(view).collect();
    Ok(Json(FlatmateList { flatmates }))
}

/// Register a new flatmate
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FlatmateNew>,
) -> Result<(StatusCode, Json<FlatmateCreated>), ServerError> {
    let role = match payload.role {
        UserRole::Admin => engine::UserRole::Admin,
        UserRole::Member => engine::UserRole::Member,
    };
    let id = state
        .engine
        .create_user(&payload.name, payload.email.as_deref(), role)
        .await?;

    Ok((StatusCode::CREATED, Json(FlatmateCreated { id })))
}
