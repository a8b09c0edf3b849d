//! Rent balance endpoints

use api_types::balance::{FlatmateBalanceView, HouseholdSummaryView, WeeklyObligationView};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, today},
};

fn week_view(week: engine::WeeklyObligation) -> WeeklyObligationView {
    WeeklyObligationView {
        week_start: week.week_start,
        week_end: week.week_end,
        due_date: week.due_date,
        amount_due_minor: week.amount_due.cents(),
        amount_paid_minor: week.amount_paid.cents(),
        balance_minor: week.balance.cents(),
        transactions: week.transactions,
    }
}

fn view(balance: engine::FlatmateBalance) -> FlatmateBalanceView {
    let unassigned_paid = balance.unassigned_paid();
    FlatmateBalanceView {
        user_id: balance.user_id,
        name: balance.name,
        total_due_minor: balance.total_due.cents(),
        total_paid_minor: balance.total_paid.cents(),
        balance_minor: balance.balance.cents(),
        unassigned_paid_minor: unassigned_paid.cents(),
        weekly_breakdown: balance.weekly_breakdown.into_iter().map(week_view).collect(),
    }
}

/// Household totals with every flatmate's ledger
pub async fn household(
    State(state): State<ServerState>,
) -> Result<Json<HouseholdSummaryView>, ServerError> {
    let summary = state.engine.household_summary(today()).await?;

    Ok(Json(HouseholdSummaryView {
        from: summary.window.from,
        to: summary.window.to,
        total_due_minor: summary.total_due.cents(),
        total_paid_minor: summary.total_paid.cents(),
        total_balance_minor: summary.total_balance.cents(),
        flatmates: summary.flatmates.into_iter().map(view).collect(),
    }))
}

/// Ledger of a single flatmate
pub async fn flatmate(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<FlatmateBalanceView>, ServerError> {
    state
        .engine
        .flatmate_balance(user_id, today())
        .await?
        .map(|balance| Json(view(balance)))
        .ok_or_else(|| ServerError::NotFound(format!("user {user_id}")))
}
