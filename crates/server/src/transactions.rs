//! Transactions API endpoints

use api_types::transaction::{
    MatchType as ApiMatchType, TransactionCreated, TransactionList, TransactionMatch,
    TransactionNew, TransactionQuery, TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{MatchType, MoneyCents, NewTransaction, TransactionFilter};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_match_type(match_type: MatchType) -> ApiMatchType {
    match match_type {
        MatchType::RentPayment => ApiMatchType::RentPayment,
        MatchType::Expense => ApiMatchType::Expense,
        MatchType::Transfer => ApiMatchType::Transfer,
        MatchType::Unmatched => ApiMatchType::Unmatched,
    }
}

fn parse_match_type(match_type: ApiMatchType) -> MatchType {
    match match_type {
        ApiMatchType::RentPayment => MatchType::RentPayment,
        ApiMatchType::Expense => MatchType::Expense,
        ApiMatchType::Transfer => MatchType::Transfer,
        ApiMatchType::Unmatched => MatchType::Unmatched,
    }
}

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        user_id: tx.user_id,
        amount_minor: tx.amount.cents(),
        date: tx.date,
        description: tx.description,
        category: tx.category,
        match_type: map_match_type(tx.match_type),
        match_confidence: tx.match_confidence,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionList>, ServerError> {
    let filter = TransactionFilter {
        from: query.from,
        to: query.to,
        user_id: query.user_id,
        match_type: query.match_type.map(parse_match_type),
    };
    let transactions = state
        .engine
        .transactions(&filter)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(TransactionList { transactions }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .record_transaction(NewTransaction {
            amount: MoneyCents::new(payload.amount_minor),
            date: payload.date,
            description: payload.description,
            category: payload.category,
            user_id: payload.user_id,
            match_type: parse_match_type(payload.match_type),
            match_confidence: payload.match_confidence,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn match_tx(
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<TransactionMatch>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .match_transaction(
            transaction_id,
            payload.user_id,
            parse_match_type(payload.match_type),
            payload.match_confidence,
        )
        .await?;

    Ok(Json(view(tx)))
}
