use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod balances;
mod flatmates;
mod schedules;
mod server;
mod spending;
mod transactions;

pub mod types {
    pub mod flatmate {
        pub use api_types::flatmate::{
            FlatmateCreated, FlatmateList, FlatmateNew, FlatmateView, UserRole,
        };
    }

    pub mod schedule {
        pub use api_types::schedule::{
            ScheduleCreated, ScheduleEnd, ScheduleList, ScheduleNew, ScheduleView,
        };
    }

    pub mod transaction {
        pub use api_types::transaction::{
            MatchType, TransactionCreated, TransactionList, TransactionMatch, TransactionNew,
            TransactionQuery, TransactionView,
        };
    }

    pub mod balance {
        pub use api_types::balance::{
            FlatmateBalanceView, HouseholdSummaryView, WeeklyObligationView,
        };
    }

    pub mod spending {
        pub use api_types::spending::{CategorySpendView, SpendingReportView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    NotFound(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidSchedule(_)
        | EngineError::InvalidMatch(_)
        | EngineError::InvalidRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
