use axum::{
    Router,
    routing::{get, post},
};
use chrono::{Local, NaiveDate};

use std::sync::Arc;

use crate::{balances, flatmates, schedules, spending, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

impl ServerState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Date balances are computed against.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/flatmates", get(flatmates::list).post(flatmates::create))
        .route(
            "/flatmates/{user_id}/schedules",
            get(schedules::list).post(schedules::create),
        )
        .route("/schedules/{schedule_id}/end", post(schedules::end))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{transaction_id}/match",
            post(transactions::match_tx),
        )
        .route("/balances", get(balances::household))
        .route("/balances/{user_id}", get(balances::flatmate))
        .route("/spending", get(spending::report))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(engine))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
