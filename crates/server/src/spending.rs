//! Spending dashboard endpoint

use api_types::spending::{CategorySpendView, SpendingReportView};
use axum::{Json, extract::State};

use crate::{
    ServerError,
    server::{ServerState, today},
};

/// Expense breakdown by category and weekly burn rate
pub async fn report(
    State(state): State<ServerState>,
) -> Result<Json<SpendingReportView>, ServerError> {
    let report = state.engine.spending_report(today()).await?;

    Ok(Json(SpendingReportView {
        from: report.window.from,
        to: report.window.to,
        total_spent_minor: report.total_spent.cents(),
        weekly_burn_rate_minor: report.weekly_burn_rate.cents(),
        categories: report
            .categories
            .into_iter()
            .map(|c| CategorySpendView {
                category: c.category,
                total_minor: c.total.cents(),
                share: c.share,
                transactions: c.transactions,
            })
            .collect(),
    }))
}
