use chrono::NaiveDate;
use futures::future::try_join_all;
use uuid::Uuid;

use crate::{
    AnalysisWindow, Flatmate, FlatmateBalance, HouseholdSummary, MatchType, ResultEngine,
    SpendingReport, Transaction,
};

use super::{Engine, TransactionFilter};

impl Engine {
    /// Rent ledger of one flatmate over the analysis window ending `today`.
    ///
    /// Returns `None` when the user does not exist.
    pub async fn flatmate_balance(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<Option<FlatmateBalance>> {
        let Some(flatmate) = self.user(user_id).await? else {
            tracing::debug!(user = %user_id, "balance requested for unknown user");
            return Ok(None);
        };
        let window = self.analysis.window(today);
        self.reconcile(&flatmate, window, today).await.map(Some)
    }

    /// Ledgers of the given flatmates, in the given order. Unknown ids are
    /// skipped.
    pub async fn flatmate_balances(
        &self,
        user_ids: &[Uuid],
        today: NaiveDate,
    ) -> ResultEngine<Vec<FlatmateBalance>> {
        let balances =
            try_join_all(user_ids.iter().map(|id| self.flatmate_balance(*id, today))).await?;
        Ok(balances.into_iter().flatten().collect())
    }

    /// Ledgers of every flatmate (administrators included) and their totals.
    pub async fn household_summary(&self, today: NaiveDate) -> ResultEngine<HouseholdSummary> {
        let flatmates = self.users().await?;
        let window = self.analysis.window(today);
        let balances = try_join_all(
            flatmates
                .iter()
                .map(|flatmate| self.reconcile(flatmate, window, today)),
        )
        .await?;

        let summary = HouseholdSummary::from_balances(window, balances);
        tracing::info!(
            flatmates = summary.flatmates.len(),
            "household balance {} ({} paid of {} due)",
            summary.total_balance,
            summary.total_paid,
            summary.total_due
        );
        Ok(summary)
    }

    /// Expense breakdown and burn rate over the analysis window ending `today`.
    pub async fn spending_report(&self, today: NaiveDate) -> ResultEngine<SpendingReport> {
        let window = self.analysis.window(today);
        let expenses = self
            .transactions_in(window, None, MatchType::Expense)
            .await?;
        Ok(SpendingReport::calculate(&expenses, window))
    }

    async fn reconcile(
        &self,
        flatmate: &Flatmate,
        window: AnalysisWindow,
        today: NaiveDate,
    ) -> ResultEngine<FlatmateBalance> {
        let schedules = self.schedules_for(flatmate.id).await?;
        let payments = self
            .transactions_in(window, Some(flatmate.id), MatchType::RentPayment)
            .await?;
        Ok(FlatmateBalance::calculate(
            flatmate, &schedules, &payments, window, today,
        ))
    }

    async fn transactions_in(
        &self,
        window: AnalysisWindow,
        user_id: Option<Uuid>,
        match_type: MatchType,
    ) -> ResultEngine<Vec<Transaction>> {
        // A start date configured in the future leaves nothing to analyse.
        if window.from > window.to {
            return Ok(Vec::new());
        }
        self.transactions(&TransactionFilter {
            from: Some(window.from),
            to: Some(window.to),
            user_id,
            match_type: Some(match_type),
        })
        .await
    }
}
