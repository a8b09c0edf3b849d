//! Per-flatmate rent ledger.
//!
//! Walks the analysis window week by week, charges each week the rate of the
//! schedule in force and credits it with the rent payments that fall inside
//! its payment window. A payment is credited to at most one week: weeks are
//! processed oldest first and the first week that can claim a payment keeps
//! it.
//!
//! `total_paid` is the sum of every rent payment in the window, whether or not
//! a week claimed it, so it can exceed the sum of the weekly `amount_paid`.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AnalysisWindow, Flatmate, MoneyCents, PaymentSchedule, Transaction, calendar,
    schedules::weekly_amount_for,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyObligation {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub due_date: NaiveDate,
    pub amount_due: MoneyCents,
    pub amount_paid: MoneyCents,
    /// `amount_paid - amount_due`: negative means arrears.
    pub balance: MoneyCents,
    /// Ids of the payments credited to this week.
    pub transactions: Vec<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatmateBalance {
    pub user_id: Uuid,
    pub name: String,
    pub total_due: MoneyCents,
    pub total_paid: MoneyCents,
    /// `total_paid - total_due`.
    pub balance: MoneyCents,
    pub weekly_breakdown: Vec<WeeklyObligation>,
}

impl FlatmateBalance {
    /// Reconcile `flatmate`'s schedules against the household transactions.
    ///
    /// `transactions` may contain anything; only rent payments from this
    /// flatmate dated inside `window` are considered. Weeks whose due date is
    /// after `today` are not payable yet and are left out.
    pub fn calculate(
        flatmate: &Flatmate,
        schedules: &[PaymentSchedule],
        transactions: &[Transaction],
        window: AnalysisWindow,
        today: NaiveDate,
    ) -> Self {
        let mut payments: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.is_rent_payment_from(flatmate.id) && window.contains(tx.date))
            .collect();
        payments.sort_by_key(|tx| (tx.date, tx.id));

        let total_paid: MoneyCents = payments.iter().map(|tx| tx.amount).sum();

        let mut assigned: HashSet<Uuid> = HashSet::new();
        let mut weekly_breakdown = Vec::new();
        let mut total_due = MoneyCents::ZERO;

        for week_start in calendar::week_starts(window.from, window.to) {
            let due_date = calendar::due_date(week_start);
            if due_date > today {
                continue;
            }

            let amount_due = weekly_amount_for(schedules, week_start);
            let (from, to) = calendar::payment_window(due_date);

            let mut amount_paid = MoneyCents::ZERO;
            let mut credited = Vec::new();
            for tx in &payments {
                if tx.date < from || tx.date > to || !assigned.insert(tx.id) {
                    continue;
                }
                amount_paid += tx.amount;
                credited.push(tx.id);
            }

            total_due += amount_due;
            weekly_breakdown.push(WeeklyObligation {
                week_start,
                week_end: week_start + Days::new(6),
                due_date,
                amount_due,
                amount_paid,
                balance: amount_paid - amount_due,
                transactions: credited,
            });
        }

        tracing::debug!(
            user = %flatmate.id,
            weeks = weekly_breakdown.len(),
            unassigned = payments.len() - assigned.len(),
            "reconciled rent ledger"
        );

        Self {
            user_id: flatmate.id,
            name: flatmate.name.clone(),
            total_due,
            total_paid,
            balance: total_paid - total_due,
            weekly_breakdown,
        }
    }

    /// Rent paid in the window that no week claimed (outside every payment
    /// window, or beaten to it by an earlier week).
    pub fn unassigned_paid(&self) -> MoneyCents {
        self.total_paid - self.assigned_paid()
    }

    fn assigned_paid(&self) -> MoneyCents {
        self.weekly_breakdown.iter().map(|week| week.amount_paid).sum()
    }
}
