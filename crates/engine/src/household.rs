//! Household-wide rollup of the flatmate ledgers.

use serde::{Deserialize, Serialize};

use crate::{AnalysisWindow, FlatmateBalance, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdSummary {
    pub window: AnalysisWindow,
    pub total_due: MoneyCents,
    pub total_paid: MoneyCents,
    pub total_balance: MoneyCents,
    pub flatmates: Vec<FlatmateBalance>,
}

impl HouseholdSummary {
    /// Sum the per-flatmate totals. Flatmates keep the order they came in.
    pub fn from_balances(window: AnalysisWindow, flatmates: Vec<FlatmateBalance>) -> Self {
        let total_due = flatmates.iter().map(|f| f.total_due).sum();
        let total_paid = flatmates.iter().map(|f| f.total_paid).sum();
        let total_balance = flatmates.iter().map(|f| f.balance).sum();
        Self {
            window,
            total_due,
            total_paid,
            total_balance,
            flatmates,
        }
    }
}
