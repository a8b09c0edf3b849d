//! JSON bodies exchanged with the flatshare server.
//!
//! Amounts are integer cents (`*_minor`), dates are `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod flatmate {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum UserRole {
        Admin,
        #[default]
        Member,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FlatmateNew {
        pub name: String,
        pub email: Option<String>,
        #[serde(default)]
        pub role: UserRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FlatmateCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FlatmateView {
        pub id: Uuid,
        pub name: String,
        pub email: Option<String>,
        pub role: UserRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FlatmateList {
        pub flatmates: Vec<FlatmateView>,
    }
}

pub mod schedule {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleNew {
        /// Must be >= 0.
        pub weekly_amount_minor: i64,
        pub start_date: NaiveDate,
        /// Inclusive; open-ended when absent.
        pub end_date: Option<NaiveDate>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleEnd {
        pub end_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub weekly_amount_minor: i64,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleList {
        pub schedules: Vec<ScheduleView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MatchType {
        RentPayment,
        Expense,
        Transfer,
        #[default]
        Unmatched,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Signed: positive is money in, negative money out. Must not be 0.
        pub amount_minor: i64,
        pub date: NaiveDate,
        #[serde(default)]
        pub description: String,
        pub category: Option<String>,
        pub user_id: Option<Uuid>,
        #[serde(default)]
        pub match_type: MatchType,
        /// Within `[0, 1]`.
        pub match_confidence: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionMatch {
        pub user_id: Option<Uuid>,
        pub match_type: MatchType,
        pub match_confidence: Option<f64>,
    }

    /// Query string of `GET /transactions`. Dates are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub user_id: Option<Uuid>,
        pub match_type: Option<MatchType>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub user_id: Option<Uuid>,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub description: String,
        pub category: Option<String>,
        pub match_type: MatchType,
        pub match_confidence: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WeeklyObligationView {
        pub week_start: NaiveDate,
        pub week_end: NaiveDate,
        pub due_date: NaiveDate,
        pub amount_due_minor: i64,
        pub amount_paid_minor: i64,
        pub balance_minor: i64,
        pub transactions: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FlatmateBalanceView {
        pub user_id: Uuid,
        pub name: String,
        pub total_due_minor: i64,
        pub total_paid_minor: i64,
        pub balance_minor: i64,
        /// Rent counted in `total_paid_minor` that no week was credited with.
        pub unassigned_paid_minor: i64,
        pub weekly_breakdown: Vec<WeeklyObligationView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HouseholdSummaryView {
        pub from: NaiveDate,
        pub to: NaiveDate,
        pub total_due_minor: i64,
        pub total_paid_minor: i64,
        pub total_balance_minor: i64,
        pub flatmates: Vec<FlatmateBalanceView>,
    }
}

pub mod spending {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendView {
        pub category: String,
        pub total_minor: i64,
        pub share: f64,
        pub transactions: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingReportView {
        pub from: NaiveDate,
        pub to: NaiveDate,
        pub total_spent_minor: i64,
        pub weekly_burn_rate_minor: i64,
        pub categories: Vec<CategorySpendView>,
    }
}
