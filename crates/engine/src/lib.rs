//! Rent reconciliation engine for a shared household.
//!
//! Flatmates owe a weekly amount set by their [`PaymentSchedule`]s; bank
//! [`Transaction`]s matched as rent payments are credited against the weeks
//! they fall in. The pure calculations live in [`calendar`],
//! [`FlatmateBalance::calculate`], [`HouseholdSummary`] and
//! [`SpendingReport`]; [`Engine`] loads the data through sea-orm and runs
//! them.

pub use analysis::{AnalysisConfig, AnalysisWindow};
pub use error::EngineError;
pub use household::HouseholdSummary;
pub use ledger::{FlatmateBalance, WeeklyObligation};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, NewTransaction, TransactionFilter};
pub use schedules::{PaymentSchedule, weekly_amount_for};
pub use spending::{CategorySpend, SpendingReport};
pub use transactions::{MatchType, Transaction};
pub use users::{Flatmate, UserRole};

pub mod calendar;

mod analysis;
mod error;
mod household;
mod ledger;
mod money;
mod ops;
mod schedules;
mod spending;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
