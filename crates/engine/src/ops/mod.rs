use sea_orm::DatabaseConnection;

use crate::{AnalysisConfig, EngineError, ResultEngine};

mod balances;
mod schedules;
mod transactions;
mod users;

pub use transactions::{NewTransaction, TransactionFilter};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    analysis: AnalysisConfig,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Analysis settings every reconciliation runs with.
    pub fn analysis(&self) -> AnalysisConfig {
        self.analysis
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed)
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    analysis: AnalysisConfig,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the analysis window settings (defaults to the 180 day lookback).
    pub fn analysis(mut self, analysis: AnalysisConfig) -> EngineBuilder {
        self.analysis = analysis;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        match self.analysis.start_date {
            Some(start) => tracing::info!("analysis window starts on {start}"),
            None => tracing::info!("analysis window uses the default lookback"),
        }
        Ok(Engine {
            database: self.database,
            analysis: self.analysis,
        })
    }
}
