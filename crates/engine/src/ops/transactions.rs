use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, MatchType, MoneyCents, ResultEngine, Transaction,
    transactions::{self, validate_match},
};

use super::{Engine, normalize_optional_text, with_tx};

/// A bank statement line to record.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub description: String,
    pub category: Option<String>,
    /// Matched flatmate, if already known.
    pub user_id: Option<Uuid>,
    pub match_type: MatchType,
    pub match_confidence: Option<f64>,
}

/// Filters for listing transactions.
///
/// `from` and `to` are both inclusive.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub match_type: Option<MatchType>,
}

fn validate_filter(filter: &TransactionFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::InvalidRange(format!(
            "from {from} is after to {to}"
        )));
    }
    Ok(())
}

impl Engine {
    /// Record a bank transaction, optionally already matched to a flatmate.
    pub async fn record_transaction(&self, new: NewTransaction) -> ResultEngine<Uuid> {
        let description = new.description.trim().to_string();
        let tx = Transaction::new(
            new.amount,
            new.date,
            description,
            normalize_optional_text(new.category.as_deref()),
        )?
        .matched(new.user_id, new.match_type, new.match_confidence)?;

        with_tx!(self, |db_tx| {
            if let Some(user_id) = tx.user_id {
                self.require_user(&db_tx, user_id).await?;
            }
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            tracing::debug!(
                transaction = %tx.id,
                match_type = tx.match_type.as_str(),
                "recorded {} on {}",
                tx.amount,
                tx.date
            );
            Ok(tx.id)
        })
    }

    /// Set (or clear) the flatmate and classification of a transaction.
    pub async fn match_transaction(
        &self,
        transaction_id: Uuid,
        user_id: Option<Uuid>,
        match_type: MatchType,
        confidence: Option<f64>,
    ) -> ResultEngine<Transaction> {
        validate_match(user_id, match_type, confidence)?;

        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound(format!("transaction {transaction_id}"))
                })?;
            if let Some(user_id) = user_id {
                self.require_user(&db_tx, user_id).await?;
            }

            let mut active: transactions::ActiveModel = model.into();
            active.user_id = ActiveValue::Set(user_id);
            active.match_type = ActiveValue::Set(match_type.as_str().to_string());
            active.match_confidence = ActiveValue::Set(confidence);
            let updated = active.update(&db_tx).await?;
            tracing::info!(
                transaction = %transaction_id,
                match_type = match_type.as_str(),
                "transaction matched"
            );
            Transaction::try_from(updated)
        })
    }

    /// Transactions matching `filter`, oldest first.
    pub async fn transactions(&self, filter: &TransactionFilter) -> ResultEngine<Vec<Transaction>> {
        validate_filter(filter)?;

        let mut query = transactions::Entity::find();
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::OccurredOn.lte(to));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(transactions::Column::UserId.eq(user_id));
        }
        if let Some(match_type) = filter.match_type {
            query = query.filter(transactions::Column::MatchType.eq(match_type.as_str()));
        }

        query
            .order_by_asc(transactions::Column::OccurredOn)
            .order_by_asc(transactions::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}
