//! Bank transactions.
//!
//! A `Transaction` is a single bank statement line. Matching attaches it to a
//! flatmate and says what it is; only positive `rent_payment` lines count as
//! rent received.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    RentPayment,
    Expense,
    Transfer,
    #[default]
    Unmatched,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RentPayment => "rent_payment",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::Unmatched => "unmatched",
        }
    }
}

impl TryFrom<&str> for MatchType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "rent_payment" => Ok(Self::RentPayment),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            "unmatched" => Ok(Self::Unmatched),
            other => Err(EngineError::InvalidMatch(format!(
                "invalid match type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub description: String,
    pub category: Option<String>,
    pub match_type: MatchType,
    pub match_confidence: Option<f64>,
}

impl Transaction {
    pub fn new(
        amount: MoneyCents,
        date: NaiveDate,
        description: String,
        category: Option<String>,
    ) -> ResultEngine<Self> {
        if amount.is_zero() {
            return Err(EngineError::InvalidAmount(
                "transaction amount must not be 0".to_string(),
            ));
        }
        let amount = amount.ensure_bounded()?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: None,
            amount,
            date,
            description,
            category,
            match_type: MatchType::Unmatched,
            match_confidence: None,
        })
    }

    /// Attach the transaction to `user_id` as `match_type`.
    pub fn matched(
        mut self,
        user_id: Option<Uuid>,
        match_type: MatchType,
        confidence: Option<f64>,
    ) -> ResultEngine<Self> {
        validate_match(user_id, match_type, confidence)?;
        self.user_id = user_id;
        self.match_type = match_type;
        self.match_confidence = confidence;
        Ok(self)
    }

    /// Money received from a flatmate for rent.
    pub fn is_rent_payment(&self) -> bool {
        self.match_type == MatchType::RentPayment && self.amount.is_positive()
    }

    /// Rent received from `user_id`.
    pub fn is_rent_payment_from(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id) && self.is_rent_payment()
    }

    /// Household spending (outgoing money classified as an expense).
    pub fn is_expense(&self) -> bool {
        self.match_type == MatchType::Expense && self.amount.is_negative()
    }
}

/// A rent payment always belongs to a flatmate; confidence lies in `[0, 1]`.
pub(crate) fn validate_match(
    user_id: Option<Uuid>,
    match_type: MatchType,
    confidence: Option<f64>,
) -> ResultEngine<()> {
    if let Some(value) = confidence
        && !(0.0..=1.0).contains(&value)
    {
        return Err(EngineError::InvalidMatch(format!(
            "match confidence must be within [0, 1], got {value}"
        )));
    }
    if match_type == MatchType::RentPayment && user_id.is_none() {
        return Err(EngineError::InvalidMatch(
            "a rent payment must be matched to a flatmate".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub amount_minor: i64,
    pub occurred_on: Date,
    pub description: String,
    pub category: Option<String>,
    pub match_type: String,
    pub match_confidence: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            user_id: ActiveValue::Set(tx.user_id),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            occurred_on: ActiveValue::Set(tx.date),
            description: ActiveValue::Set(tx.description.clone()),
            category: ActiveValue::Set(tx.category.clone()),
            match_type: ActiveValue::Set(tx.match_type.as_str().to_string()),
            match_confidence: ActiveValue::Set(tx.match_confidence),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            amount: MoneyCents::new(model.amount_minor),
            date: model.occurred_on,
            description: model.description,
            category: model.category,
            match_type: MatchType::try_from(model.match_type.as_str())?,
            match_confidence: model.match_confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(amount: i64) -> Transaction {
        Transaction::new(
            MoneyCents::new(amount),
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            "BANK TRANSFER".to_string(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn only_positive_rent_payments_count_as_rent() {
        let user = Uuid::new_v4();
        let paid = tx(250_00)
            .matched(Some(user), MatchType::RentPayment, Some(0.9))
            .unwrap();
        assert!(paid.is_rent_payment_from(user));
        assert!(!paid.is_rent_payment_from(Uuid::new_v4()));

        let refund = tx(-250_00)
            .matched(Some(user), MatchType::RentPayment, None)
            .unwrap();
        assert!(!refund.is_rent_payment());

        let bill = tx(250_00).matched(Some(user), MatchType::Transfer, None).unwrap();
        assert!(!bill.is_rent_payment());
    }

    #[test]
    fn new_transactions_start_unmatched() {
        let t = tx(-42_10);
        assert_eq!(t.match_type, MatchType::Unmatched);
        assert_eq!(t.user_id, None);
        assert!(!t.is_expense());
    }

    #[test]
    fn zero_amount_rejected() {
        assert!(matches!(
            Transaction::new(MoneyCents::ZERO, NaiveDate::MIN, String::new(), None),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn amount_beyond_limit_rejected() {
        assert!(matches!(
            Transaction::new(MoneyCents::new(i64::MAX / 2 + 1), NaiveDate::MIN, String::new(), None),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(Transaction::new(-MoneyCents::MAX, NaiveDate::MIN, String::new(), None).is_ok());
    }

    #[test]
    fn rent_payment_needs_a_flatmate() {
        assert!(matches!(
            tx(250_00).matched(None, MatchType::RentPayment, None),
            Err(EngineError::InvalidMatch(_))
        ));
        assert!(tx(250_00).matched(None, MatchType::Transfer, None).is_ok());
    }

    #[test]
    fn confidence_outside_unit_interval_rejected() {
        assert!(matches!(
            tx(10).matched(None, MatchType::Expense, Some(1.5)),
            Err(EngineError::InvalidMatch(_))
        ));
        assert!(tx(10).matched(None, MatchType::Expense, Some(1.0)).is_ok());
    }

    #[test]
    fn match_type_round_trips_through_storage_names() {
        for kind in [
            MatchType::RentPayment,
            MatchType::Expense,
            MatchType::Transfer,
            MatchType::Unmatched,
        ] {
            assert_eq!(MatchType::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(MatchType::try_from("rent").is_err());
    }
}
