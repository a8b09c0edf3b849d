//! Payment schedules.
//!
//! A schedule sets the weekly rent a flatmate owes from `start_date` until
//! `end_date` (inclusive, open-ended when `None`). Schedules of the same user
//! may overlap: the one that started most recently wins.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weekly_amount: MoneyCents,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl PaymentSchedule {
    pub fn new(
        user_id: Uuid,
        weekly_amount: MoneyCents,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        if weekly_amount.is_negative() {
            return Err(EngineError::InvalidSchedule(
                "weekly amount must be >= 0".to_string(),
            ));
        }
        let weekly_amount = weekly_amount.ensure_bounded()?;
        validate_interval(start_date, end_date)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            weekly_amount,
            start_date,
            end_date,
            note,
        })
    }

    /// Whether the schedule is in force on `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end| date <= end)
    }
}

pub(crate) fn validate_interval(start: NaiveDate, end: Option<NaiveDate>) -> ResultEngine<()> {
    if let Some(end) = end
        && end < start
    {
        return Err(EngineError::InvalidSchedule(format!(
            "end date {end} is before start date {start}"
        )));
    }
    Ok(())
}

/// Weekly rate owed for the week starting on `week_start`.
///
/// Among the schedules covering `week_start`, the latest `start_date` wins.
/// Returns zero when no schedule applies.
pub fn weekly_amount_for(schedules: &[PaymentSchedule], week_start: NaiveDate) -> MoneyCents {
    schedules
        .iter()
        .filter(|schedule| schedule.covers(week_start))
        .max_by_key(|schedule| schedule.start_date)
        .map_or(MoneyCents::ZERO, |schedule| schedule.weekly_amount)
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub weekly_amount_minor: i64,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PaymentSchedule> for ActiveModel {
    fn from(schedule: &PaymentSchedule) -> Self {
        Self {
            id: ActiveValue::Set(schedule.id),
            user_id: ActiveValue::Set(schedule.user_id),
            weekly_amount_minor: ActiveValue::Set(schedule.weekly_amount.cents()),
            start_date: ActiveValue::Set(schedule.start_date),
            end_date: ActiveValue::Set(schedule.end_date),
            note: ActiveValue::Set(schedule.note.clone()),
        }
    }
}

impl From<Model> for PaymentSchedule {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            weekly_amount: MoneyCents::new(model.weekly_amount_minor),
            start_date: model.start_date,
            end_date: model.end_date,
            note: model.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(amount: i64, start: NaiveDate, end: Option<NaiveDate>) -> PaymentSchedule {
        PaymentSchedule::new(Uuid::nil(), MoneyCents::new(amount), start, end, None).unwrap()
    }

    #[test]
    fn latest_start_wins_on_overlap() {
        let schedules = vec![
            schedule(200_00, date(2024, 1, 1), None),
            schedule(300_00, date(2024, 3, 1), None),
        ];
        assert_eq!(
            weekly_amount_for(&schedules, date(2024, 3, 4)),
            MoneyCents::new(300_00)
        );
        assert_eq!(
            weekly_amount_for(&schedules, date(2024, 2, 26)),
            MoneyCents::new(200_00)
        );
    }

    #[test]
    fn order_of_schedules_does_not_matter() {
        let schedules = vec![
            schedule(300_00, date(2024, 3, 1), None),
            schedule(200_00, date(2024, 1, 1), None),
        ];
        assert_eq!(
            weekly_amount_for(&schedules, date(2024, 3, 4)),
            MoneyCents::new(300_00)
        );
    }

    #[test]
    fn ended_schedule_falls_back_to_older_one() {
        let schedules = vec![
            schedule(200_00, date(2024, 1, 1), None),
            schedule(150_00, date(2024, 2, 1), Some(date(2024, 2, 29))),
        ];
        assert_eq!(
            weekly_amount_for(&schedules, date(2024, 2, 26)),
            MoneyCents::new(150_00)
        );
        assert_eq!(
            weekly_amount_for(&schedules, date(2024, 3, 4)),
            MoneyCents::new(200_00)
        );
    }

    #[test]
    fn end_date_is_inclusive() {
        let s = schedule(100_00, date(2024, 1, 1), Some(date(2024, 1, 8)));
        assert!(s.covers(date(2024, 1, 8)));
        assert!(!s.covers(date(2024, 1, 9)));
        assert!(!s.covers(date(2023, 12, 31)));
    }

    #[test]
    fn no_schedule_means_nothing_owed() {
        assert_eq!(weekly_amount_for(&[], date(2024, 3, 4)), MoneyCents::ZERO);
        let future = vec![schedule(100_00, date(2025, 1, 1), None)];
        assert_eq!(weekly_amount_for(&future, date(2024, 3, 4)), MoneyCents::ZERO);
    }

    #[test]
    fn rejects_inverted_interval_and_negative_rate() {
        assert!(matches!(
            PaymentSchedule::new(Uuid::nil(), MoneyCents::new(1), date(2024, 2, 1), Some(date(2024, 1, 1)), None),
            Err(EngineError::InvalidSchedule(_))
        ));
        assert!(matches!(
            PaymentSchedule::new(Uuid::nil(), MoneyCents::new(-1), date(2024, 2, 1), None, None),
            Err(EngineError::InvalidSchedule(_))
        ));
        assert!(matches!(
            PaymentSchedule::new(Uuid::nil(), MoneyCents::new(i64::MAX), date(2024, 2, 1), None, None),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
