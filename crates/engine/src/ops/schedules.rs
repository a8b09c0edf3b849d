use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, PaymentSchedule, ResultEngine,
    schedules::{self, validate_interval},
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Add a weekly rent schedule for `user_id`.
    ///
    /// Overlapping schedules are allowed: the one starting last takes over
    /// from its start date.
    pub async fn add_schedule(
        &self,
        user_id: Uuid,
        weekly_amount: MoneyCents,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        note: Option<&str>,
    ) -> ResultEngine<Uuid> {
        let schedule = PaymentSchedule::new(
            user_id,
            weekly_amount,
            start_date,
            end_date,
            normalize_optional_text(note),
        )?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            schedules::ActiveModel::from(&schedule).insert(&db_tx).await?;
            tracing::info!(
                user = %user_id,
                schedule = %schedule.id,
                "added {} weekly from {start_date}",
                schedule.weekly_amount
            );
            Ok(schedule.id)
        })
    }

    /// Close a schedule on `end_date` (inclusive).
    pub async fn end_schedule(&self, schedule_id: Uuid, end_date: NaiveDate) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = schedules::Entity::find_by_id(schedule_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("schedule {schedule_id}")))?;
            validate_interval(model.start_date, Some(end_date))?;

            let active = schedules::ActiveModel {
                id: ActiveValue::Set(schedule_id),
                end_date: ActiveValue::Set(Some(end_date)),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Schedules of a flatmate, oldest start first.
    pub async fn schedules_for(&self, user_id: Uuid) -> ResultEngine<Vec<PaymentSchedule>> {
        let rows = schedules::Entity::find()
            .filter(schedules::Column::UserId.eq(user_id))
            .order_by_asc(schedules::Column::StartDate)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(PaymentSchedule::from).collect())
    }
}
