use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{EngineError, Flatmate, ResultEngine, UserRole, users};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Register a flatmate. Names are unique (case-insensitive).
    pub async fn create_user(
        &self,
        name: &str,
        email: Option<&str>,
        role: UserRole,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "user")?;
        let user = Flatmate {
            id: Uuid::new_v4(),
            name,
            email: normalize_optional_text(email),
            role,
        };

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(user.name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(user.name));
            }

            users::ActiveModel::from(&user).insert(&db_tx).await?;
            tracing::info!(user = %user.id, role = user.role.as_str(), "created flatmate");
            Ok(user.id)
        })
    }

    /// Every flatmate, administrators included, ordered by name.
    pub async fn users(&self) -> ResultEngine<Vec<Flatmate>> {
        users::Entity::find()
            .order_by_asc(users::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Flatmate::try_from)
            .collect()
    }

    /// Look up a flatmate; `None` when the id is unknown.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<Option<Flatmate>> {
        users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .map(Flatmate::try_from)
            .transpose()
    }

    pub(super) async fn require_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultEngine<Flatmate> {
        let model = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {user_id}")))?;
        Flatmate::try_from(model)
    }
}
