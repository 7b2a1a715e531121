use lingo_entity::user::{Column, Entity as UserEntity, Model as User};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<User>, DbErr> {
        UserEntity::find_by_id(id).one(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn std::error::Error, "error loading user");
        })
    }

    pub async fn find_by_username<C: ConnectionTrait>(conn: &C, username: &str) -> Result<Option<User>, DbErr> {
        UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn std::error::Error, "error loading user by name");
            })
    }

    /// True when `username` belongs to a user other than `exclude`.
    pub async fn username_taken<C: ConnectionTrait>(
        conn: &C,
        username: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let existing = Self::find_by_username(conn, username).await?;
        Ok(match (existing, exclude) {
            (Some(user), Some(id)) => user.id != id,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }
}
