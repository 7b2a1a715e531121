use chrono::Utc;
use lingo_entity::session::{Column, Entity as SessionEntity, Model as Session};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

pub struct Query;

impl Query {
    /// Looks up a session that is active and not yet expired. Expiry is
    /// enforced lazily here; no sweeper job is needed for correctness.
    pub async fn find_valid<C: ConnectionTrait>(conn: &C, token: &str) -> Result<Option<Session>, DbErr> {
        SessionEntity::find_by_id(token)
            .filter(Column::IsActive.eq(true))
            .filter(Column::ExpiresAt.gt(Utc::now().naive_utc()))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn std::error::Error, "error finding session by token");
            })
    }
}
