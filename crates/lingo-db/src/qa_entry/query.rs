use lingo_entity::qa_entry::{Column, Entity as QaEntryEntity, Model as QaEntry};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn find_by_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<Vec<QaEntry>, DbErr> {
        QaEntryEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CreatedAt)
            .all(conn)
            .await
    }
}
