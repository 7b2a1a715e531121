use lingo_entity::quiz::{Column, Entity as QuizEntity, Model as Quiz};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

pub struct Query;

impl Query {
    /// All quizzes of a user in submission order (oldest first).
    pub async fn find_chronological<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<Vec<Quiz>, DbErr> {
        QuizEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CreatedAt)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn std::error::Error, "error loading quizzes");
            })
    }

    /// The user's most recent quizzes, newest first.
    pub async fn find_recent<C: ConnectionTrait>(conn: &C, user_id: Uuid, limit: u64) -> Result<Vec<Quiz>, DbErr> {
        QuizEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn std::error::Error, "error loading recent quizzes");
            })
    }
}
