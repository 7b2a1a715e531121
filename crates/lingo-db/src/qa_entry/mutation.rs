use chrono::Utc;
use lingo_entity::qa_entry::{ActiveModel, Model as QaEntry};
use sea_orm::ActiveValue::Set;
use sea_orm::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait};
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    pub async fn append<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        question: &str,
        context: &str,
        answer: &str,
    ) -> Result<QaEntry, DbErr> {
        let entry = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            question: Set(question.to_owned()),
            context: Set(context.to_owned()),
            answer: Set(answer.to_owned()),
            created_at: Set(Utc::now().naive_utc()),
        };
        entry.insert(conn).await
    }
}
