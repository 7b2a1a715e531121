use chrono::Utc;
use lingo_entity::user::{ActiveModel, Entity as UserEntity, EnglishLevel, Model as User};
use lingo_entity::{qa_entry, quiz, session};
use sea_orm::ActiveValue::Set;
use sea_orm::prelude::*;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, TransactionTrait};
use serde_json::json;
use uuid::Uuid;

use crate::util::FlattenTransactionResultExt;

pub struct Mutation;

impl Mutation {
    pub async fn create_user<C: ConnectionTrait>(
        conn: &C,
        username: &str,
        password_hash: &str,
        password_salt: &str,
    ) -> Result<User, DbErr> {
        let user = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_owned()),
            password_hash: Set(password_hash.to_owned()),
            password_salt: Set(password_salt.to_owned()),
            english_level: Set(EnglishLevel::Beginner),
            has_completed_first_quiz: Set(false),
            total_quizzes: Set(0),
            average_score: Set(0.0),
            progress: Set(json!({})),
            quizzes_since_level_change: Set(0),
            created_at: Set(Utc::now().naive_utc()),
            last_login: Set(None),
        };
        user.insert(conn).await
    }

    pub async fn update_last_login<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<(), DbErr> {
        UserEntity::update_many()
            .col_expr(
                lingo_entity::user::Column::LastLogin,
                Expr::value(Some(Utc::now().naive_utc())),
            )
            .filter(lingo_entity::user::Column::Id.eq(user_id))
            .exec(conn)
            .await?;
        Ok(())
    }

    pub async fn update_username<C: ConnectionTrait>(conn: &C, user_id: Uuid, new_username: &str) -> Result<(), DbErr> {
        let user = ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(user_id),
            username: Set(new_username.to_owned()),
            ..Default::default()
        };
        user.update(conn).await?;
        Ok(())
    }

    pub async fn update_password<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        password_hash: &str,
        password_salt: &str,
    ) -> Result<(), DbErr> {
        let user = ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(user_id),
            password_hash: Set(password_hash.to_owned()),
            password_salt: Set(password_salt.to_owned()),
            ..Default::default()
        };
        user.update(conn).await?;
        Ok(())
    }

    /// Repairs the cached aggregate fields (quiz count, average score and
    /// per-topic progress) when the analytics aggregator finds them out of
    /// sync with the quiz records.
    pub async fn update_cached_stats<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        total_quizzes: i32,
        average_score: f64,
        progress: Json,
    ) -> Result<(), DbErr> {
        let user = ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(user_id),
            total_quizzes: Set(total_quizzes),
            average_score: Set(average_score),
            progress: Set(progress),
            has_completed_first_quiz: Set(total_quizzes >= 1),
            ..Default::default()
        };
        user.update(conn).await?;
        Ok(())
    }

    /// Deletes the user together with every owned record.
    pub async fn delete_cascade<C: ConnectionTrait + TransactionTrait>(conn: &C, user_id: Uuid) -> Result<(), DbErr> {
        conn.transaction(|txn| {
            Box::pin(async move {
                session::Entity::delete_many()
                    .filter(session::Column::UserId.eq(user_id))
                    .exec(txn)
                    .await?;
                quiz::Entity::delete_many()
                    .filter(quiz::Column::UserId.eq(user_id))
                    .exec(txn)
                    .await?;
                qa_entry::Entity::delete_many()
                    .filter(qa_entry::Column::UserId.eq(user_id))
                    .exec(txn)
                    .await?;
                UserEntity::delete_by_id(user_id).exec(txn).await?;
                Ok::<_, DbErr>(())
            })
        })
        .await
        .flatten_res()
    }
}
