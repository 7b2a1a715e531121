use base64::Engine;
use chrono::{Duration, Utc};
use lingo_entity::session::{ActiveModel, Column, Entity as SessionEntity, Model as Session};
use ring::rand::{self, SecureRandom};
use sea_orm::ActiveValue::Set;
use sea_orm::prelude::*;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

pub struct Mutation;

fn generate_token() -> String {
    let rng = rand::SystemRandom::new();
    // 48 bytes = 384 bits of entropy, comfortably above the 192-bit floor.
    let mut bytes = [0u8; 48];
    // Filling can only fail if the system entropy source is broken.
    rng.fill(&mut bytes).expect("failed to generate random bytes");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

impl Mutation {
    pub async fn create_session<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        username: &str,
        ttl_days: i64,
    ) -> Result<Session, DbErr> {
        let now = Utc::now().naive_utc();
        let session = ActiveModel {
            token: Set(generate_token()),
            user_id: Set(user_id),
            username: Set(username.to_owned()),
            created_at: Set(now),
            expires_at: Set(now + Duration::days(ttl_days)),
            is_active: Set(true),
        };
        session.insert(conn).await
    }

    /// Idempotent: deactivating an unknown or already inactive token is a
    /// no-op.
    pub async fn deactivate<C: ConnectionTrait>(conn: &C, token: &str) -> Result<(), DbErr> {
        SessionEntity::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .filter(Column::Token.eq(token))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Revokes every session of the user (password change, account reset).
    pub async fn deactivate_all_for_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<(), DbErr> {
        SessionEntity::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .filter(Column::UserId.eq(user_id))
            .exec(conn)
            .await?;
        Ok(())
    }
}
