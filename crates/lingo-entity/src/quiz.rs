use sea_orm::entity::prelude::*;

use crate::user::EnglishLevel;

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Default)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum QuizType {
    #[sea_orm(string_value = "static")]
    Static,
    #[default]
    #[sea_orm(string_value = "adaptive")]
    Adaptive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quizzes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_type: QuizType,
    /// Topic label; "Mixed" is permitted.
    pub topic: String,
    pub difficulty: EnglishLevel,
    /// 0..=100, recomputed by the server from the answered questions.
    pub score: i32,
    /// Ordered array of answered-question records.
    pub questions: Json,
    /// Topic name mapped to `{ "correct": n, "total": n }`.
    pub topic_performance: Json,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::user::Entity",
        from = "Column::UserId",
        to = "crate::user::Column::Id"
    )]
    User,
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
