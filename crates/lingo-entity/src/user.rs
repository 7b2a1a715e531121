use sea_orm::entity::prelude::*;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Clone, Copy, Default)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum EnglishLevel {
    #[default]
    #[sea_orm(string_value = "beginner")]
    Beginner,
    #[sea_orm(string_value = "intermediate")]
    Intermediate,
    #[sea_orm(string_value = "advanced")]
    Advanced,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
    pub english_level: EnglishLevel,
    pub has_completed_first_quiz: bool,
    pub total_quizzes: i32,
    pub average_score: f64,
    /// Topic name mapped to a 0..=100 percentage.
    pub progress: Json,
    /// Quizzes submitted since the last level transition. The level can
    /// only move again once this reaches the configured window size.
    pub quizzes_since_level_change: i32,
    pub created_at: DateTime,
    pub last_login: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quiz::Entity")]
    Quiz,
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
    #[sea_orm(has_many = "super::qa_entry::Entity")]
    QaEntry,
}

impl Related<super::quiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::qa_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QaEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
