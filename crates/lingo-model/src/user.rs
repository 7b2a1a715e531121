use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EnglishLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl EnglishLevel {
    /// Next level up, or `None` when already advanced.
    #[must_use]
    pub fn promoted(self) -> Option<Self> {
        match self {
            Self::Beginner => Some(Self::Intermediate),
            Self::Intermediate => Some(Self::Advanced),
            Self::Advanced => None,
        }
    }

    /// Next level down, or `None` when already beginner.
    #[must_use]
    pub fn demoted(self) -> Option<Self> {
        match self {
            Self::Beginner => None,
            Self::Intermediate => Some(Self::Beginner),
            Self::Advanced => Some(Self::Intermediate),
        }
    }
}

/// Display projection of a user record. Never carries credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    #[schema(example = "night_owl_42")]
    pub username: String,
    pub english_level: EnglishLevel,
    pub total_quizzes: i32,
    /// Arithmetic mean of all quiz scores, rounded to one decimal place.
    pub average_score: f64,
    pub progress: BTreeMap<String, f64>,
    pub has_completed_first_quiz: bool,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<NaiveDateTime>,
}

/// The authenticated identity attached to a request by the session layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub english_level: EnglishLevel,
    pub has_completed_first_quiz: bool,
}
