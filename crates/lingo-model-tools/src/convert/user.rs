use std::collections::BTreeMap;

use crate::convert::{FromDbModel, FromModel, IntoModel, TryFromDbModel};
use crate::error::ConvertError;
use lingo_entity::user as db_user;
use lingo_model::user::{EnglishLevel, Principal, User};

impl FromDbModel<db_user::EnglishLevel> for EnglishLevel {
    fn from_db_model(model: db_user::EnglishLevel) -> Self {
        match model {
            db_user::EnglishLevel::Beginner => Self::Beginner,
            db_user::EnglishLevel::Intermediate => Self::Intermediate,
            db_user::EnglishLevel::Advanced => Self::Advanced,
        }
    }
}

impl FromModel<EnglishLevel> for db_user::EnglishLevel {
    fn from_model(model: EnglishLevel) -> Self {
        match model {
            EnglishLevel::Beginner => Self::Beginner,
            EnglishLevel::Intermediate => Self::Intermediate,
            EnglishLevel::Advanced => Self::Advanced,
        }
    }
}

fn round_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl TryFromDbModel<db_user::Model> for User {
    type Error = ConvertError;

    fn try_from_db_model(model: db_user::Model) -> Result<Self, Self::Error> {
        let progress: BTreeMap<String, f64> = serde_json::from_value(model.progress)?;
        let progress = progress.into_iter().map(|(topic, pct)| (topic, round_display(pct))).collect();
        Ok(Self {
            user_id: model.id,
            username: model.username,
            english_level: model.english_level.into_model(),
            total_quizzes: model.total_quizzes,
            average_score: round_display(model.average_score),
            progress,
            has_completed_first_quiz: model.has_completed_first_quiz,
            created_at: model.created_at,
            last_login: model.last_login,
        })
    }
}

impl FromDbModel<db_user::Model> for Principal {
    fn from_db_model(model: db_user::Model) -> Self {
        Self {
            user_id: model.id,
            username: model.username,
            english_level: model.english_level.into_model(),
            has_completed_first_quiz: model.has_completed_first_quiz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::IntoDbModel;

    #[test]
    fn test_level_round_trip() {
        for level in [
            EnglishLevel::Beginner,
            EnglishLevel::Intermediate,
            EnglishLevel::Advanced,
        ] {
            let db: db_user::EnglishLevel = level.into_db_model();
            let back: EnglishLevel = db.into_model();
            assert_eq!(level, back);
        }
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(66.7, round_display(200.0 / 3.0));
        assert_eq!(75.0, round_display(75.0));
    }
}
