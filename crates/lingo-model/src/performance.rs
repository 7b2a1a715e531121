use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::user::EnglishLevel;

/// Basic metrics, recomputed from quiz records rather than read from the
/// cached user fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Performance {
    pub total_quizzes: i32,
    pub average_score: f64,
    pub english_level: EnglishLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopicBreakdown {
    /// Mean of per-quiz topic percentages, rounded to one decimal place.
    pub percentage: f64,
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizSummary {
    /// 1-based position in submission order.
    pub quiz_number: u32,
    pub score: i32,
    pub topic: String,
    pub difficulty: EnglishLevel,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetailedPerformance {
    pub user_id: Uuid,
    pub english_level: EnglishLevel,
    pub total_quizzes: i32,
    pub average_score: f64,
    pub topic_performance: BTreeMap<String, TopicBreakdown>,
    pub level_counts: BTreeMap<EnglishLevel, u32>,
    pub history: Vec<QuizSummary>,
}
