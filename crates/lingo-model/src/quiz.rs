use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::Display;
use utoipa::ToSchema;

use crate::topic::Topic;
use crate::user::EnglishLevel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuizType {
    Static,
    #[default]
    Adaptive,
}

/// A question as produced by the orchestrator (LLM or fallback bank).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedQuestion {
    pub question: String,
    /// Exactly four distinct answer options.
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub topic: Topic,
    pub difficulty: EnglishLevel,
    /// Present on Reading questions only; shared across the items
    /// generated together.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedQuiz {
    pub questions: Vec<GeneratedQuestion>,
    pub generated_for_level: EnglishLevel,
    /// True when the static bank produced the quiz instead of the model.
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdaptiveQuizRequest {
    pub topic: Topic,
    #[serde(default)]
    pub num_questions: Option<u32>,
}

/// A question as answered by the learner. `is_correct` is advisory input:
/// the server recomputes it from `user_answer` and `correct_answer`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnsweredQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "default_question_topic")]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
}

fn default_question_topic() -> String {
    "Unknown".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizData {
    pub questions: Vec<AnsweredQuestion>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuizSubmission {
    pub quiz_data: QuizData,
    /// Client-reported score; ignored when it disagrees with the server's
    /// own tally.
    #[serde(default)]
    pub score: Option<i32>,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Option<EnglishLevel>,
    #[serde(default)]
    pub quiz_type: Option<QuizType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TopicTally {
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LevelChangeType {
    Progression,
    Retrocession,
}

/// Result of a quiz submission, §4.C7 output shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Evaluation {
    pub score: i32,
    pub current_level: EnglishLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_level: Option<EnglishLevel>,
    pub level_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_change_type: Option<LevelChangeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_change_message: Option<String>,
    pub total_quizzes: i32,
    pub average_score: f64,
    pub topic_performance: BTreeMap<String, TopicTally>,
    pub has_completed_first_quiz: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_question_skips_absent_passage() {
        let question = GeneratedQuestion {
            question: "Which article fits: ___ apple?".to_owned(),
            options: vec!["a".into(), "an".into(), "the".into(), "no article".into()],
            correct_answer: "an".to_owned(),
            explanation: "'An' precedes vowel sounds.".to_owned(),
            topic: Topic::Grammar,
            difficulty: EnglishLevel::Beginner,
            passage: None,
        };
        let value = serde_json::to_value(&question).unwrap();
        assert!(value.get("passage").is_none());
        assert_eq!("Grammar", value["topic"]);
        assert_eq!("beginner", value["difficulty"]);
    }

    #[test]
    fn test_submission_tolerates_missing_optionals() {
        let submission: QuizSubmission = serde_json::from_str(
            r#"{
                "quiz_data": {"questions": [{
                    "question": "Pick one",
                    "options": ["a", "b", "c", "d"],
                    "correct_answer": "a",
                    "user_answer": "b"
                }]},
                "topic": "Grammar"
            }"#,
        )
        .unwrap();
        assert_eq!(None, submission.score);
        assert_eq!(None, submission.difficulty);
        assert_eq!("Unknown", submission.quiz_data.questions[0].topic);
        assert!(!submission.quiz_data.questions[0].is_correct);
    }

    #[test]
    fn test_level_change_type_serialization() {
        assert_eq!(
            r#""progression""#,
            serde_json::to_string(&LevelChangeType::Progression).unwrap()
        );
        assert_eq!(
            r#""retrocession""#,
            serde_json::to_string(&LevelChangeType::Retrocession).unwrap()
        );
    }
}
