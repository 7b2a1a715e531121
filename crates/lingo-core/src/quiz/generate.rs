//! The quiz orchestrator: picks topics and level from the user's state,
//! asks the model, validates defensively, retries once with a tightened
//! prompt, and falls back to the static bank. Nothing is persisted here;
//! quizzes only reach the store on submission.

use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::llm_config::LlmConfig;
use crate::openai::{self, CallConfig};
use crate::quiz::error::GenerateError;
use crate::quiz::parser::{parse_questions, validate_questions};
use crate::quiz::{bank, prompt};
use lingo_db::{quiz as quiz_db, user as user_db};
use lingo_model::quiz::GeneratedQuiz;
use lingo_model::topic::Topic;
use lingo_model::user::EnglishLevel;
use lingo_model_tools::convert::IntoModel;

const AVOID_LIST_LEN: usize = 10;
const RECENT_QUIZZES: u64 = 10;

pub const MAX_QUESTIONS: u32 = 10;

/// Weighted round-robin for "Mixed": every generating topic appears once
/// per cycle, the user's two weakest twice. The schedule is deterministic
/// for a given progress snapshot.
fn effective_topics(requested: Topic, progress: &BTreeMap<String, f64>, num_questions: usize) -> Vec<Topic> {
    if requested != Topic::Mixed {
        return vec![requested];
    }

    let mut ranked: Vec<Topic> = Topic::generating();
    ranked.sort_by(|a, b| {
        let pa = progress.get(&a.to_string()).copied().unwrap_or(0.0);
        let pb = progress.get(&b.to_string()).copied().unwrap_or(0.0);
        pa.total_cmp(&pb)
    });

    let weak: Vec<Topic> = ranked.iter().copied().take(2).collect();
    let mut cycle: Vec<Topic> = weak.clone();
    cycle.extend(ranked.iter().copied().filter(|t| !weak.contains(t)));
    cycle.extend(weak);

    cycle.into_iter().cycle().take(num_questions).collect()
}

/// Question texts of the user's most recent stored questions, newest
/// first, used both to steer the model away from repeats and to dedupe
/// the fallback bank.
async fn avoid_list(conn: &DatabaseConnection, user_id: Uuid) -> Result<Vec<String>, GenerateError> {
    let recent = quiz_db::Query::find_recent(conn, user_id, RECENT_QUIZZES).await?;
    let mut avoid = Vec::with_capacity(AVOID_LIST_LEN);
    for quiz in recent {
        let questions = lingo_model_tools::convert::quiz::questions_of(&quiz).unwrap_or_default();
        for question in questions {
            if avoid.len() >= AVOID_LIST_LEN {
                return Ok(avoid);
            }
            avoid.push(question.question);
        }
    }
    Ok(avoid)
}

pub async fn generate_quiz(
    conn: &DatabaseConnection,
    llm_config: &LlmConfig,
    user_id: Uuid,
    topic: Topic,
    num_questions: u32,
) -> Result<GeneratedQuiz, GenerateError> {
    if !(1..=MAX_QUESTIONS).contains(&num_questions) {
        return Err(GenerateError::InvalidQuestionCount);
    }
    let num_questions = num_questions as usize;

    let user = user_db::Query::find_by_id(conn, user_id)
        .await?
        .ok_or(GenerateError::UserNotFound)?;
    let level: EnglishLevel = user.english_level.into_model();
    let progress: BTreeMap<String, f64> = serde_json::from_value(user.progress).unwrap_or_default();

    let topics = effective_topics(topic, &progress, num_questions);
    let avoid = avoid_list(conn, user_id).await?;

    match model_questions(llm_config, level, topic, &topics, &avoid, num_questions).await {
        Some(questions) => Ok(GeneratedQuiz {
            questions,
            generated_for_level: level,
            fallback: false,
            model_used: Some(llm_config.model().to_owned()),
        }),
        None => {
            tracing::info!(user = %user_id, %topic, "serving quiz from the static bank");
            let questions = bank::select_questions(topic, level, num_questions, &avoid);
            if questions.is_empty() {
                return Err(GenerateError::BankEmpty);
            }
            Ok(GeneratedQuiz {
                questions,
                generated_for_level: level,
                fallback: true,
                model_used: None,
            })
        }
    }
}

/// The LLM path: one attempt plus one tightened retry. `None` means the
/// caller should fall back to the bank; model failures never escape.
async fn model_questions(
    llm_config: &LlmConfig,
    level: EnglishLevel,
    requested_topic: Topic,
    topics: &[Topic],
    avoid: &[String],
    num_questions: usize,
) -> Option<Vec<lingo_model::quiz::GeneratedQuestion>> {
    let call_config = || CallConfig::builder().total_timeout(llm_config.timeout()).build();
    let messages = prompt::generation_messages(level, topics, avoid, num_questions);

    let raw = match openai::complete(llm_config, call_config(), messages.clone()).await {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(error = &error as &dyn std::error::Error, "model call failed");
            return None;
        }
    };

    let rejection = match parse_and_validate(&raw, num_questions, requested_topic, level) {
        Ok(questions) => return Some(questions),
        Err(rejection) => rejection,
    };
    tracing::warn!(%rejection, "model output rejected, retrying once");

    let retry = prompt::retry_messages(messages, &raw, &rejection);
    let raw = match openai::complete(llm_config, call_config(), retry).await {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(error = &error as &dyn std::error::Error, "model retry failed");
            return None;
        }
    };

    match parse_and_validate(&raw, num_questions, requested_topic, level) {
        Ok(questions) => Some(questions),
        Err(rejection) => {
            tracing::warn!(%rejection, "model retry rejected, falling back");
            None
        }
    }
}

fn parse_and_validate(
    raw: &str,
    num_questions: usize,
    requested_topic: Topic,
    level: EnglishLevel,
) -> Result<Vec<lingo_model::quiz::GeneratedQuestion>, crate::quiz::parser::Rejection> {
    let questions = parse_questions(raw)?;
    validate_questions(&questions, num_questions, requested_topic, level)?;
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_topic_request_is_passed_through() {
        let topics = effective_topics(Topic::Grammar, &BTreeMap::new(), 4);
        assert_eq!(vec![Topic::Grammar], topics);
    }

    #[test]
    fn test_mixed_biases_toward_weak_topics() {
        let progress: BTreeMap<String, f64> = [
            ("Grammar".to_owned(), 90.0),
            ("Vocabulary".to_owned(), 85.0),
            ("Reading".to_owned(), 30.0),
            ("Tenses".to_owned(), 20.0),
            ("Pronunciation".to_owned(), 80.0),
        ]
        .into();

        let topics = effective_topics(Topic::Mixed, &progress, 7);
        assert_eq!(7, topics.len());
        // The two weakest lead the schedule and recur at the cycle's end.
        assert_eq!(Topic::Tenses, topics[0]);
        assert_eq!(Topic::Reading, topics[1]);
        let weak_hits = topics.iter().filter(|t| matches!(t, Topic::Tenses | Topic::Reading)).count();
        assert!(weak_hits >= 4, "weak topics appear {weak_hits} times in {topics:?}");
    }

    #[test]
    fn test_mixed_with_no_progress_covers_all_topics() {
        let topics = effective_topics(Topic::Mixed, &BTreeMap::new(), 5);
        assert_eq!(5, topics.len());
        for topic in Topic::generating() {
            assert!(topics.contains(&topic));
        }
    }
}
