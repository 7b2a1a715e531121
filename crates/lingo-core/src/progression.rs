//! Applies a quiz submission to the user's adaptive state. The whole
//! read-modify-write cycle runs under the user's lock and the writes land
//! in one store transaction, so concurrent submissions of the same user
//! serialize cleanly while other users proceed untouched.

use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::locks::UserLocks;
use lingo_db::quiz::{Mutation as QuizMutation, NewQuiz, Query as QuizQuery, UserStatsUpdate};
use lingo_db::user as user_db;
use lingo_model::quiz::{AnsweredQuestion, Evaluation, LevelChangeType, QuizSubmission, TopicTally};
use lingo_model::user::EnglishLevel;
use lingo_model_tools::convert::{IntoDbModel, IntoModel};
use lingo_utils::args::learning::LearningArgs;

pub mod error;

use error::ProgressionError;

/// Thresholds for the recent-window level rule.
#[derive(Debug, Clone)]
pub struct LevelPolicy {
    pub up_threshold: f64,
    pub down_threshold: f64,
    pub min_quizzes: usize,
}

impl From<&LearningArgs> for LevelPolicy {
    fn from(args: &LearningArgs) -> Self {
        Self {
            up_threshold: f64::from(args.level_up_threshold),
            down_threshold: f64::from(args.level_down_threshold),
            min_quizzes: args.min_quizzes_for_level_change as usize,
        }
    }
}

fn round_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn validate_structure(questions: &[AnsweredQuestion]) -> Result<(), ProgressionError> {
    if questions.is_empty() {
        return Err(ProgressionError::InvalidQuizStructure(
            "quiz contains no questions".to_owned(),
        ));
    }
    for (index, question) in questions.iter().enumerate() {
        if question.options.len() != 4 {
            return Err(ProgressionError::InvalidQuizStructure(format!(
                "question {index}: expected exactly 4 options, got {}",
                question.options.len()
            )));
        }
        if !question.options.iter().any(|o| o == &question.correct_answer) {
            return Err(ProgressionError::InvalidQuizStructure(format!(
                "question {index}: correct_answer is not one of the options"
            )));
        }
    }
    Ok(())
}

/// Recomputes correctness and the score; client-supplied values are
/// advisory only.
fn grade(mut questions: Vec<AnsweredQuestion>) -> (Vec<AnsweredQuestion>, i32, BTreeMap<String, TopicTally>) {
    let mut tallies: BTreeMap<String, TopicTally> = BTreeMap::new();
    let mut correct = 0usize;

    for question in &mut questions {
        question.is_correct = question.user_answer == question.correct_answer;
        if question.is_correct {
            correct += 1;
        }
        let tally = tallies.entry(question.topic.clone()).or_default();
        tally.total += 1;
        if question.is_correct {
            tally.correct += 1;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let score = (100.0 * correct as f64 / questions.len() as f64).round() as i32;
    (questions, score, tallies)
}

/// Mean-of-percentages progress across all quizzes touching each topic,
/// the single definition shared with the analytics aggregator.
fn recompute_progress(
    history: &[BTreeMap<String, TopicTally>],
) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for tallies in history {
        for (topic, tally) in tallies {
            if tally.total == 0 {
                continue;
            }
            let pct = 100.0 * f64::from(tally.correct) / f64::from(tally.total);
            let entry = sums.entry(topic.clone()).or_insert((0.0, 0));
            entry.0 += pct;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(topic, (sum, count))| (topic, sum / f64::from(count)))
        .collect()
}

struct Transition {
    level: EnglishLevel,
    previous: EnglishLevel,
    change_type: LevelChangeType,
    message: String,
}

/// The recent-window rule: eligible only once a full window of quizzes has
/// accumulated since the last transition, and a transition moves exactly
/// one step and restarts the window.
fn evaluate_transition(policy: &LevelPolicy, level: EnglishLevel, window: &[f64]) -> Option<Transition> {
    if window.len() < policy.min_quizzes {
        return None;
    }
    let mean = window.iter().sum::<f64>() / window.len() as f64;

    if mean >= policy.up_threshold {
        let next = level.promoted()?;
        return Some(Transition {
            level: next,
            previous: level,
            change_type: LevelChangeType::Progression,
            message: format!("Congratulations! You've progressed from {level} to {next} level!"),
        });
    }
    if mean <= policy.down_threshold {
        let next = level.demoted()?;
        return Some(Transition {
            level: next,
            previous: level,
            change_type: LevelChangeType::Retrocession,
            message: format!("Your level has changed from {level} to {next}. Keep practicing to improve!"),
        });
    }
    None
}

pub async fn submit_quiz(
    conn: &DatabaseConnection,
    locks: &UserLocks,
    policy: &LevelPolicy,
    user_id: Uuid,
    submission: QuizSubmission,
) -> Result<Evaluation, ProgressionError> {
    validate_structure(&submission.quiz_data.questions)?;

    let lock = locks.lock_for(user_id);
    let _guard = lock.lock().await;

    let user = user_db::Query::find_by_id(conn, user_id)
        .await?
        .ok_or(ProgressionError::UserNotFound)?;
    let current_level: EnglishLevel = user.english_level.into_model();

    let (questions, score, tallies) = grade(submission.quiz_data.questions);
    if let Some(claimed) = submission.score
        && claimed != score
    {
        tracing::warn!(user = %user_id, claimed, recomputed = score, "ignoring client-reported score");
    }

    let total_quizzes = user.total_quizzes + 1;
    let average_score =
        (user.average_score * f64::from(user.total_quizzes) + f64::from(score)) / f64::from(total_quizzes);

    // Topic progress over the full history including this submission.
    let mut history: Vec<BTreeMap<String, TopicTally>> = Vec::new();
    for quiz in QuizQuery::find_chronological(conn, user_id).await? {
        history.push(serde_json::from_value(quiz.topic_performance)?);
    }
    history.push(tallies.clone());
    let progress = recompute_progress(&history);

    // Window of the most recent scores, newest first, including this one.
    let mut window = vec![f64::from(score)];
    for quiz in QuizQuery::find_recent(conn, user_id, policy.min_quizzes.saturating_sub(1) as u64).await? {
        window.push(f64::from(quiz.score));
    }
    window.truncate(policy.min_quizzes);

    let eligible = user.quizzes_since_level_change + 1 >= policy.min_quizzes as i32;
    let transition = if eligible {
        evaluate_transition(policy, current_level, &window)
    } else {
        None
    };

    let (new_level, quizzes_since_change) = match &transition {
        Some(t) => (t.level, 0),
        None => (current_level, user.quizzes_since_level_change + 1),
    };

    QuizMutation::record_result(
        conn,
        NewQuiz {
            user_id,
            quiz_type: submission.quiz_type.unwrap_or_default().into_db_model(),
            topic: submission.topic,
            difficulty: submission.difficulty.unwrap_or(current_level).into_db_model(),
            score,
            questions: serde_json::to_value(&questions)?,
            topic_performance: serde_json::to_value(&tallies)?,
        },
        UserStatsUpdate {
            english_level: new_level.into_db_model(),
            total_quizzes,
            average_score,
            progress: serde_json::to_value(&progress)?,
            has_completed_first_quiz: true,
            quizzes_since_level_change: quizzes_since_change,
        },
    )
    .await?;

    if let Some(t) = &transition {
        tracing::info!(user = %user_id, from = %t.previous, to = %t.level, "level transition");
    }

    Ok(Evaluation {
        score,
        current_level: new_level,
        previous_level: transition.as_ref().map(|t| t.previous),
        level_changed: transition.is_some(),
        level_change_type: transition.as_ref().map(|t| t.change_type),
        level_change_message: transition.map(|t| t.message),
        total_quizzes,
        average_score: round_display(average_score),
        topic_performance: tallies,
        has_completed_first_quiz: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LevelPolicy {
        LevelPolicy {
            up_threshold: 75.0,
            down_threshold: 50.0,
            min_quizzes: 3,
        }
    }

    fn question(topic: &str, user_answer: &str) -> AnsweredQuestion {
        AnsweredQuestion {
            question: format!("{topic} question"),
            options: vec!["right".into(), "wrong".into(), "worse".into(), "worst".into()],
            correct_answer: "right".to_owned(),
            user_answer: user_answer.to_owned(),
            is_correct: false,
            explanation: String::new(),
            topic: topic.to_owned(),
            passage: None,
        }
    }

    #[test]
    fn test_grade_recomputes_correctness_and_score() {
        let questions = vec![
            question("Grammar", "right"),
            question("Grammar", "wrong"),
            question("Tenses", "right"),
            question("Tenses", "right"),
        ];
        let (graded, score, tallies) = grade(questions);
        assert_eq!(75, score);
        assert!(graded[0].is_correct);
        assert!(!graded[1].is_correct);
        assert_eq!(TopicTally { correct: 1, total: 2 }, tallies["Grammar"]);
        assert_eq!(TopicTally { correct: 2, total: 2 }, tallies["Tenses"]);
    }

    #[test]
    fn test_grade_rounds_to_nearest_integer() {
        let questions = vec![
            question("Grammar", "right"),
            question("Grammar", "wrong"),
            question("Grammar", "wrong"),
        ];
        let (_, score, _) = grade(questions);
        // 1/3 = 33.33...
        assert_eq!(33, score);
    }

    #[test]
    fn test_structure_rejects_empty_and_malformed() {
        assert!(validate_structure(&[]).is_err());

        let mut bad_options = question("Grammar", "right");
        bad_options.options.pop();
        assert!(validate_structure(&[bad_options]).is_err());

        let mut stray_answer = question("Grammar", "right");
        stray_answer.correct_answer = "absent".to_owned();
        assert!(validate_structure(&[stray_answer]).is_err());

        assert!(validate_structure(&[question("Grammar", "right")]).is_ok());
    }

    #[test]
    fn test_progress_is_mean_of_percentages() {
        let history = vec![
            BTreeMap::from([("Grammar".to_owned(), TopicTally { correct: 1, total: 2 })]),
            BTreeMap::from([("Grammar".to_owned(), TopicTally { correct: 2, total: 2 })]),
        ];
        let progress = recompute_progress(&history);
        assert_eq!(75.0, progress["Grammar"]);
    }

    #[test]
    fn test_transition_requires_full_window() {
        assert!(evaluate_transition(&policy(), EnglishLevel::Beginner, &[90.0, 95.0]).is_none());
    }

    #[test]
    fn test_transition_up_and_down() {
        let up = evaluate_transition(&policy(), EnglishLevel::Intermediate, &[95.0, 90.0, 85.0]).unwrap();
        assert_eq!(EnglishLevel::Advanced, up.level);
        assert_eq!(LevelChangeType::Progression, up.change_type);
        assert!(up.message.contains("Congratulations"));

        let down = evaluate_transition(&policy(), EnglishLevel::Advanced, &[40.0, 45.0, 40.0]).unwrap();
        assert_eq!(EnglishLevel::Intermediate, down.level);
        assert_eq!(LevelChangeType::Retrocession, down.change_type);
    }

    #[test]
    fn test_transition_clamps_at_ladder_ends() {
        assert!(evaluate_transition(&policy(), EnglishLevel::Advanced, &[100.0, 100.0, 100.0]).is_none());
        assert!(evaluate_transition(&policy(), EnglishLevel::Beginner, &[10.0, 10.0, 10.0]).is_none());
    }

    #[test]
    fn test_midband_mean_changes_nothing() {
        assert!(evaluate_transition(&policy(), EnglishLevel::Intermediate, &[60.0, 65.0, 70.0]).is_none());
    }
}
