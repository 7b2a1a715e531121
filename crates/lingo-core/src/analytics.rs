//! Dashboard projections derived from the quiz records. The quiz table is
//! the source of truth: when the cached aggregates on the user record
//! drift, this module repairs them, so the profile and performance
//! endpoints can never disagree for long.

use sea_orm::{DatabaseConnection, DbErr};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use lingo_db::{quiz as quiz_db, user as user_db};
use lingo_entity::quiz::Model as QuizRecord;
use lingo_model::performance::{DetailedPerformance, Performance, QuizSummary, TopicBreakdown};
use lingo_model::quiz::TopicTally;
use lingo_model::user::User;
use lingo_model_tools::convert::{IntoModel, TryIntoModel};
use lingo_model_tools::error::ConvertError;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("user not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

fn round_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean_score(quizzes: &[QuizRecord]) -> f64 {
    if quizzes.is_empty() {
        return 0.0;
    }
    quizzes.iter().map(|q| f64::from(q.score)).sum::<f64>() / quizzes.len() as f64
}

struct TopicAggregates {
    /// Per-topic mean of percentages, unrounded — the cached `progress`
    /// value the progression engine maintains.
    means: BTreeMap<String, f64>,
    /// Raw correct/total sums across all quizzes touching the topic.
    sums: BTreeMap<String, TopicTally>,
}

/// Accumulates in submission order with the same formula the progression
/// engine uses, so a healthy `user.progress` compares equal.
fn aggregate_topics(quizzes: &[QuizRecord]) -> Result<TopicAggregates, ConvertError> {
    let mut pct_sums: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    let mut sums: BTreeMap<String, TopicTally> = BTreeMap::new();
    for quiz in quizzes {
        let tallies: BTreeMap<String, TopicTally> = lingo_model_tools::convert::quiz::topic_performance_of(quiz)?;
        for (topic, tally) in tallies {
            if tally.total == 0 {
                continue;
            }
            let pct = 100.0 * f64::from(tally.correct) / f64::from(tally.total);
            let entry = pct_sums.entry(topic.clone()).or_insert((0.0, 0));
            entry.0 += pct;
            entry.1 += 1;
            let totals = sums.entry(topic).or_default();
            totals.correct += tally.correct;
            totals.total += tally.total;
        }
    }
    let means = pct_sums
        .into_iter()
        .map(|(topic, (sum, count))| (topic, sum / f64::from(count)))
        .collect();
    Ok(TopicAggregates { means, sums })
}

fn progress_drifted(cached: &BTreeMap<String, f64>, actual: &BTreeMap<String, f64>) -> bool {
    cached.len() != actual.len()
        || actual
            .iter()
            .any(|(topic, value)| cached.get(topic).is_none_or(|cached| (cached - value).abs() > 0.05))
}

pub async fn profile(conn: &DatabaseConnection, user_id: Uuid) -> Result<User, AnalyticsError> {
    let user = user_db::Query::find_by_id(conn, user_id)
        .await?
        .ok_or(AnalyticsError::UserNotFound)?;
    Ok(user.try_into_model()?)
}

/// Basic metrics computed FROM the quiz records. When any cached user
/// field (quiz count, average score, topic progress) disagrees, the
/// aggregate is authoritative and the user record is corrected as a side
/// effect.
pub async fn performance(conn: &DatabaseConnection, user_id: Uuid) -> Result<Performance, AnalyticsError> {
    let user = user_db::Query::find_by_id(conn, user_id)
        .await?
        .ok_or(AnalyticsError::UserNotFound)?;

    let quizzes = quiz_db::Query::find_chronological(conn, user_id).await?;
    #[allow(clippy::cast_possible_truncation)]
    let total_quizzes = quizzes.len() as i32;
    let average_score = mean_score(&quizzes);
    let progress = aggregate_topics(&quizzes)?.means;

    let cached_progress: BTreeMap<String, f64> = serde_json::from_value(user.progress.clone()).unwrap_or_default();
    let drifted = total_quizzes != user.total_quizzes
        || (average_score - user.average_score).abs() > 0.05
        || progress_drifted(&cached_progress, &progress);
    if drifted {
        tracing::warn!(
            user = %user_id,
            cached_total = user.total_quizzes,
            actual_total = total_quizzes,
            cached_average = user.average_score,
            actual_average = average_score,
            "cached aggregates drifted from quiz records, repairing"
        );
        let progress = serde_json::to_value(&progress).map_err(ConvertError::from)?;
        user_db::Mutation::update_cached_stats(conn, user_id, total_quizzes, average_score, progress).await?;
    }

    Ok(Performance {
        total_quizzes,
        average_score: round_display(average_score),
        english_level: user.english_level.into_model(),
    })
}

pub async fn performance_detailed(
    conn: &DatabaseConnection,
    user_id: Uuid,
) -> Result<DetailedPerformance, AnalyticsError> {
    let basic = performance(conn, user_id).await?;
    let quizzes = quiz_db::Query::find_chronological(conn, user_id).await?;

    let TopicAggregates { means, sums } = aggregate_topics(&quizzes)?;
    let topic_performance = means
        .into_iter()
        .map(|(topic, mean)| {
            let totals = sums.get(&topic).copied().unwrap_or_default();
            (
                topic,
                TopicBreakdown {
                    percentage: round_display(mean),
                    correct: totals.correct,
                    total: totals.total,
                },
            )
        })
        .collect();

    let mut level_counts = BTreeMap::new();
    for quiz in &quizzes {
        *level_counts.entry(quiz.difficulty.into_model()).or_insert(0u32) += 1;
    }

    let history = quizzes
        .into_iter()
        .enumerate()
        .map(|(i, quiz)| {
            #[allow(clippy::cast_possible_truncation)]
            let quiz_number = i as u32 + 1;
            (quiz_number, quiz).try_into_model()
        })
        .collect::<Result<Vec<QuizSummary>, _>>()?;

    Ok(DetailedPerformance {
        user_id,
        english_level: basic.english_level,
        total_quizzes: basic.total_quizzes,
        average_score: basic.average_score,
        topic_performance,
        level_counts,
        history,
    })
}
