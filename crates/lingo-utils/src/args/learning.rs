use clap::Args;

/// Tunables for the adaptive progression engine and quiz defaults.
#[derive(Debug, Clone, Args)]
pub struct LearningArgs {
    #[arg(long, env = "LEVEL_UP_THRESHOLD", default_value_t = 75)]
    pub level_up_threshold: u32,

    #[arg(long, env = "LEVEL_DOWN_THRESHOLD", default_value_t = 50)]
    pub level_down_threshold: u32,

    #[arg(long, env = "MIN_QUIZZES_FOR_LEVEL_CHANGE", default_value_t = 3)]
    pub min_quizzes_for_level_change: u32,

    #[arg(long, env = "DEFAULT_QUIZ_QUESTIONS", default_value_t = 4)]
    pub default_quiz_questions: u32,

    #[arg(long, env = "SESSION_TTL_DAYS", default_value_t = 7)]
    pub session_ttl_days: i64,
}
