use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::user::EnglishLevel;

/// Alternating transcript, user first, ending with the user's latest turn.
/// The client is the source of truth; nothing is persisted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub conversation: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TeacherChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_level: Option<EnglishLevel>,
    #[serde(default)]
    pub focus: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AskQuestionRequest {
    pub question: String,
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskAnswer {
    pub answer: String,
}
