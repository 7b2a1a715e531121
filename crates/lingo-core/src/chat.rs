//! Stateless tutor conversation and the question assistant. The client
//! owns chat history; the server only shapes prompts and forwards them.
//! Model outages degrade to an apologetic reply instead of an error.

use sea_orm::DatabaseConnection;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::llm_config::LlmConfig;
use crate::openai::{self, CallConfig, assistant_message, system_message, user_message};
use lingo_db::qa_entry;
use lingo_model::chat::{AskAnswer, ChatReply};
use lingo_model::user::EnglishLevel;

const TUTOR_SYSTEM_PROMPT: &str = "You are a friendly, patient English teacher. Help students learn English \
grammar, vocabulary, and pronunciation. Keep paragraphs to 2-3 sentences, give practical examples, and adapt \
your vocabulary to the learner's level.";

const APOLOGY_REPLY: &str =
    "Sorry, I'm having trouble reaching the language model right now. Please try again in a moment.";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn call_config(llm_config: &LlmConfig) -> CallConfig {
    CallConfig::builder().total_timeout(llm_config.timeout()).build()
}

/// Maps the alternating transcript onto chat roles. The last entry is the
/// user's current turn; parity from the end decides the rest, so a
/// transcript of any length stays consistent.
fn conversation_messages(conversation: &[String]) -> Vec<async_openai::types::ChatCompletionRequestMessage> {
    let mut messages = vec![system_message(TUTOR_SYSTEM_PROMPT)];
    let last = conversation.len().saturating_sub(1);
    for (i, text) in conversation.iter().enumerate() {
        if (last - i) % 2 == 0 {
            messages.push(user_message(text.clone()));
        } else {
            messages.push(assistant_message(text.clone()));
        }
    }
    messages
}

pub async fn chat(llm_config: &LlmConfig, conversation: &[String]) -> ChatReply {
    if conversation.is_empty() {
        return ChatReply {
            reply: "Hi! What would you like to practice today?".to_owned(),
        };
    }
    let messages = conversation_messages(conversation);
    match openai::complete(llm_config, call_config(llm_config), messages).await {
        Ok(reply) => ChatReply { reply },
        Err(error) => {
            tracing::warn!(error = &error as &dyn std::error::Error, "chat degraded to apology");
            ChatReply {
                reply: APOLOGY_REPLY.to_owned(),
            }
        }
    }
}

pub async fn teacher_chat(
    llm_config: &LlmConfig,
    message: &str,
    user_level: Option<EnglishLevel>,
    focus: Option<&str>,
) -> ChatReply {
    let mut system = TUTOR_SYSTEM_PROMPT.to_owned();
    if let Some(level) = user_level {
        system.push_str(&format!(" The student is at {level} level; pitch everything accordingly."));
    }
    if let Some(focus) = focus {
        system.push_str(&format!(" This lesson focuses on {focus}."));
    }

    let messages = vec![system_message(system), user_message(message.to_owned())];
    match openai::complete(llm_config, call_config(llm_config), messages).await {
        Ok(reply) => ChatReply { reply },
        Err(error) => {
            tracing::warn!(error = &error as &dyn std::error::Error, "teacher chat degraded to apology");
            ChatReply {
                reply: APOLOGY_REPLY.to_owned(),
            }
        }
    }
}

/// Answers a question strictly from the provided context and appends the
/// exchange to the user's Q&A history.
pub async fn ask_question(
    conn: &DatabaseConnection,
    llm_config: &LlmConfig,
    user_id: Uuid,
    question: &str,
    context: &str,
) -> Result<AskAnswer, ChatError> {
    let messages = vec![
        system_message(
            "Answer the student's question using only the provided context. \
             Quote the relevant part and keep the answer short. If the context \
             does not contain the answer, say so.",
        ),
        user_message(format!("Context:\n{context}\n\nQuestion: {question}")),
    ];

    let answer = match openai::complete(llm_config, call_config(llm_config), messages).await {
        Ok(answer) => answer,
        Err(error) => {
            tracing::warn!(error = &error as &dyn std::error::Error, "question assistant degraded");
            APOLOGY_REPLY.to_owned()
        }
    };

    qa_entry::Mutation::append(conn, user_id, question, context, &answer).await?;
    Ok(AskAnswer { answer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::types::ChatCompletionRequestMessage;

    fn roles(conversation: &[&str]) -> Vec<&'static str> {
        conversation_messages(&conversation.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>())
            .iter()
            .map(|m| match m {
                ChatCompletionRequestMessage::System(_) => "system",
                ChatCompletionRequestMessage::User(_) => "user",
                ChatCompletionRequestMessage::Assistant(_) => "assistant",
                _ => "other",
            })
            .collect()
    }

    #[test]
    fn test_single_turn_is_user() {
        assert_eq!(vec!["system", "user"], roles(&["Hello"]));
    }

    #[test]
    fn test_alternation_ends_with_user() {
        assert_eq!(
            vec!["system", "user", "assistant", "user"],
            roles(&["Hello", "Hi! How can I help?", "Teach me tenses"])
        );
    }
}
