//! Prompt construction for quiz generation. The prompt pins the exact JSON
//! shape the parser accepts so that a well-behaved model round-trips
//! cleanly, and the retry prompt confronts the model with its own output
//! and the specific rejection.

use async_openai::types::ChatCompletionRequestMessage;
use std::fmt::Write;

use crate::openai::{assistant_message, system_message, user_message};
use crate::quiz::parser::Rejection;
use lingo_model::topic::Topic;
use lingo_model::user::EnglishLevel;

#[must_use]
pub fn level_description(level: EnglishLevel) -> &'static str {
    match level {
        EnglishLevel::Beginner => "basic English concepts, simple grammar, common vocabulary",
        EnglishLevel::Intermediate => {
            "more complex grammar structures, intermediate vocabulary, context-dependent questions"
        }
        EnglishLevel::Advanced => {
            "advanced grammar, nuanced vocabulary, complex sentence structures, idiomatic expressions"
        }
    }
}

#[must_use]
pub fn generation_messages(
    level: EnglishLevel,
    topics: &[Topic],
    avoid: &[String],
    num_questions: usize,
) -> Vec<ChatCompletionRequestMessage> {
    let wants_reading = topics.contains(&Topic::Reading);
    let topic_list = topics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "You are an expert English teacher creating a personalized quiz for a {level} level student.\n\n\
         Create exactly {num_questions} multiple choice questions covering: {topic_list}\n\n\
         Level: {level} - {description}\n\n\
         Requirements:\n\
         - Questions must be {level} level appropriate\n\
         - Each question has exactly 4 distinct options\n\
         - correct_answer must be copied verbatim from the options\n\
         - Provide a clear explanation for every correct answer\n\
         - Make questions engaging and practical\n",
        description = level_description(level),
    );

    if wants_reading {
        let _ = write!(
            prompt,
            "- Reading questions share ONE passage (at least three sentences). Put the identical passage string \
             into the \"passage\" field of every Reading question and make the questions refer to it\n\
             - Questions for other topics must NOT have a \"passage\" field\n"
        );
    }

    let _ = write!(
        prompt,
        "\nFormat your response as valid JSON only, with this exact structure:\n\
         {{\n\
             \"questions\": [\n\
                 {{\n\
                     \"question\": \"Question text here\",\n\
                     \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n\
                     \"correct_answer\": \"Option A\",\n\
                     \"explanation\": \"Clear explanation of why this is correct\",\n\
                     \"topic\": \"{first_topic}\",\n\
                     \"difficulty\": \"{level}\"{passage_hint}\n\
                 }}\n\
             ]\n\
         }}\n",
        first_topic = topics.first().copied().unwrap_or(Topic::Grammar),
        passage_hint = if wants_reading {
            ",\n                     \"passage\": \"Shared passage for Reading questions\""
        } else {
            ""
        },
    );

    if !avoid.is_empty() {
        let _ = write!(
            prompt,
            "\nThe student has already seen these questions. Do NOT repeat or rephrase them:\n"
        );
        for question in avoid {
            let _ = writeln!(prompt, "- {question}");
        }
    }

    vec![
        system_message(prompt),
        user_message(format!(
            "Please generate the {num_questions}-question quiz now. Respond with JSON only."
        )),
    ]
}

/// One bounded retry: the original instructions, the model's failed
/// attempt, and the precise reason it was rejected.
#[must_use]
pub fn retry_messages(
    mut base: Vec<ChatCompletionRequestMessage>,
    prior_output: &str,
    rejection: &Rejection,
) -> Vec<ChatCompletionRequestMessage> {
    base.push(assistant_message(prior_output));
    base.push(user_message(format!(
        "That response was rejected: {rejection}. \
         Fix exactly this problem and answer again with valid JSON only, \
         following the structure from the first message precisely."
    )));
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::types::ChatCompletionRequestSystemMessageContent;

    fn system_text(messages: &[ChatCompletionRequestMessage]) -> String {
        match &messages[0] {
            ChatCompletionRequestMessage::System(system) => match &system.content {
                ChatCompletionRequestSystemMessageContent::Text(text) => text.clone(),
                ChatCompletionRequestSystemMessageContent::Array(_) => panic!("unexpected array content"),
            },
            _ => panic!("first message must be the system prompt"),
        }
    }

    #[test]
    fn test_prompt_names_level_and_count() {
        let messages = generation_messages(EnglishLevel::Intermediate, &[Topic::Grammar], &[], 4);
        let text = system_text(&messages);
        assert!(text.contains("intermediate"));
        assert!(text.contains("exactly 4 multiple choice questions"));
        assert!(!text.contains("passage"));
    }

    #[test]
    fn test_reading_prompt_demands_shared_passage() {
        let messages = generation_messages(EnglishLevel::Beginner, &[Topic::Reading], &[], 4);
        let text = system_text(&messages);
        assert!(text.contains("ONE passage"));
        assert!(text.contains("\"passage\""));
    }

    #[test]
    fn test_avoid_list_is_embedded() {
        let avoid = vec!["What is the past tense of 'go'?".to_owned()];
        let messages = generation_messages(EnglishLevel::Beginner, &[Topic::Tenses], &avoid, 4);
        assert!(system_text(&messages).contains("past tense of 'go'"));
    }

    #[test]
    fn test_retry_quotes_output_and_reason() {
        let base = generation_messages(EnglishLevel::Beginner, &[Topic::Grammar], &[], 4);
        let messages = retry_messages(base, "{\"questions\": []}", &Rejection::WrongCount { expected: 4, got: 0 });
        assert_eq!(4, messages.len());
        match &messages[3] {
            ChatCompletionRequestMessage::User(_) => {}
            _ => panic!("retry must end with a user message"),
        }
    }
}
