//! Defensive parsing of model output. The text is untrusted: it may wrap
//! the JSON in prose or markdown fences and may contain trailing commas.
//! Syntactic noise is tolerated; semantic violations are rejected, never
//! coerced.

use serde::Deserialize;
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

use lingo_model::quiz::GeneratedQuestion;
use lingo_model::topic::Topic;
use lingo_model::user::EnglishLevel;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("no JSON found in model output")]
    NoJson,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("expected {expected} questions, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("question {index}: expected exactly 4 options, got {got}")]
    WrongOptionCount { index: usize, got: usize },

    #[error("question {index}: options are not distinct")]
    DuplicateOptions { index: usize },

    #[error("question {index}: correct_answer is not one of the options")]
    AnswerNotInOptions { index: usize },

    #[error("question {index}: explanation is empty")]
    EmptyExplanation { index: usize },

    #[error("question {index}: unrecognized topic '{topic}'")]
    UnknownTopic { index: usize, topic: String },

    #[error("question {index}: topic '{topic}' does not match the requested topic")]
    WrongTopic { index: usize, topic: String },

    #[error("question {index}: unrecognized difficulty '{got}'")]
    UnknownDifficulty { index: usize, got: String },

    #[error("question {index}: difficulty '{got}' does not match the requested level '{expected}'")]
    WrongDifficulty {
        index: usize,
        got: String,
        expected: EnglishLevel,
    },

    #[error("question {index}: Reading question without a passage")]
    MissingPassage { index: usize },

    #[error("question {index}: unexpected passage on a non-Reading question")]
    UnexpectedPassage { index: usize },

    #[error("Reading questions do not share a single passage")]
    UnsharedPassage,
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: String,
    topic: String,
    difficulty: String,
    #[serde(default)]
    passage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireQuiz {
    questions: Vec<WireQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireRoot {
    Object(WireQuiz),
    Array(Vec<WireQuestion>),
}

/// Cuts the first fenced block out of a markdown response, tolerating a
/// language tag after the opening fence.
fn strip_fences(raw: &str) -> &str {
    let Some(start) = raw.find("```") else {
        return raw;
    };
    let after_fence = &raw[start + 3..];
    let body_start = after_fence.find('\n').map_or(0, |i| i + 1);
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    }
}

/// The outermost JSON value: first `{` to last `}`, falling back to the
/// bracket pair for a bare array.
fn extract_json(raw: &str) -> Option<&str> {
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (raw.find(open), raw.rfind(close))
            && start < end
        {
            return Some(&raw[start..=end]);
        }
    }
    None
}

/// Removes commas that directly precede a closing brace or bracket,
/// respecting string literals.
fn strip_trailing_commas(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;
    let chars: Vec<char> = json.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

pub fn parse_questions(raw: &str) -> Result<Vec<GeneratedQuestion>, Rejection> {
    let unfenced = strip_fences(raw);
    let json = extract_json(unfenced).ok_or(Rejection::NoJson)?;
    let json = strip_trailing_commas(json);

    let root: WireRoot = serde_json::from_str(&json).map_err(|error| Rejection::InvalidJson(error.to_string()))?;
    let wire = match root {
        WireRoot::Object(quiz) => quiz.questions,
        WireRoot::Array(questions) => questions,
    };

    wire.into_iter()
        .enumerate()
        .map(|(index, q)| {
            let topic = Topic::from_str(q.topic.trim()).map_err(|_| Rejection::UnknownTopic {
                index,
                topic: q.topic.clone(),
            })?;
            let difficulty = EnglishLevel::from_str(q.difficulty.trim()).map_err(|_| Rejection::UnknownDifficulty {
                index,
                got: q.difficulty.clone(),
            })?;
            Ok(GeneratedQuestion {
                question: q.question,
                options: q.options,
                correct_answer: q.correct_answer,
                explanation: q.explanation,
                topic,
                difficulty,
                passage: q.passage.filter(|p| !p.trim().is_empty()),
            })
        })
        .collect()
}

/// Semantic validation of a parsed question set against the request.
pub fn validate_questions(
    questions: &[GeneratedQuestion],
    expected_count: usize,
    requested_topic: Topic,
    level: EnglishLevel,
) -> Result<(), Rejection> {
    if questions.len() != expected_count {
        return Err(Rejection::WrongCount {
            expected: expected_count,
            got: questions.len(),
        });
    }

    for (index, q) in questions.iter().enumerate() {
        if q.options.len() != 4 {
            return Err(Rejection::WrongOptionCount {
                index,
                got: q.options.len(),
            });
        }
        let distinct: HashSet<&str> = q.options.iter().map(String::as_str).collect();
        if distinct.len() != q.options.len() {
            return Err(Rejection::DuplicateOptions { index });
        }
        if !q.options.iter().any(|o| o == &q.correct_answer) {
            return Err(Rejection::AnswerNotInOptions { index });
        }
        if q.explanation.trim().is_empty() {
            return Err(Rejection::EmptyExplanation { index });
        }
        if q.topic == Topic::Mixed {
            return Err(Rejection::UnknownTopic {
                index,
                topic: q.topic.to_string(),
            });
        }
        if requested_topic != Topic::Mixed && q.topic != requested_topic {
            return Err(Rejection::WrongTopic {
                index,
                topic: q.topic.to_string(),
            });
        }
        if q.difficulty != level {
            return Err(Rejection::WrongDifficulty {
                index,
                got: q.difficulty.to_string(),
                expected: level,
            });
        }
        match (q.topic, &q.passage) {
            (Topic::Reading, None) => return Err(Rejection::MissingPassage { index }),
            (Topic::Reading, Some(_)) => {}
            (_, Some(_)) => return Err(Rejection::UnexpectedPassage { index }),
            (_, None) => {}
        }
    }

    // Reading items produced together must reference one shared passage.
    let mut passages = questions
        .iter()
        .filter(|q| q.topic == Topic::Reading)
        .filter_map(|q| q.passage.as_deref());
    if let Some(first) = passages.next()
        && passages.any(|p| p != first)
    {
        return Err(Rejection::UnsharedPassage);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json(difficulty: &str) -> String {
        format!(
            r#"{{"questions": [{{
                "question": "Which sentence is correct?",
                "options": ["I am student", "I am a student", "I am the student", "I student"],
                "correct_answer": "I am a student",
                "explanation": "We use 'a' before singular countable nouns.",
                "topic": "Grammar",
                "difficulty": "{difficulty}"
            }}]}}"#
        )
    }

    fn parse_one(raw: &str) -> GeneratedQuestion {
        parse_questions(raw).unwrap().into_iter().next().unwrap()
    }

    #[test]
    fn test_parses_clean_json() {
        let question = parse_one(&sample_json("beginner"));
        assert_eq!(Topic::Grammar, question.topic);
        assert_eq!(EnglishLevel::Beginner, question.difficulty);
        assert_eq!("I am a student", question.correct_answer);
    }

    #[test]
    fn test_parses_json_inside_markdown_fence() {
        let raw = format!("Here is your quiz:\n```json\n{}\n```\nGood luck!", sample_json("beginner"));
        assert_eq!(1, parse_questions(&raw).unwrap().len());
    }

    #[test]
    fn test_parses_json_with_surrounding_prose() {
        let raw = format!("Sure! I created the quiz below.\n{}\nLet me know!", sample_json("beginner"));
        assert_eq!(1, parse_questions(&raw).unwrap().len());
    }

    #[test]
    fn test_tolerates_trailing_commas() {
        let raw = r#"{"questions": [{
            "question": "Pick the synonym of 'happy'",
            "options": ["glad", "sad", "angry", "tired",],
            "correct_answer": "glad",
            "explanation": "Glad means pleased.",
            "topic": "Vocabulary",
            "difficulty": "beginner",
        },]}"#;
        assert_eq!(1, parse_questions(raw).unwrap().len());
    }

    #[test]
    fn test_comma_inside_string_survives() {
        let raw = r#"{"questions": [{
            "question": "Choose: 'However,' is followed by what?",
            "options": ["a comma, always", "nothing", "a colon", "a dash"],
            "correct_answer": "a comma, always",
            "explanation": "The string 'a comma, always' contains a comma, }] and brackets.",
            "topic": "Grammar",
            "difficulty": "beginner"
        }]}"#;
        let question = parse_one(raw);
        assert_eq!("a comma, always", question.correct_answer);
    }

    #[test]
    fn test_accepts_bare_array_root() {
        let raw = r#"[{
            "question": "Past tense of 'go'?",
            "options": ["goed", "went", "gone", "goes"],
            "correct_answer": "went",
            "explanation": "'Went' is the irregular past tense.",
            "topic": "Tenses",
            "difficulty": "beginner"
        }]"#;
        assert_eq!(1, parse_questions(raw).unwrap().len());
    }

    #[test]
    fn test_rejects_prose_without_json() {
        assert_eq!(Err(Rejection::NoJson), parse_questions("I cannot help with that."));
    }

    #[test]
    fn test_rejects_unknown_topic() {
        let raw = sample_json("beginner").replace("Grammar", "Astronomy");
        assert!(matches!(parse_questions(&raw), Err(Rejection::UnknownTopic { .. })));
    }

    #[test]
    fn test_validate_rejects_wrong_count() {
        let questions = parse_questions(&sample_json("beginner")).unwrap();
        let result = validate_questions(&questions, 4, Topic::Grammar, EnglishLevel::Beginner);
        assert_eq!(Err(Rejection::WrongCount { expected: 4, got: 1 }), result);
    }

    #[test]
    fn test_validate_rejects_difficulty_mismatch() {
        let questions = parse_questions(&sample_json("advanced")).unwrap();
        let result = validate_questions(&questions, 1, Topic::Grammar, EnglishLevel::Beginner);
        assert!(matches!(result, Err(Rejection::WrongDifficulty { .. })));
    }

    #[test]
    fn test_validate_rejects_answer_not_in_options() {
        let mut questions = parse_questions(&sample_json("beginner")).unwrap();
        questions[0].correct_answer = "Not an option".to_owned();
        let result = validate_questions(&questions, 1, Topic::Grammar, EnglishLevel::Beginner);
        assert_eq!(Err(Rejection::AnswerNotInOptions { index: 0 }), result);
    }

    #[test]
    fn test_validate_rejects_duplicate_options() {
        let mut questions = parse_questions(&sample_json("beginner")).unwrap();
        questions[0].options[1] = questions[0].options[0].clone();
        let result = validate_questions(&questions, 1, Topic::Grammar, EnglishLevel::Beginner);
        assert_eq!(Err(Rejection::DuplicateOptions { index: 0 }), result);
    }

    #[test]
    fn test_validate_rejects_topic_mismatch() {
        let questions = parse_questions(&sample_json("beginner")).unwrap();
        let result = validate_questions(&questions, 1, Topic::Vocabulary, EnglishLevel::Beginner);
        assert!(matches!(result, Err(Rejection::WrongTopic { .. })));
    }

    #[test]
    fn test_validate_requires_shared_reading_passage() {
        let make = |passage: &str| GeneratedQuestion {
            question: "What does the author imply?".to_owned(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: "a".to_owned(),
            explanation: "Stated in the passage.".to_owned(),
            topic: Topic::Reading,
            difficulty: EnglishLevel::Beginner,
            passage: Some(passage.to_owned()),
        };
        let shared = vec![make("The same passage."), make("The same passage.")];
        assert!(validate_questions(&shared, 2, Topic::Reading, EnglishLevel::Beginner).is_ok());

        let split = vec![make("One passage."), make("Another passage.")];
        assert_eq!(
            Err(Rejection::UnsharedPassage),
            validate_questions(&split, 2, Topic::Reading, EnglishLevel::Beginner)
        );
    }

    #[test]
    fn test_validate_rejects_passage_outside_reading() {
        let mut questions = parse_questions(&sample_json("beginner")).unwrap();
        questions[0].passage = Some("A stray passage.".to_owned());
        let result = validate_questions(&questions, 1, Topic::Grammar, EnglishLevel::Beginner);
        assert_eq!(Err(Rejection::UnexpectedPassage { index: 0 }), result);
    }

    #[test]
    fn test_validate_rejects_missing_reading_passage() {
        let raw = sample_json("beginner").replace("Grammar", "Reading");
        let questions = parse_questions(&raw).unwrap();
        let result = validate_questions(&questions, 1, Topic::Reading, EnglishLevel::Beginner);
        assert_eq!(Err(Rejection::MissingPassage { index: 0 }), result);
    }
}
