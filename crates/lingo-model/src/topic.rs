use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

use crate::user::EnglishLevel;

/// The fixed topic set. "Mixed" asks the server to pick topics itself and
/// never appears on an individual question.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Topic {
    Grammar,
    Vocabulary,
    Reading,
    Tenses,
    Pronunciation,
    Mixed,
}

impl Topic {
    /// Topics a quiz can actually be generated for.
    #[must_use]
    pub fn generating() -> Vec<Topic> {
        Topic::iter().filter(|t| *t != Topic::Mixed).collect()
    }

    #[must_use]
    pub fn subtopics(self) -> &'static [&'static str] {
        match self {
            Self::Grammar => &["Articles", "Prepositions", "Conditionals", "Passive Voice", "Reported Speech"],
            Self::Vocabulary => &["Synonyms", "Antonyms", "Idioms", "Phrasal Verbs", "Word Formation"],
            Self::Reading => &["Main Ideas", "Details", "Inference", "Vocabulary in Context"],
            Self::Tenses => &["Present Tenses", "Past Tenses", "Future Forms", "Perfect Aspect"],
            Self::Pronunciation => &["Word Stress", "Silent Letters", "Minimal Pairs", "Rhymes"],
            Self::Mixed => &["All topics combined"],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicInfo {
    pub name: String,
    pub subtopics: Vec<String>,
    pub levels: Vec<EnglishLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicCatalog {
    pub topics: Vec<TopicInfo>,
}

impl TopicCatalog {
    /// Every topic with its subtopics; all topics are offered at all levels.
    #[must_use]
    pub fn all() -> Self {
        let topics = Topic::iter()
            .map(|topic| TopicInfo {
                name: topic.to_string(),
                subtopics: topic.subtopics().iter().map(|s| (*s).to_owned()).collect(),
                levels: vec![
                    EnglishLevel::Beginner,
                    EnglishLevel::Intermediate,
                    EnglishLevel::Advanced,
                ],
            })
            .collect();
        Self { topics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_serialization_uses_display_case() {
        assert_eq!(r#""Grammar""#, serde_json::to_string(&Topic::Grammar).unwrap());
        assert_eq!(Topic::Reading, serde_json::from_str::<Topic>(r#""Reading""#).unwrap());
    }

    #[test]
    fn test_generating_excludes_mixed() {
        let topics = Topic::generating();
        assert_eq!(5, topics.len());
        assert!(!topics.contains(&Topic::Mixed));
    }

    #[test]
    fn test_catalog_covers_all_topics() {
        let catalog = TopicCatalog::all();
        assert_eq!(6, catalog.topics.len());
        assert!(catalog.topics.iter().all(|t| t.levels.len() == 3));
        assert!(catalog.topics.iter().all(|t| !t.subtopics.is_empty()));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!(Topic::from_str("Quantum Mechanics").is_err());
        assert_eq!(Topic::Tenses, Topic::from_str("Tenses").unwrap());
    }
}
