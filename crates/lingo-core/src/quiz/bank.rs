//! Static fallback bank. When the model is unreachable or keeps producing
//! rejected output, quizzes are drawn from this curated set so the request
//! never fails. Indexed by (topic, level); Reading items are grouped into
//! passage sets.

use rand::rng;
use rand::seq::SliceRandom;

use lingo_model::quiz::GeneratedQuestion;
use lingo_model::topic::Topic;
use lingo_model::user::EnglishLevel;

struct BankEntry {
    topic: Topic,
    level: EnglishLevel,
    question: &'static str,
    options: [&'static str; 4],
    correct: &'static str,
    explanation: &'static str,
    passage: Option<&'static str>,
}

const READING_BEGINNER: &str = "Tom has a small dog named Max. Every morning they walk in the park near Tom's \
house. Max likes to run after birds, but he never catches them. After the walk, Tom gives Max some water and a \
little food. Then Tom goes to work and Max sleeps by the window.";

const READING_INTERMEDIATE: &str = "Libraries are changing quickly. Many now lend e-books, laptops, and even \
musical instruments alongside printed novels. Some libraries host coding clubs and language exchanges in rooms \
that once held only silent readers. Supporters say these changes keep libraries useful in the digital age, while \
critics worry that noisy activities distract people who still come simply to read.";

const READING_ADVANCED: &str = "The placebo effect illustrates how expectation can shape physiology. In clinical \
trials, patients given inert pills frequently report genuine relief, particularly for pain and anxiety. \
Researchers once dismissed this as mere imagination, yet brain imaging has shown that placebos can trigger the \
release of endorphins, the body's own analgesics. The finding complicates drug development: a new medicine must \
outperform not just the absence of treatment but the healing power of belief itself.";

#[rustfmt::skip]
static BANK: &[BankEntry] = &[
    // Grammar / beginner
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Beginner,
        question: "Which sentence is correct?",
        options: ["I am student", "I am a student", "I am the student", "I student"],
        correct: "I am a student",
        explanation: "We use 'a' before singular countable nouns when introducing them.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Beginner,
        question: "Choose the correct article: ___ apple a day keeps the doctor away.",
        options: ["A", "An", "The", "No article"],
        correct: "An",
        explanation: "'An' is used before words that begin with a vowel sound.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Beginner,
        question: "She ___ to school every day.",
        options: ["go", "goes", "going", "gone"],
        correct: "goes",
        explanation: "Third-person singular verbs take -s in the present simple.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Beginner,
        question: "Which word is a preposition?",
        options: ["quickly", "under", "happy", "run"],
        correct: "under",
        explanation: "'Under' describes position, which is what prepositions do.",
        passage: None },

    // Grammar / intermediate
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Intermediate,
        question: "If I ___ you, I would study harder.",
        options: ["am", "was", "were", "be"],
        correct: "were",
        explanation: "In second conditional sentences, we use 'were' for all persons after 'if'.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Intermediate,
        question: "The report ___ by the manager yesterday.",
        options: ["was written", "wrote", "is writing", "has written"],
        correct: "was written",
        explanation: "A passive past action takes 'was/were' plus the past participle.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Intermediate,
        question: "She asked me where ___.",
        options: ["do I live", "I lived", "did I live", "am I living"],
        correct: "I lived",
        explanation: "Reported questions use statement word order and backshift the tense.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Intermediate,
        question: "You ___ have seen him yesterday; he was abroad.",
        options: ["mustn't", "can't", "shouldn't", "needn't"],
        correct: "can't",
        explanation: "'Can't have' expresses certainty that something was impossible.",
        passage: None },

    // Grammar / advanced
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Advanced,
        question: "___ had the meeting started when the fire alarm rang.",
        options: ["Hardly", "Rarely", "Seldom", "Never"],
        correct: "Hardly",
        explanation: "'Hardly had ... when' is the fixed inverted pattern for one event interrupting another.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Advanced,
        question: "The committee insisted that every proposal ___ reviewed twice.",
        options: ["is", "was", "be", "were"],
        correct: "be",
        explanation: "Verbs of demand take the subjunctive: the bare form 'be'.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Advanced,
        question: "Which sentence uses a non-defining relative clause correctly?",
        options: [
            "My brother who lives in Rome is a chef.",
            "My brother, who lives in Rome, is a chef.",
            "My brother which lives in Rome is a chef.",
            "My brother, that lives in Rome, is a chef.",
        ],
        correct: "My brother, who lives in Rome, is a chef.",
        explanation: "Non-defining clauses are set off by commas and use 'who', never 'that'.",
        passage: None },
    BankEntry { topic: Topic::Grammar, level: EnglishLevel::Advanced,
        question: "But for your help, I ___ the deadline.",
        options: ["would have missed", "would miss", "had missed", "missed"],
        correct: "would have missed",
        explanation: "'But for' introduces an unreal past condition, so the third conditional follows.",
        passage: None },

    // Vocabulary / beginner
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Beginner,
        question: "What is the opposite of 'big'?",
        options: ["tall", "small", "wide", "heavy"],
        correct: "small",
        explanation: "'Small' is the direct antonym of 'big'.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Beginner,
        question: "Which word means the same as 'happy'?",
        options: ["glad", "angry", "tired", "hungry"],
        correct: "glad",
        explanation: "'Glad' is a synonym of 'happy'.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Beginner,
        question: "Where do you buy bread?",
        options: ["a bakery", "a library", "a pharmacy", "a garage"],
        correct: "a bakery",
        explanation: "A bakery is the shop that makes and sells bread.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Beginner,
        question: "Which word is a color?",
        options: ["apple", "purple", "circle", "people"],
        correct: "purple",
        explanation: "'Purple' names a color; the others name things or shapes.",
        passage: None },

    // Vocabulary / intermediate
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Intermediate,
        question: "To 'put off' a meeting means to ___ it.",
        options: ["cancel", "postpone", "organize", "attend"],
        correct: "postpone",
        explanation: "The phrasal verb 'put off' means to delay to a later time.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Intermediate,
        question: "Which word means 'to make something better'?",
        options: ["improve", "improvise", "impose", "imply"],
        correct: "improve",
        explanation: "'Improve' means to make or become better.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Intermediate,
        question: "He was ___ exhausted after the long flight.",
        options: ["strongly", "utterly", "heavily", "highly"],
        correct: "utterly",
        explanation: "'Utterly' collocates with extreme adjectives like 'exhausted'.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Intermediate,
        question: "A person who buys something is a ___.",
        options: ["customer", "costumer", "seller", "waiter"],
        correct: "customer",
        explanation: "'Customer' means buyer; 'costumer' is a common misspelling trap.",
        passage: None },

    // Vocabulary / advanced
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Advanced,
        question: "The new policy has been ___ by the committee.",
        options: ["ratified", "justified", "clarified", "nullified"],
        correct: "ratified",
        explanation: "'Ratified' means officially approved or confirmed, which fits the context.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Advanced,
        question: "Her argument was so ___ that nobody objected.",
        options: ["cogent", "inert", "verbose", "placid"],
        correct: "cogent",
        explanation: "'Cogent' describes reasoning that is clear and convincing.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Advanced,
        question: "To 'exacerbate' a problem is to ___ it.",
        options: ["solve", "worsen", "hide", "study"],
        correct: "worsen",
        explanation: "'Exacerbate' means to make a bad situation worse.",
        passage: None },
    BankEntry { topic: Topic::Vocabulary, level: EnglishLevel::Advanced,
        question: "Which word describes someone who talks very little?",
        options: ["taciturn", "garrulous", "gregarious", "voluble"],
        correct: "taciturn",
        explanation: "'Taciturn' means habitually quiet; the other three describe talkative or sociable people.",
        passage: None },

    // Tenses / beginner
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Beginner,
        question: "What is the past tense of 'go'?",
        options: ["goed", "went", "gone", "goes"],
        correct: "went",
        explanation: "'Went' is the past tense of the irregular verb 'go'.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Beginner,
        question: "I ___ breakfast at 7 o'clock every morning.",
        options: ["eat", "eats", "ate", "eaten"],
        correct: "eat",
        explanation: "Habits use the present simple; 'I' takes the base form.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Beginner,
        question: "Look! It ___ outside.",
        options: ["rains", "is raining", "rained", "has rained"],
        correct: "is raining",
        explanation: "'Look!' signals an action happening right now, so the present continuous is used.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Beginner,
        question: "They ___ to the cinema last night.",
        options: ["go", "goes", "went", "gone"],
        correct: "went",
        explanation: "'Last night' places the action in the finished past.",
        passage: None },

    // Tenses / intermediate
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Intermediate,
        question: "By the time we arrived, the film ___.",
        options: ["already started", "has already started", "had already started", "was already starting"],
        correct: "had already started",
        explanation: "The past perfect marks the earlier of two past events.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Intermediate,
        question: "She ___ in Berlin since 2015.",
        options: ["lives", "is living", "has lived", "lived"],
        correct: "has lived",
        explanation: "'Since' with an unfinished period takes the present perfect.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Intermediate,
        question: "This time tomorrow, I ___ over the Atlantic.",
        options: ["fly", "will fly", "will be flying", "am flying"],
        correct: "will be flying",
        explanation: "An action in progress at a future moment takes the future continuous.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Intermediate,
        question: "I ___ tennis when it started to rain.",
        options: ["played", "was playing", "have played", "play"],
        correct: "was playing",
        explanation: "The past continuous describes the longer action interrupted by a shorter one.",
        passage: None },

    // Tenses / advanced
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Advanced,
        question: "By next June, she ___ here for a decade.",
        options: ["will work", "will be working", "will have been working", "has been working"],
        correct: "will have been working",
        explanation: "Duration up to a future point takes the future perfect continuous.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Advanced,
        question: "He talks as if he ___ everything.",
        options: ["knows", "knew", "had known", "would know"],
        correct: "knew",
        explanation: "'As if' with an unreal present meaning takes the past simple.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Advanced,
        question: "No sooner ___ the door than the phone rang.",
        options: ["I had closed", "had I closed", "I closed", "did I closed"],
        correct: "had I closed",
        explanation: "'No sooner' at the start of a sentence forces inversion with the past perfect.",
        passage: None },
    BankEntry { topic: Topic::Tenses, level: EnglishLevel::Advanced,
        question: "I'd rather you ___ anything to her yet.",
        options: ["don't say", "didn't say", "won't say", "haven't said"],
        correct: "didn't say",
        explanation: "'Would rather' plus a different subject takes the past simple with present meaning.",
        passage: None },

    // Pronunciation / beginner
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Beginner,
        question: "Which word rhymes with 'cat'?",
        options: ["cut", "hat", "cart", "coat"],
        correct: "hat",
        explanation: "'Hat' shares the /æt/ ending with 'cat'.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Beginner,
        question: "Which word has a silent letter?",
        options: ["knee", "tree", "free", "see"],
        correct: "knee",
        explanation: "The 'k' in 'knee' is not pronounced.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Beginner,
        question: "How many syllables does 'banana' have?",
        options: ["two", "three", "four", "one"],
        correct: "three",
        explanation: "Ba-na-na breaks into three syllables.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Beginner,
        question: "Which word starts with the same sound as 'ship'?",
        options: ["chip", "sheep", "jeep", "zip"],
        correct: "sheep",
        explanation: "'Ship' and 'sheep' both start with the /ʃ/ sound.",
        passage: None },

    // Pronunciation / intermediate
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Intermediate,
        question: "In which word is the stress on the second syllable?",
        options: ["begin", "open", "water", "under"],
        correct: "begin",
        explanation: "'Begin' is stressed be-GIN; the others stress the first syllable.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Intermediate,
        question: "Which word has a silent 'b'?",
        options: ["climb", "club", "cab", "crab"],
        correct: "climb",
        explanation: "A final 'mb' is pronounced /m/, so the 'b' in 'climb' is silent.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Intermediate,
        question: "Which word does NOT rhyme with the others?",
        options: ["though", "through", "dough", "go"],
        correct: "through",
        explanation: "'Through' ends in /uː/; the others end in /oʊ/.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Intermediate,
        question: "The '-ed' in 'wanted' is pronounced as ___.",
        options: ["/t/", "/d/", "/ɪd/", "it is silent"],
        correct: "/ɪd/",
        explanation: "After 't' or 'd', the past ending is a full extra syllable /ɪd/.",
        passage: None },

    // Pronunciation / advanced
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Advanced,
        question: "In 'comfortable', how many syllables do most native speakers pronounce?",
        options: ["two", "three", "four", "five"],
        correct: "three",
        explanation: "The word compresses to /ˈkʌmf.tə.bəl/ in everyday speech.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Advanced,
        question: "Which pair are homophones?",
        options: [
            "'complement' and 'compliment'",
            "'desert' and 'dessert'",
            "'quite' and 'quiet'",
            "'lose' and 'loose'",
        ],
        correct: "'complement' and 'compliment'",
        explanation: "Both are pronounced /ˈkɒmplɪmənt/; the other pairs differ in sound.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Advanced,
        question: "Where is the primary stress in 'entrepreneur'?",
        options: ["first syllable", "second syllable", "third syllable", "final syllable"],
        correct: "final syllable",
        explanation: "The word is stressed entrepre-NEUR.",
        passage: None },
    BankEntry { topic: Topic::Pronunciation, level: EnglishLevel::Advanced,
        question: "Which word contains the /ʒ/ sound?",
        options: ["measure", "mission", "march", "mask"],
        correct: "measure",
        explanation: "The 's' in 'measure' is the voiced /ʒ/, as in 'vision'.",
        passage: None },

    // Reading / beginner (one shared passage)
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Beginner,
        question: "What is the dog's name?",
        options: ["Tom", "Max", "Buddy", "Rex"],
        correct: "Max",
        explanation: "The first sentence names the dog Max.",
        passage: Some(READING_BEGINNER) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Beginner,
        question: "Where do Tom and Max walk?",
        options: ["on the beach", "in the park", "in the forest", "around the school"],
        correct: "in the park",
        explanation: "They walk in the park near Tom's house.",
        passage: Some(READING_BEGINNER) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Beginner,
        question: "What does Max chase in the park?",
        options: ["cats", "birds", "cars", "children"],
        correct: "birds",
        explanation: "Max likes to run after birds but never catches them.",
        passage: Some(READING_BEGINNER) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Beginner,
        question: "What does Max get after the walk?",
        options: ["a new toy", "water and food", "a bath", "another walk"],
        correct: "water and food",
        explanation: "Tom gives Max some water and a little food after the walk.",
        passage: Some(READING_BEGINNER) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Beginner,
        question: "When do Tom and Max go for their walk?",
        options: ["in the morning", "at noon", "in the evening", "at night"],
        correct: "in the morning",
        explanation: "The passage says they walk every morning.",
        passage: Some(READING_BEGINNER) },

    // Reading / intermediate
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Intermediate,
        question: "What is the main idea of the passage?",
        options: [
            "Libraries are closing everywhere",
            "Libraries are expanding beyond lending books",
            "Printed novels are no longer popular",
            "Coding clubs have replaced reading",
        ],
        correct: "Libraries are expanding beyond lending books",
        explanation: "The passage describes libraries adding services beyond printed books.",
        passage: Some(READING_INTERMEDIATE) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Intermediate,
        question: "What do critics worry about?",
        options: [
            "the cost of e-books",
            "noise disturbing readers",
            "a shortage of laptops",
            "language exchanges being too difficult",
        ],
        correct: "noise disturbing readers",
        explanation: "Critics worry that noisy activities distract people who come to read.",
        passage: Some(READING_INTERMEDIATE) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Intermediate,
        question: "Which item is mentioned as something libraries now lend?",
        options: ["bicycles", "musical instruments", "cooking tools", "cameras"],
        correct: "musical instruments",
        explanation: "The passage lists e-books, laptops, and musical instruments.",
        passage: Some(READING_INTERMEDIATE) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Intermediate,
        question: "The word 'host' in the passage is closest in meaning to ___.",
        options: ["organize", "visit", "cancel", "attend"],
        correct: "organize",
        explanation: "Libraries 'host' clubs in the sense of organizing and housing them.",
        passage: Some(READING_INTERMEDIATE) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Intermediate,
        question: "According to supporters, the changes keep libraries ___.",
        options: ["quieter", "useful", "cheaper", "smaller"],
        correct: "useful",
        explanation: "Supporters say the changes keep libraries useful in the digital age.",
        passage: Some(READING_INTERMEDIATE) },

    // Reading / advanced
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Advanced,
        question: "What central phenomenon does the passage describe?",
        options: [
            "the danger of inert pills",
            "how expectation can produce real physiological effects",
            "why brain imaging is unreliable",
            "the decline of drug development",
        ],
        correct: "how expectation can produce real physiological effects",
        explanation: "The placebo effect is introduced as expectation shaping physiology.",
        passage: Some(READING_ADVANCED) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Advanced,
        question: "What did brain imaging reveal about placebos?",
        options: [
            "they have no measurable effect",
            "they can trigger endorphin release",
            "they damage the brain",
            "they only work for anxiety",
        ],
        correct: "they can trigger endorphin release",
        explanation: "Imaging showed placebos can trigger the release of endorphins.",
        passage: Some(READING_ADVANCED) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Advanced,
        question: "The word 'analgesics' most nearly means ___.",
        options: ["stimulants", "painkillers", "antibiotics", "sedatives"],
        correct: "painkillers",
        explanation: "Endorphins are called the body's own analgesics, meaning painkillers.",
        passage: Some(READING_ADVANCED) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Advanced,
        question: "Why does the placebo effect complicate drug development?",
        options: [
            "a new drug must outperform belief, not just no treatment",
            "patients refuse inert pills",
            "imaging studies are too expensive",
            "endorphins interfere with medicines",
        ],
        correct: "a new drug must outperform belief, not just no treatment",
        explanation: "The final sentence states that medicines must beat the healing power of belief.",
        passage: Some(READING_ADVANCED) },
    BankEntry { topic: Topic::Reading, level: EnglishLevel::Advanced,
        question: "How did researchers initially regard placebo reports?",
        options: [
            "as proof of fraud",
            "as mere imagination",
            "as evidence of endorphins",
            "as a marketing problem",
        ],
        correct: "as mere imagination",
        explanation: "Researchers once dismissed the reports as mere imagination.",
        passage: Some(READING_ADVANCED) },
];

fn adjacent_levels(level: EnglishLevel) -> [Option<EnglishLevel>; 2] {
    match level {
        EnglishLevel::Beginner => [Some(EnglishLevel::Intermediate), Some(EnglishLevel::Advanced)],
        EnglishLevel::Intermediate => [Some(EnglishLevel::Beginner), Some(EnglishLevel::Advanced)],
        EnglishLevel::Advanced => [Some(EnglishLevel::Intermediate), Some(EnglishLevel::Beginner)],
    }
}

fn to_question(entry: &BankEntry) -> GeneratedQuestion {
    GeneratedQuestion {
        question: entry.question.to_owned(),
        options: entry.options.iter().map(|o| (*o).to_owned()).collect(),
        correct_answer: entry.correct.to_owned(),
        explanation: entry.explanation.to_owned(),
        topic: entry.topic,
        difficulty: entry.level,
        passage: entry.passage.map(str::to_owned),
    }
}

fn matches_topic(entry: &BankEntry, topic: Topic) -> bool {
    match topic {
        // Mixed quizzes draw from the discrete topics; Reading sets are
        // excluded so a mixed quiz never carries competing passages.
        Topic::Mixed => entry.topic != Topic::Reading,
        requested => entry.topic == requested,
    }
}

/// Reading selection is per passage set: all returned items must share one
/// passage, so a set from an adjacent level replaces the requested level's
/// set instead of padding it. The first set (requested level first) with
/// enough unseen questions wins; when none covers the request, the
/// requested level's set is served in full, re-admitting avoided questions
/// and capping the quiz at the set size rather than mixing passages.
fn select_reading(level: EnglishLevel, n: usize, avoid: &[String]) -> Vec<GeneratedQuestion> {
    let mut levels = vec![Some(level)];
    levels.extend(adjacent_levels(level));

    let sets: Vec<Vec<&BankEntry>> = levels
        .into_iter()
        .flatten()
        .map(|set_level| {
            BANK.iter()
                .filter(|e| e.topic == Topic::Reading && e.level == set_level)
                .collect()
        })
        .collect();

    for set in &sets {
        let mut unseen: Vec<&BankEntry> = set
            .iter()
            .copied()
            .filter(|e| !avoid.iter().any(|seen| seen == e.question))
            .collect();
        if unseen.len() >= n {
            let mut rng = rng();
            unseen.shuffle(&mut rng);
            drop(rng);
            return unseen.into_iter().take(n).map(to_question).collect();
        }
    }

    let Some(set) = sets.first() else {
        return Vec::new();
    };
    let (mut picked, seen): (Vec<&BankEntry>, Vec<&BankEntry>) = set
        .iter()
        .copied()
        .partition(|e| !avoid.iter().any(|s| s == e.question));
    let mut rng = rng();
    picked.shuffle(&mut rng);
    drop(rng);
    picked.extend(seen);
    picked.into_iter().take(n).map(to_question).collect()
}

fn take_level(
    out: &mut Vec<GeneratedQuestion>,
    topic: Topic,
    level: EnglishLevel,
    n: usize,
    avoid: &[String],
) {
    let mut candidates: Vec<&BankEntry> = BANK
        .iter()
        .filter(|e| e.level == level && matches_topic(e, topic))
        .filter(|e| !avoid.iter().any(|seen| seen == e.question))
        .filter(|e| !out.iter().any(|taken| taken.question == e.question))
        .collect();

    let mut rng = rng();
    candidates.shuffle(&mut rng);
    drop(rng);

    for entry in candidates {
        if out.len() >= n {
            return;
        }
        out.push(to_question(entry));
    }
}

/// Draws `n` questions for (topic, level), skipping anything in the
/// avoid-list, padding first from adjacent levels and finally re-admitting
/// avoided questions rather than coming up short. Reading requests take
/// the single-passage path and may return fewer than `n` items when the
/// largest passage set is smaller. Returns an empty vec only when the
/// bank has no entries at all for the topic.
#[must_use]
pub fn select_questions(topic: Topic, level: EnglishLevel, n: usize, avoid: &[String]) -> Vec<GeneratedQuestion> {
    if topic == Topic::Reading {
        return select_reading(level, n, avoid);
    }
    let mut out = Vec::with_capacity(n);
    take_level(&mut out, topic, level, n, avoid);
    for adjacent in adjacent_levels(level).into_iter().flatten() {
        if out.len() >= n {
            break;
        }
        take_level(&mut out, topic, adjacent, n, avoid);
    }
    if out.len() < n {
        // The avoid-list is best-effort; a short quiz would be worse.
        take_level(&mut out, topic, level, n, &[]);
        for adjacent in adjacent_levels(level).into_iter().flatten() {
            if out.len() >= n {
                break;
            }
            take_level(&mut out, topic, adjacent, n, &[]);
        }
    }
    out
}
