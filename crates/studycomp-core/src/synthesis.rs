//! Question synthesis: curated option shuffling, deterministic mock
//! questions, and permissive parsing of generated content.
//!
//! Mock questions are reproducible. The seed for index `i` of topic `t` is
//! the XXH3-128 hash of the UTF-8 string `"{t}-{i}"`. The hash modulo the
//! template count picks the template, and the hash's 16 little-endian bytes,
//! written twice, seed a `ChaCha8Rng`. That generator draws three distinct
//! distractors (excluding the template's answer) and then shuffles the four
//! options.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use xxhash_rust::xxh3::xxh3_128;

use crate::model::{check_options, CuratedQuestion, Difficulty, Question, TopicContent, OPTION_COUNT};
use crate::traits::extract_fenced_block;

/// Fill-in-the-blank template: text with `{topic}` / `{difficulty}`
/// placeholders and the answer that completes it.
struct MockTemplate {
    text: &'static str,
    answer: &'static str,
}

const TEMPLATES: [MockTemplate; 12] = [
    MockTemplate {
        text: "The primary purpose of {topic} is ____.",
        answer: "Optimization",
    },
    MockTemplate {
        text: "When studying {topic} at a {difficulty} level, hiding internal details behind a clear interface is called ____.",
        answer: "Abstraction",
    },
    MockTemplate {
        text: "A {topic} design that keeps working when one component fails relies on ____.",
        answer: "Redundancy",
    },
    MockTemplate {
        text: "The ability of a {topic} solution to handle growing workloads is known as ____.",
        answer: "Scalability",
    },
    MockTemplate {
        text: "Splitting {topic} into independent, replaceable parts is an example of ____.",
        answer: "Modularity",
    },
    MockTemplate {
        text: "In {topic}, the delay between a request and its response is called ____.",
        answer: "Latency",
    },
    MockTemplate {
        text: "The amount of work a {topic} system completes per unit of time is its ____.",
        answer: "Throughput",
    },
    MockTemplate {
        text: "Bundling data together with the operations on it, a recurring idea in {topic}, is called ____.",
        answer: "Encapsulation",
    },
    MockTemplate {
        text: "Running several {topic} tasks so that their execution overlaps is called ____.",
        answer: "Concurrency",
    },
    MockTemplate {
        text: "({difficulty}) Protecting {topic} resources from unauthorised access falls under ____.",
        answer: "Security",
    },
    MockTemplate {
        text: "Meeting the legal and regulatory rules that apply to {topic} is a matter of ____.",
        answer: "Compliance",
    },
    MockTemplate {
        text: "Moving a {topic} solution to a different platform without rewriting it depends on ____.",
        answer: "Portability",
    },
];

/// Distractor pool. Every template answer is in here too; it is excluded
/// when drawing distractors for its own template.
const DISTRACTORS: [&str; 16] = [
    "Optimization",
    "Security",
    "Scalability",
    "Abstraction",
    "Modularity",
    "Redundancy",
    "Latency",
    "Throughput",
    "Encapsulation",
    "Concurrency",
    "Compliance",
    "Portability",
    "Interoperability",
    "Automation",
    "Reliability",
    "Documentation",
];

/// The stable hash behind mock question `index` for `topic_name`.
pub fn mock_seed(topic_name: &str, index: u64) -> u128 {
    xxh3_128(format!("{topic_name}-{index}").as_bytes())
}

fn seeded_rng(hash: u128) -> ChaCha8Rng {
    let bytes = hash.to_le_bytes();
    let mut seed = [0u8; 32];
    seed[..16].copy_from_slice(&bytes);
    seed[16..].copy_from_slice(&bytes);
    ChaCha8Rng::from_seed(seed)
}

/// Deterministically synthesise a mock question. The returned id is 0; the
/// engine renumbers questions once the quiz is assembled.
pub fn mock_question(topic_name: &str, index: u64, difficulty: Difficulty) -> Question {
    let hash = mock_seed(topic_name, index);
    let template = &TEMPLATES[(hash % TEMPLATES.len() as u128) as usize];
    let mut rng = seeded_rng(hash);

    let display_topic = if topic_name.trim().is_empty() {
        "this topic"
    } else {
        topic_name.trim()
    };
    let question = template
        .text
        .replace("{topic}", display_topic)
        .replace("{difficulty}", &difficulty.to_string());

    let candidates: Vec<&str> = DISTRACTORS
        .iter()
        .copied()
        .filter(|d| *d != template.answer)
        .collect();
    let mut options: Vec<String> = candidates
        .choose_multiple(&mut rng, OPTION_COUNT - 1)
        .map(|d| d.to_string())
        .collect();
    options.push(template.answer.to_string());
    options.shuffle(&mut rng);

    Question {
        id: 0,
        question,
        options,
        answer: template.answer.to_string(),
        image: None,
    }
}

/// Present a curated question with its options reordered by `rng`.
pub fn shuffle_curated<R: Rng + ?Sized>(curated: &CuratedQuestion, rng: &mut R) -> Question {
    let mut options = curated.options.clone();
    options.shuffle(rng);
    Question {
        id: 0,
        question: curated.question.clone(),
        options,
        answer: curated.answer.clone(),
        image: curated.image.clone(),
    }
}

// ---------------------------------------------------------------------------
// Generated content
// ---------------------------------------------------------------------------

/// Prompt asking a generator for `count` questions.
pub fn quiz_prompt(topic_name: &str, difficulty: Difficulty, count: usize) -> String {
    format!(
        "Write {count} {difficulty} multiple-choice questions about \"{topic_name}\" for a college student.\n\
         Return a JSON array. Each element must be an object with the keys \
         \"question\" (string), \"options\" (array of exactly 4 distinct strings) and \
         \"answer\" (string, identical to one of the options)."
    )
}

/// Prompt asking a generator to explain a topic.
pub fn explanation_prompt(topic_name: &str) -> String {
    format!(
        "Explain \"{topic_name}\" for a college student.\n\
         Return a JSON object with the keys \"title\" (string), \"explanation\" (string), \
         \"key_points\" (array of strings) and \"example\" (string)."
    )
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    #[serde(alias = "q", alias = "prompt")]
    question: String,
    options: Vec<String>,
    #[serde(alias = "a", alias = "correct_answer")]
    answer: String,
    #[serde(default, alias = "img")]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedQuiz {
    List(Vec<GeneratedQuestion>),
    Wrapped { questions: Vec<GeneratedQuestion> },
}

/// Parse generator output into questions.
///
/// Accepts raw JSON or JSON inside a markdown fence, either as an array or
/// as an object with a `questions` array. Items that break the option
/// invariants are dropped; a payload that is not JSON at all is an error.
pub fn parse_generated_questions(response: &str) -> Result<Vec<Question>> {
    let payload = extract_fenced_block(response);
    let parsed: GeneratedQuiz =
        serde_json::from_str(&payload).context("generated quiz is not valid JSON")?;
    let items = match parsed {
        GeneratedQuiz::List(items) => items,
        GeneratedQuiz::Wrapped { questions } => questions,
    };

    let questions = items
        .into_iter()
        .filter_map(|item| {
            let options: Vec<String> = item.options.iter().map(|o| o.trim().to_string()).collect();
            let answer = item.answer.trim().to_string();
            let question = item.question.trim().to_string();
            if question.is_empty() {
                return None;
            }
            if let Err(problem) = check_options(&options, &answer) {
                tracing::debug!("dropping generated question '{question}': {problem}");
                return None;
            }
            Some(Question {
                id: 0,
                question,
                options,
                answer,
                image: item.image.filter(|url| !url.trim().is_empty()),
            })
        })
        .collect();

    Ok(questions)
}

/// Parse generator output into topic content.
pub fn parse_generated_content(response: &str) -> Result<TopicContent> {
    let payload = extract_fenced_block(response);
    let content: TopicContent =
        serde_json::from_str(&payload).context("generated explanation is not valid JSON")?;
    anyhow::ensure!(
        !content.title.trim().is_empty() && !content.explanation.trim().is_empty(),
        "generated explanation is missing a title or body"
    );
    Ok(content)
}
