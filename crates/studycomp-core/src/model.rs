//! Core data model types for studycomp.
//!
//! Questions handed to students, curated knowledge-base records, and the
//! quiz score records read from the progress store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quiz difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Easy")]
    Easy,
    #[default]
    #[serde(alias = "Moderate", alias = "medium", alias = "Medium")]
    Moderate,
    #[serde(alias = "Hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Moderate, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Moderate => write!(f, "Moderate"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "moderate" | "medium" => Ok(Difficulty::Moderate),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A multiple-choice question as presented to a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position in the quiz.
    pub id: u32,
    /// The question prompt.
    pub question: String,
    /// Answer options, in presentation order.
    pub options: Vec<String>,
    /// The correct option, verbatim.
    pub answer: String,
    /// Optional illustration URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Check the option invariants shared by curated, generated, and mock
/// questions: exactly [`OPTION_COUNT`] distinct options, one of which is the
/// answer. Returns a description of the first violation found.
pub fn check_options(options: &[String], answer: &str) -> Result<(), String> {
    if options.len() != OPTION_COUNT {
        return Err(format!(
            "expected {OPTION_COUNT} options, found {}",
            options.len()
        ));
    }
    for (i, opt) in options.iter().enumerate() {
        if opt.trim().is_empty() {
            return Err(format!("option {} is empty", i + 1));
        }
        if options[..i].contains(opt) {
            return Err(format!("duplicate option: {opt}"));
        }
    }
    if !options.iter().any(|o| o == answer) {
        return Err(format!("answer '{answer}' is not among the options"));
    }
    Ok(())
}

/// A hand-authored question stored in the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Curated questions for one topic, split by difficulty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizBank {
    #[serde(default)]
    pub easy: Vec<CuratedQuestion>,
    #[serde(default)]
    pub moderate: Vec<CuratedQuestion>,
    #[serde(default)]
    pub hard: Vec<CuratedQuestion>,
}

impl QuizBank {
    /// Questions authored for exactly this difficulty.
    pub fn questions(&self, difficulty: Difficulty) -> &[CuratedQuestion] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Moderate => &self.moderate,
            Difficulty::Hard => &self.hard,
        }
    }

    /// The pool used for a quiz at `difficulty`.
    ///
    /// An empty exact-difficulty pool is replaced by Easy followed by
    /// Moderate.
    pub fn pool(&self, difficulty: Difficulty) -> Vec<&CuratedQuestion> {
        let exact = self.questions(difficulty);
        if !exact.is_empty() {
            return exact.iter().collect();
        }
        self.easy.iter().chain(self.moderate.iter()).collect()
    }

    pub fn len(&self) -> usize {
        self.easy.len() + self.moderate.len() + self.hard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Explanation content shown on a topic's learning page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicContent {
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// One knowledge-base topic: explanation content plus its quiz bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub quiz: QuizBank,
}

impl KnowledgeEntry {
    pub fn content(&self) -> TopicContent {
        TopicContent {
            title: self.title.clone(),
            explanation: self.explanation.clone(),
            key_points: self.key_points.clone(),
            example: self.example.clone(),
            summary: self.summary.clone(),
        }
    }
}

/// A stored quiz result for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    #[serde(default)]
    pub topic_id: String,
    pub score: u32,
    pub total: u32,
    #[serde(default)]
    pub timestamp: String,
}

impl TopicRecord {
    pub fn new(topic_id: &str, score: u32, total: u32) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            score,
            total,
            timestamp: String::new(),
        }
    }

    /// Percentage score, or `None` when the quiz had no questions.
    pub fn percent(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.score.min(self.total) as f64 / self.total as f64 * 100.0)
        }
    }
}
