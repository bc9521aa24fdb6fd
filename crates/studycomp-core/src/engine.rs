//! Quiz engine.
//!
//! Assembles quizzes from curated questions, an optional text generator, and
//! deterministic mock filler, and serves topic explanations. A generator is
//! strictly best-effort: failures, timeouts, and malformed output are logged
//! and replaced by offline content, never returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;

use crate::error::ProviderError;
use crate::knowledge::KnowledgeBase;
use crate::model::{Difficulty, Question, TopicContent};
use crate::syllabus::Syllabus;
use crate::synthesis::{
    explanation_prompt, mock_question, parse_generated_content, parse_generated_questions,
    quiz_prompt, shuffle_curated,
};
use crate::traits::{GenerateRequest, TextGenerator};

/// Longest wait between generator attempts, including server-requested ones.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Configuration for the quiz engine.
#[derive(Debug, Clone)]
pub struct QuizEngineConfig {
    /// Model identifier passed to the generator.
    pub model: String,
    /// Temperature for generation.
    pub temperature: f64,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Upper bound on one generator call.
    pub generation_timeout: Duration,
    /// Retries on transient generator errors.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
}

impl Default for QuizEngineConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 2048,
            generation_timeout: Duration::from_secs(20),
            max_retries: 1,
            retry_delay: Duration::from_millis(500),
            system_prompt_override: None,
        }
    }
}

/// What to build a quiz for.
#[derive(Debug, Clone)]
pub struct QuizRequest {
    /// Knowledge-base key of the topic.
    pub topic_id: String,
    /// Display name; also seeds mock questions.
    pub topic_name: String,
    pub difficulty: Difficulty,
    pub num_questions: usize,
    /// Added to mock indices so compound quizzes do not repeat filler.
    pub seed_offset: u64,
}

impl QuizRequest {
    pub fn new(topic_id: &str, topic_name: &str, difficulty: Difficulty, num_questions: usize) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            topic_name: topic_name.to_string(),
            difficulty,
            num_questions,
            seed_offset: 0,
        }
    }

    pub fn with_seed_offset(mut self, seed_offset: u64) -> Self {
        self.seed_offset = seed_offset;
        self
    }
}

/// The quiz engine.
pub struct QuizEngine {
    knowledge: Arc<KnowledgeBase>,
    generator: Option<Arc<dyn TextGenerator>>,
    config: QuizEngineConfig,
}

impl QuizEngine {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        generator: Option<Arc<dyn TextGenerator>>,
        config: QuizEngineConfig,
    ) -> Self {
        Self {
            knowledge,
            generator,
            config,
        }
    }

    /// An engine with no generator: curated questions plus mock filler.
    pub fn offline(knowledge: Arc<KnowledgeBase>) -> Self {
        Self::new(knowledge, None, QuizEngineConfig::default())
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Build a quiz of exactly `request.num_questions` questions.
    pub async fn generate_quiz(&self, request: &QuizRequest) -> Vec<Question> {
        let wanted = request.num_questions;
        let mut questions: Vec<Question> = {
            let mut rng = rand::thread_rng();
            self.knowledge
                .quiz_pool(&request.topic_id, request.difficulty)
                .into_iter()
                .take(wanted)
                .map(|q| shuffle_curated(q, &mut rng))
                .collect()
        };
        tracing::debug!(
            topic_id = %request.topic_id,
            difficulty = %request.difficulty,
            curated = questions.len(),
            wanted,
            "resolved curated pool"
        );

        if questions.len() < wanted {
            if let Some(generator) = &self.generator {
                let shortfall = wanted - questions.len();
                let generated = self
                    .generate_questions(generator.as_ref(), request, shortfall)
                    .await;
                questions.extend(generated.into_iter().take(shortfall));
            }
        }

        let mut fill = 0u64;
        while questions.len() < wanted {
            let index = fill + request.seed_offset;
            questions.push(mock_question(&request.topic_name, index, request.difficulty));
            fill += 1;
        }

        questions.truncate(wanted);
        renumber(&mut questions);
        questions
    }

    /// Explanation content for a topic: generated when possible, else the
    /// curated entry, else a generic placeholder.
    pub async fn explain(&self, topic_id: &str, topic_name: &str) -> TopicContent {
        if let Some(generator) = &self.generator {
            match self.call_generator(generator.as_ref(), explanation_prompt(topic_name)).await {
                Ok(text) => match parse_generated_content(&text) {
                    Ok(content) => return content,
                    Err(e) => {
                        tracing::warn!(topic_id, "discarding generated explanation: {e:#}");
                    }
                },
                Err(e) => {
                    tracing::warn!(topic_id, "explanation generation failed: {e:#}");
                }
            }
        }

        match self.knowledge.get(topic_id) {
            Some(entry) => entry.content(),
            None => generic_content(topic_name),
        }
    }

    /// A mixed exam: `per_subject` Hard questions on the first topic of the
    /// first unit of each of the first `subjects` subjects.
    pub async fn mock_exam(
        &self,
        syllabus: &Syllabus,
        subjects: usize,
        per_subject: usize,
    ) -> Vec<Question> {
        let requests: Vec<QuizRequest> = syllabus
            .subjects
            .iter()
            .take(subjects)
            .enumerate()
            .filter_map(|(position, subject)| {
                let topic = subject.units.first()?.topics.first()?;
                Some(
                    QuizRequest::new(&topic.id, &topic.name, Difficulty::Hard, per_subject)
                        .with_seed_offset((position * per_subject) as u64),
                )
            })
            .collect();

        let quizzes = join_all(requests.iter().map(|r| self.generate_quiz(r))).await;
        let mut questions: Vec<Question> = quizzes.into_iter().flatten().collect();
        renumber(&mut questions);
        questions
    }

    async fn generate_questions(
        &self,
        generator: &dyn TextGenerator,
        request: &QuizRequest,
        count: usize,
    ) -> Vec<Question> {
        let prompt = quiz_prompt(&request.topic_name, request.difficulty, count);
        let text = match self.call_generator(generator, prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    topic_id = %request.topic_id,
                    provider = generator.name(),
                    "quiz generation failed, using mock questions: {e:#}"
                );
                return Vec::new();
            }
        };

        match parse_generated_questions(&text) {
            Ok(questions) => {
                tracing::debug!(
                    topic_id = %request.topic_id,
                    accepted = questions.len(),
                    requested = count,
                    "parsed generated questions"
                );
                questions
            }
            Err(e) => {
                tracing::warn!(
                    topic_id = %request.topic_id,
                    "discarding malformed generated quiz: {e:#}"
                );
                Vec::new()
            }
        }
    }

    /// One bounded generator call with retries on transient errors.
    async fn call_generator(&self, generator: &dyn TextGenerator, prompt: String) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            system_prompt: self.config.system_prompt_override.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay;
        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }

            let attempt =
                tokio::time::timeout(self.config.generation_timeout, generator.generate(&request))
                    .await;
            match attempt {
                Ok(Ok(response)) => {
                    tracing::debug!(
                        provider = generator.name(),
                        model = %response.model,
                        latency_ms = response.latency_ms,
                        tokens = response.token_usage.total_tokens,
                        "generation complete"
                    );
                    return Ok(response.content);
                }
                Ok(Err(e)) => {
                    if let Some(provider_error) = e.downcast_ref::<ProviderError>() {
                        if provider_error.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = provider_error.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms).min(MAX_RETRY_DELAY);
                        }
                    }
                    last_error = Some(e);
                }
                Err(_) => {
                    last_error = Some(
                        ProviderError::Timeout(self.config.generation_timeout.as_secs()).into(),
                    );
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
    }
}

fn renumber(questions: &mut [Question]) {
    for (i, q) in questions.iter_mut().enumerate() {
        q.id = i as u32 + 1;
    }
}

fn generic_content(topic_name: &str) -> TopicContent {
    TopicContent {
        title: format!("Concept: {topic_name}"),
        explanation: format!(
            "**{topic_name}** is a key subject in your syllabus. While our specific database is \
             updating for this topic, remember that it generally involves analyzing system \
             components and optimizing performance."
        ),
        key_points: vec![
            "Definition and Scope".to_string(),
            "Key Characteristics".to_string(),
            "Advantages & Disadvantages".to_string(),
            "Real-world Applications".to_string(),
        ],
        example: "Refer to your standard textbook (Chapters 1-3) for a concrete example."
            .to_string(),
        summary: Some("Focus on the definitions and core principles.".to_string()),
    }
}
