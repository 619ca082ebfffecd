//! The mentor service: shapes requests to the model and parses its replies.
//!
//! Every call sends the mentor persona as system instruction and, apart
//! from the final feedback, asks for JSON matching a fixed schema.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

use crate::catalog::fallback_subjects;
use crate::error::{MentorError, ProviderError};
use crate::model::{EssayAnalysis, FixationData, OcrSolution, Question, SessionResult, SyllabusTopic};
use crate::prompts;
use crate::schema::Schema;
use crate::traits::{extract_json_payload, GenerateRequest, LlmProvider, Part};

/// Which model handles which kind of call.
#[derive(Debug, Clone)]
pub struct MentorConfig {
    /// Quick structured calls: subjects, questions, plans, feedback.
    pub fast_model: String,
    /// Heavier reasoning: fixation content and essay scoring.
    pub deep_model: String,
    /// Image understanding: photographed questions.
    pub vision_model: String,
    /// Sampling temperature; provider default when `None`.
    pub temperature: Option<f64>,
    /// Retries on transient provider errors (not malformed replies).
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each attempt.
    pub retry_delay: Duration,
}

impl Default for MentorConfig {
    fn default() -> Self {
        Self {
            fast_model: "gemini-3-flash-preview".to_string(),
            deep_model: "gemini-3-pro-preview".to_string(),
            vision_model: "gemini-2.5-flash-image".to_string(),
            temperature: None,
            max_retries: 2,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Essay input: typed text or a base64 JPEG of a handwritten page.
#[derive(Debug, Clone)]
pub enum EssayInput {
    Text(String),
    Image(String),
}

/// Front door to the generative model for every mentor feature.
#[derive(Clone)]
pub struct Mentor {
    provider: Arc<dyn LlmProvider>,
    config: MentorConfig,
}

impl Mentor {
    pub fn new(provider: Arc<dyn LlmProvider>, config: MentorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &MentorConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The 8 most important subjects for a course and board.
    ///
    /// An unparseable reply falls back to a generic subject list; transport
    /// errors still propagate.
    #[instrument(skip(self), fields(model = %self.config.fast_model))]
    pub async fn course_subjects(&self, course: &str, board: &str) -> Result<Vec<String>> {
        let request = self.request(
            &self.config.fast_model,
            vec![Part::text(prompts::course_subjects(course, board))],
            Some(prompts::subjects_schema()),
        );
        let text = self.send(&request).await?;
        match parse_json::<Vec<String>>("course subjects", &text) {
            Ok(subjects) => {
                let subjects: Vec<String> = subjects
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if subjects.is_empty() {
                    Ok(fallback_subjects())
                } else {
                    Ok(subjects)
                }
            }
            Err(e) => {
                tracing::warn!("{e}; using fallback subjects");
                Ok(fallback_subjects())
            }
        }
    }

    /// A fresh multiple-choice question in the board's style.
    #[instrument(skip(self, goal), fields(model = %self.config.fast_model))]
    pub async fn generate_question(
        &self,
        course: &str,
        board: &str,
        goal: &str,
        subject: Option<&str>,
    ) -> Result<Question> {
        let request = self.request(
            &self.config.fast_model,
            vec![Part::text(prompts::question(course, board, goal, subject))],
            Some(prompts::question_schema()),
        );
        let text = self.send(&request).await?;
        let question = parse_json::<Question>("question", &text)?;
        Ok(normalize_question("question", question)?)
    }

    /// The 10 most recurrent topics, each starting as pending.
    #[instrument(skip(self), fields(model = %self.config.fast_model))]
    pub async fn study_plan(
        &self,
        course: &str,
        board: &str,
        subject: Option<&str>,
    ) -> Result<Vec<SyllabusTopic>> {
        let request = self.request(
            &self.config.fast_model,
            vec![Part::text(prompts::study_plan(course, board, subject))],
            Some(prompts::study_plan_schema()),
        );
        let text = self.send(&request).await?;
        Ok(parse_json::<Vec<SyllabusTopic>>("study plan", &text)?)
    }

    /// Remedial content for a question the student got wrong.
    ///
    /// Fixation questions the model botched are dropped rather than failing
    /// the whole block.
    #[instrument(skip(self, wrong, goal), fields(model = %self.config.deep_model, subject = %wrong.subject))]
    pub async fn fixation_content(
        &self,
        wrong: &Question,
        goal: &str,
        board: &str,
    ) -> Result<FixationData> {
        let request = self.request(
            &self.config.deep_model,
            vec![Part::text(prompts::fixation(wrong, goal, board))],
            Some(prompts::fixation_schema()),
        );
        let text = self.send(&request).await?;
        let mut data = parse_json::<FixationData>("fixation content", &text)?;
        let before = data.fixation_questions.len();
        data.fixation_questions = std::mem::take(&mut data.fixation_questions)
            .into_iter()
            .filter_map(|q| normalize_question("fixation question", q).ok())
            .collect();
        let dropped = before - data.fixation_questions.len();
        if dropped > 0 {
            tracing::warn!(dropped, "discarded unusable fixation questions");
        }
        Ok(data)
    }

    /// Extract and solve a question from a base64 JPEG.
    #[instrument(skip(self, base64_jpeg), fields(model = %self.config.vision_model))]
    pub async fn solve_from_image(&self, base64_jpeg: &str) -> Result<OcrSolution> {
        let request = self.request(
            &self.config.vision_model,
            vec![Part::jpeg(base64_jpeg), Part::text(prompts::SOLVE_IMAGE)],
            Some(prompts::ocr_schema()),
        );
        let text = self.send(&request).await?;
        Ok(parse_json::<OcrSolution>("image solution", &text)?)
    }

    /// Score an essay against the five ENEM competencies.
    #[instrument(skip(self, input), fields(model = %self.config.deep_model))]
    pub async fn analyze_essay(&self, input: &EssayInput) -> Result<EssayAnalysis> {
        let parts = match input {
            EssayInput::Image(data) => vec![Part::jpeg(data.as_str()), Part::text(prompts::ESSAY_IMAGE)],
            EssayInput::Text(text) => vec![Part::text(prompts::essay_text(text))],
        };
        let request = self.request(&self.config.deep_model, parts, Some(prompts::essay_schema()));
        let text = self.send(&request).await?;
        Ok(parse_json::<EssayAnalysis>("essay analysis", &text)?)
    }

    /// Closing mentor message for a practice session.
    #[instrument(skip(self, results, goal), fields(model = %self.config.fast_model, answered = results.len()))]
    pub async fn final_feedback(&self, results: &[SessionResult], goal: &str) -> Result<String> {
        let correct = results.iter().filter(|r| r.is_correct).count();
        let request = self.request(
            &self.config.fast_model,
            vec![Part::text(prompts::final_feedback(goal, correct, results.len()))],
            None,
        );
        let text = self.send(&request).await?;
        let text = text.trim();
        if text.is_empty() {
            Ok(prompts::FALLBACK_FEEDBACK.to_string())
        } else {
            Ok(text.to_string())
        }
    }

    fn request(&self, model: &str, parts: Vec<Part>, schema: Option<Schema>) -> GenerateRequest {
        GenerateRequest {
            model: model.to_string(),
            system_instruction: Some(prompts::SYSTEM_INSTRUCTION.to_string()),
            parts,
            response_schema: schema,
            temperature: self.config.temperature,
        }
    }

    /// Call the provider, retrying transient errors with exponential backoff.
    async fn send(&self, request: &GenerateRequest) -> Result<String> {
        let mut retry_delay = self.config.retry_delay;
        let mut attempt = 0;
        loop {
            match self.provider.generate(request).await {
                Ok(response) => {
                    tracing::debug!(
                        model = %response.model,
                        latency_ms = response.latency_ms,
                        total_tokens = response.token_usage.total_tokens,
                        "model replied"
                    );
                    return Ok(response.text);
                }
                Err(e) => {
                    let provider_err = e.downcast_ref::<ProviderError>();
                    let permanent = provider_err.is_some_and(ProviderError::is_permanent);
                    if permanent || attempt >= self.config.max_retries {
                        return Err(e.context(format!("{} request failed", request.model)));
                    }
                    let wait = provider_err
                        .and_then(ProviderError::retry_after_ms)
                        .map(Duration::from_millis)
                        .unwrap_or(retry_delay);
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "provider error, retrying: {e}"
                    );
                    tokio::time::sleep(wait).await;
                    retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
                }
            }
        }
    }
}

fn parse_json<T: DeserializeOwned>(operation: &'static str, text: &str) -> Result<T, MentorError> {
    serde_json::from_str(extract_json_payload(text))
        .map_err(|source| MentorError::InvalidJson { operation, source })
}

fn normalize_question(operation: &'static str, mut q: Question) -> Result<Question, MentorError> {
    q.validate()
        .map_err(|reason| MentorError::Malformed { operation, reason })?;
    if q.id.trim().is_empty() {
        q.id = Uuid::new_v4().to_string();
    }
    Ok(q)
}
