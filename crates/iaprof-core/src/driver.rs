//! Drives a [`Session`] through the mentor.
//!
//! Each method performs the model calls for one user action and feeds the
//! results into the session. Follow-up fetches after an answer are
//! best-effort: a failure is logged and the recorded answer stands.

use anyhow::Result;

use crate::error::SessionError;
use crate::mentor::{EssayInput, Mentor};
use crate::model::{EssayAnalysis, OcrSolution};
use crate::session::{AnswerOutcome, Session};

/// A session bound to the mentor service that feeds it.
pub struct StudyDriver {
    session: Session,
    mentor: Mentor,
}

impl StudyDriver {
    pub fn new(mentor: Mentor) -> Self {
        Self::with_session(mentor, Session::new())
    }

    pub fn with_session(mentor: Mentor, session: Session) -> Self {
        Self { session, mentor }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for the pure, I/O-free transitions.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Refresh the subject list for the selected course and board.
    ///
    /// Does nothing until the selection allows it. Failures leave the
    /// current list untouched.
    pub async fn load_subjects(&mut self) {
        if !self.session.needs_subject_listing() {
            return;
        }
        let listed = self
            .mentor
            .course_subjects(self.session.course(), self.session.board())
            .await;
        match listed {
            Ok(subjects) => self.session.subjects_loaded(subjects),
            Err(e) => tracing::warn!("failed to load subjects: {e:#}"),
        }
    }

    /// Enter the study flow, fetching the plan and first question together.
    ///
    /// On failure the session falls back to goal setting and the error is
    /// returned for the caller to show.
    pub async fn start_study(&mut self) -> Result<()> {
        self.session.begin_study()?;

        let s = &self.session;
        let fetched = futures::try_join!(
            self.mentor.study_plan(s.course(), s.board(), s.subject()),
            self.mentor
                .generate_question(s.course(), s.board(), s.goal(), s.subject()),
        );

        match fetched {
            Ok((plan, question)) => {
                tracing::info!(
                    topics = plan.len(),
                    subject = %question.subject,
                    "study session started"
                );
                self.session.study_started(plan, question);
                Ok(())
            }
            Err(e) => {
                self.session.study_failed();
                Err(e.context("failed to start study session"))
            }
        }
    }

    /// Record an answer, then fetch fixation content (wrong) or the next
    /// question (right).
    pub async fn answer(&mut self, index: usize) -> Result<AnswerOutcome, SessionError> {
        let outcome = self.session.answer(index)?;
        let s = &self.session;

        if outcome.correct {
            let next = self
                .mentor
                .generate_question(s.course(), s.board(), s.goal(), s.subject())
                .await;
            match next {
                Ok(q) => self.session.next_question_ready(q),
                Err(e) => tracing::warn!("failed to fetch next question: {e:#}"),
            }
        } else if let Some(wrong) = s.current_question().cloned() {
            let fixation = self
                .mentor
                .fixation_content(&wrong, s.goal(), s.board())
                .await;
            match fixation {
                Ok(data) => self.session.fixation_ready(data),
                Err(e) => tracing::warn!("failed to fetch fixation content: {e:#}"),
            }
        }

        Ok(outcome)
    }

    /// Dismiss the fixation block and restart with a fresh plan and question.
    pub async fn continue_after_fixation(&mut self) -> Result<()> {
        self.session.acknowledge_fixation();
        self.start_study().await
    }

    /// Close the session and ask for the mentor's final feedback.
    pub async fn finish(&mut self) -> Result<(), SessionError> {
        self.session.finish()?;
        let feedback = self
            .mentor
            .final_feedback(self.session.results(), self.session.goal())
            .await;
        match feedback {
            Ok(text) => self.session.feedback_ready(text),
            Err(e) => tracing::warn!("failed to fetch final feedback: {e:#}"),
        }
        Ok(())
    }

    pub async fn analyze_essay(&mut self, input: &EssayInput) -> Result<&EssayAnalysis> {
        let analysis = self.mentor.analyze_essay(input).await?;
        self.session.essay_scored(analysis);
        Ok(self
            .session
            .essay_result()
            .ok_or_else(|| anyhow::anyhow!("essay result missing after scoring"))?)
    }

    pub async fn solve_image(&mut self, base64_jpeg: &str) -> Result<&OcrSolution> {
        let solution = self.mentor.solve_from_image(base64_jpeg).await?;
        self.session.ocr_solved(solution);
        Ok(self
            .session
            .ocr_result()
            .ok_or_else(|| anyhow::anyhow!("OCR result missing after solving"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::ProviderError;
    use crate::mentor::MentorConfig;
    use crate::model::{AppMode, TopicStatus};
    use crate::traits::{GenerateRequest, GenerateResponse, LlmProvider, ModelInfo, TokenUsage};

    const PLAN: &str = r#"[{"id":"1","name":"Português","weight":90,"status":"Pendente"},{"id":"2","name":"Raciocínio Lógico","weight":70,"status":"Pendente"}]"#;
    const QUESTION: &str = r#"{"id":"q","text":"Qual?","options":["a","b","c","d"],"correctAnswer":2,"subject":"Português","difficulty":"Médio"}"#;
    const FIXATION: &str = r#"{"stepByStep":"Revise a regra","mainTopic":"Concordância","fixationQuestions":[]}"#;

    /// Routes replies by what the prompt asks for.
    struct RoutingProvider {
        fail_plan: bool,
        fail_fixation: bool,
        calls: AtomicU32,
        prompts: Mutex<Vec<String>>,
    }

    impl RoutingProvider {
        fn new() -> Self {
            Self {
                fail_plan: false,
                fail_fixation: false,
                calls: AtomicU32::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for RoutingProvider {
        fn name(&self) -> &str {
            "routing"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let prompt = request.prompt_text();
            self.prompts.lock().unwrap().push(prompt.clone());

            let text = if prompt.contains("10 tópicos") {
                if self.fail_plan {
                    return Err(ProviderError::AuthenticationFailed("no key".into()).into());
                }
                PLAN.to_string()
            } else if prompt.contains("múltipla escolha") {
                QUESTION.to_string()
            } else if prompt.contains("errou") {
                if self.fail_fixation {
                    return Err(ProviderError::ModelNotFound(request.model.clone()).into());
                }
                FIXATION.to_string()
            } else if prompt.contains("8 disciplinas") {
                r#"["Português","Raciocínio Lógico"]"#.to_string()
            } else if prompt.contains("feedback final") {
                "Você está no caminho certo.".to_string()
            } else {
                r#"{"score": 900}"#.to_string()
            };

            Ok(GenerateResponse {
                text,
                model: request.model.clone(),
                token_usage: TokenUsage::default(),
                latency_ms: 0,
            })
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    fn driver(provider: RoutingProvider) -> (StudyDriver, Arc<RoutingProvider>) {
        let provider = Arc::new(provider);
        let mentor = Mentor::new(
            provider.clone(),
            MentorConfig {
                max_retries: 0,
                retry_delay: Duration::from_millis(1),
                ..MentorConfig::default()
            },
        );
        let mut d = StudyDriver::new(mentor);
        let s = d.session_mut();
        s.enter_goal_setting().unwrap();
        s.select_course("PF");
        s.select_board("Cebraspe");
        s.set_goal("Agente da PF");
        (d, provider)
    }

    #[tokio::test]
    async fn load_subjects_when_board_chosen() {
        let (mut d, provider) = driver(RoutingProvider::new());
        d.load_subjects().await;
        assert_eq!(d.session().available_subjects().len(), 2);

        d.session_mut().select_course("PRF");
        let before = provider.calls.load(Ordering::Relaxed);
        d.load_subjects().await;
        assert_eq!(provider.calls.load(Ordering::Relaxed), before);
    }

    #[tokio::test]
    async fn start_fetches_plan_and_question() {
        let (mut d, provider) = driver(RoutingProvider::new());
        d.start_study().await.unwrap();
        let s = d.session();
        assert_eq!(s.mode(), AppMode::StudyFlow);
        assert_eq!(s.syllabus().len(), 2);
        assert_eq!(s.current_question().unwrap().correct_answer, 2);
        assert_eq!(provider.calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn start_failure_reverts_to_goal_setting() {
        let mut provider = RoutingProvider::new();
        provider.fail_plan = true;
        let (mut d, _) = driver(provider);
        let err = d.start_study().await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to start study session"));
        assert_eq!(d.session().mode(), AppMode::GoalSetting);
        assert!(d.session().current_question().is_none());
    }

    #[tokio::test]
    async fn right_answer_fetches_next_question() {
        let (mut d, provider) = driver(RoutingProvider::new());
        d.start_study().await.unwrap();
        let outcome = d.answer(2).await.unwrap();
        assert!(outcome.correct);
        assert!(d.session().fixation().is_none());
        assert_eq!(
            d.session().syllabus().topics()[0].status,
            TopicStatus::Mastered
        );
        assert_eq!(provider.calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn wrong_answer_fetches_fixation_then_restarts() {
        let (mut d, provider) = driver(RoutingProvider::new());
        d.start_study().await.unwrap();
        let outcome = d.answer(0).await.unwrap();
        assert!(!outcome.correct);
        assert_eq!(
            d.session().fixation().map(|f| f.main_topic.as_str()),
            Some("Concordância")
        );
        assert!(provider
            .prompts
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.contains("questão de Português da banca Cebraspe")));

        // answering is blocked until the fixation block is acknowledged
        assert!(matches!(
            d.answer(2).await,
            Err(SessionError::FixationPending)
        ));

        d.continue_after_fixation().await.unwrap();
        assert!(d.session().fixation().is_none());
        // a fresh plan resets mastery
        assert_eq!(d.session().syllabus().mastered_count(), 0);
        assert_eq!(d.session().results().len(), 1);
    }

    #[tokio::test]
    async fn fixation_failure_keeps_recorded_answer() {
        let mut provider = RoutingProvider::new();
        provider.fail_fixation = true;
        let (mut d, _) = driver(provider);
        d.start_study().await.unwrap();
        let outcome = d.answer(1).await.unwrap();
        assert!(!outcome.correct);
        assert!(d.session().fixation().is_none());
        assert_eq!(d.session().results().len(), 1);
    }

    #[tokio::test]
    async fn finish_collects_feedback() {
        let (mut d, _) = driver(RoutingProvider::new());
        d.start_study().await.unwrap();
        d.answer(2).await.unwrap();
        d.finish().await.unwrap();
        let s = d.session();
        assert_eq!(s.mode(), AppMode::Report);
        assert_eq!(s.mentor_feedback(), "Você está no caminho certo.");
        assert_eq!(s.score().percent, 100);
    }

    #[tokio::test]
    async fn essay_and_ocr_are_stored() {
        let (mut d, _) = driver(RoutingProvider::new());
        let analysis = d
            .analyze_essay(&EssayInput::Text("texto".into()))
            .await
            .unwrap();
        assert_eq!(analysis.score, 900.0);
        assert!(d.session().essay_result().is_some());

        d.solve_image("AAAA").await.unwrap();
        assert!(d.session().ocr_result().is_some());
    }
}
