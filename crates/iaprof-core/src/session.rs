//! Client-side session state machine.
//!
//! All transitions are synchronous and side-effect free; the asynchronous
//! calls that feed them live in [`crate::driver`].

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::is_enem;
use crate::error::SessionError;
use crate::model::{
    AnswerMode, AppMode, EssayAnalysis, FixationData, OcrSolution, Question, SessionResult,
    SyllabusTopic,
};
use crate::syllabus::Syllabus;

/// Correct / total tally for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// Rounded share of correct answers, `0` with no answers.
    pub percent: u32,
}

impl Score {
    pub fn from_results(results: &[SessionResult]) -> Self {
        let correct = results.iter().filter(|r| r.is_correct).count();
        let total = results.len();
        let percent = if total == 0 {
            0
        } else {
            (correct as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            correct,
            total,
            percent,
        }
    }
}

/// What happened when the student picked an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: usize,
    /// Syllabus topics matched by the question's subject.
    pub topics_touched: usize,
}

/// State of one user session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    mode: AppMode,
    course: String,
    board: String,
    subject: Option<String>,
    available_subjects: Vec<String>,
    goal: String,
    syllabus: Syllabus,
    current_question: Option<Question>,
    results: Vec<SessionResult>,
    fixation: Option<FixationData>,
    essay_result: Option<EssayAnalysis>,
    ocr_result: Option<OcrSolution>,
    mentor_feedback: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // -- accessors ----------------------------------------------------------

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn board(&self) -> &str {
        &self.board
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn available_subjects(&self) -> &[String] {
        &self.available_subjects
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn syllabus(&self) -> &Syllabus {
        &self.syllabus
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn results(&self) -> &[SessionResult] {
        &self.results
    }

    pub fn fixation(&self) -> Option<&FixationData> {
        self.fixation.as_ref()
    }

    pub fn essay_result(&self) -> Option<&EssayAnalysis> {
        self.essay_result.as_ref()
    }

    pub fn ocr_result(&self) -> Option<&OcrSolution> {
        self.ocr_result.as_ref()
    }

    pub fn mentor_feedback(&self) -> &str {
        &self.mentor_feedback
    }

    pub fn score(&self) -> Score {
        Score::from_results(&self.results)
    }

    // -- goal setting -------------------------------------------------------

    /// Choose a course. Clears board and subject; blank input is ignored.
    pub fn select_course(&mut self, course: &str) {
        let course = course.trim();
        if course.is_empty() {
            return;
        }
        self.course = course.to_string();
        self.board.clear();
        self.subject = None;
        self.available_subjects.clear();
    }

    /// Choose a board. Clears subject.
    pub fn select_board(&mut self, board: &str) {
        self.board = board.trim().to_string();
        self.subject = None;
        self.available_subjects.clear();
    }

    /// Choose a subject; `None` means the general Pareto focus.
    pub fn select_subject(&mut self, subject: Option<&str>) {
        self.subject = subject
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    pub fn set_goal(&mut self, goal: &str) {
        self.goal = goal.trim().to_string();
    }

    /// A subject list can be requested once the course is known and the
    /// board is either chosen or irrelevant (ENEM).
    pub fn needs_subject_listing(&self) -> bool {
        !self.course.is_empty() && (is_enem(&self.course) || !self.board.is_empty())
    }

    pub fn subjects_loaded(&mut self, subjects: Vec<String>) {
        self.available_subjects = subjects;
    }

    // -- mode transitions ---------------------------------------------------

    fn transition(&mut self, allowed_from: &[AppMode], to: AppMode) -> Result<(), SessionError> {
        if !allowed_from.contains(&self.mode) {
            return Err(SessionError::InvalidTransition {
                from: self.mode,
                to,
            });
        }
        self.mode = to;
        Ok(())
    }

    pub fn enter_goal_setting(&mut self) -> Result<(), SessionError> {
        self.transition(&[AppMode::Welcome, AppMode::GoalSetting], AppMode::GoalSetting)
    }

    pub fn open_ocr(&mut self) -> Result<(), SessionError> {
        self.transition(&[AppMode::Welcome, AppMode::OcrSolver], AppMode::OcrSolver)?;
        self.ocr_result = None;
        Ok(())
    }

    pub fn open_essay(&mut self) -> Result<(), SessionError> {
        self.transition(
            &[AppMode::Welcome, AppMode::EssayAnalysis],
            AppMode::EssayAnalysis,
        )
    }

    /// Back to the hub. Leaving goal setting also drops the selection.
    pub fn go_home(&mut self) {
        if self.mode == AppMode::GoalSetting {
            self.course.clear();
            self.board.clear();
            self.subject = None;
            self.available_subjects.clear();
        }
        self.mode = AppMode::Welcome;
    }

    // -- study flow ---------------------------------------------------------

    /// Enter the study flow. Also used to restart it after fixation.
    pub fn begin_study(&mut self) -> Result<(), SessionError> {
        if self.goal.is_empty() {
            return Err(SessionError::MissingGoal);
        }
        if self.course.is_empty() {
            return Err(SessionError::MissingCourse);
        }
        self.transition(&[AppMode::GoalSetting, AppMode::StudyFlow], AppMode::StudyFlow)
    }

    /// Install the plan and first question fetched for the study flow.
    pub fn study_started(&mut self, plan: Vec<SyllabusTopic>, question: Question) {
        self.syllabus = Syllabus::from_plan(plan);
        self.current_question = Some(question);
    }

    /// Starting the study flow failed; go back to goal setting.
    pub fn study_failed(&mut self) {
        self.mode = AppMode::GoalSetting;
    }

    /// Record the student's pick for the current question.
    pub fn answer(&mut self, index: usize) -> Result<AnswerOutcome, SessionError> {
        if self.mode != AppMode::StudyFlow {
            return Err(SessionError::InvalidTransition {
                from: self.mode,
                to: AppMode::StudyFlow,
            });
        }
        if self.fixation.is_some() {
            return Err(SessionError::FixationPending);
        }
        let question = self
            .current_question
            .as_ref()
            .ok_or(SessionError::NoCurrentQuestion)?;
        if index >= question.options.len() {
            return Err(SessionError::OptionOutOfRange {
                index,
                options: question.options.len(),
            });
        }

        let correct = question.is_correct(index);
        let correct_answer = question.correct_answer;
        let topics_touched = self.syllabus.record_outcome(&question.subject, correct);
        self.results.push(SessionResult {
            question: question.clone(),
            user_answer: Some(index),
            is_correct: correct,
            timestamp: Utc::now(),
            mode: AnswerMode::AiGenerated,
        });

        Ok(AnswerOutcome {
            correct,
            correct_answer,
            topics_touched,
        })
    }

    pub fn fixation_ready(&mut self, data: FixationData) {
        self.fixation = Some(data);
    }

    pub fn next_question_ready(&mut self, question: Question) {
        self.current_question = Some(question);
    }

    /// Dismiss the fixation block so answering can resume.
    pub fn acknowledge_fixation(&mut self) -> Option<FixationData> {
        self.fixation.take()
    }

    /// Close the study flow and show the report.
    ///
    /// A failed restart drops back to goal setting; answers recorded before
    /// it can still be reported.
    pub fn finish(&mut self) -> Result<(), SessionError> {
        let from: &[AppMode] = if self.results.is_empty() {
            &[AppMode::StudyFlow, AppMode::Report]
        } else {
            &[AppMode::StudyFlow, AppMode::Report, AppMode::GoalSetting]
        };
        self.transition(from, AppMode::Report)?;
        self.fixation = None;
        Ok(())
    }

    pub fn feedback_ready(&mut self, text: String) {
        self.mentor_feedback = text;
    }

    // -- side modes ---------------------------------------------------------

    pub fn essay_scored(&mut self, analysis: EssayAnalysis) {
        self.essay_result = Some(analysis);
    }

    pub fn ocr_solved(&mut self, solution: OcrSolution) {
        self.ocr_result = Some(solution);
    }

    /// "Scan another": drop the previous solution.
    pub fn clear_ocr(&mut self) {
        self.ocr_result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, TopicStatus};

    fn question(subject: &str, correct: usize) -> Question {
        Question {
            id: "q".into(),
            text: "Enunciado".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: correct,
            subject: subject.into(),
            explanation: None,
            difficulty: Difficulty::Medium,
        }
    }

    fn topic(name: &str) -> SyllabusTopic {
        SyllabusTopic {
            id: name.into(),
            name: name.into(),
            weight: 50.0,
            status: TopicStatus::Pending,
        }
    }

    fn studying() -> Session {
        let mut s = Session::new();
        s.enter_goal_setting().unwrap();
        s.select_course("PRF");
        s.select_board("Cebraspe");
        s.set_goal("Policial Rodoviário Federal");
        s.begin_study().unwrap();
        s.study_started(vec![topic("Português"), topic("Física")], question("Português", 1));
        s
    }

    #[test]
    fn course_selection_resets_board_and_subject() {
        let mut s = Session::new();
        s.select_course("PF");
        s.select_board("Cebraspe");
        s.select_subject(Some("Direito Penal"));
        assert_eq!(s.subject(), Some("Direito Penal"));

        s.select_course("OAB");
        assert_eq!(s.course(), "OAB");
        assert_eq!(s.board(), "");
        assert!(s.subject().is_none());

        s.select_course("  ");
        assert_eq!(s.course(), "OAB");
    }

    #[test]
    fn board_selection_resets_subject() {
        let mut s = Session::new();
        s.select_course("PF");
        s.select_subject(Some("Informática"));
        s.select_board("FGV");
        assert!(s.subject().is_none());
        s.select_subject(Some("  "));
        assert!(s.subject().is_none());
    }

    #[test]
    fn subject_listing_needs_board_unless_enem() {
        let mut s = Session::new();
        assert!(!s.needs_subject_listing());
        s.select_course("enem");
        assert!(s.needs_subject_listing());
        s.select_course("PRF");
        assert!(!s.needs_subject_listing());
        s.select_board("Cebraspe");
        assert!(s.needs_subject_listing());
    }

    #[test]
    fn begin_study_requires_goal_and_course() {
        let mut s = Session::new();
        s.enter_goal_setting().unwrap();
        assert_eq!(s.begin_study(), Err(SessionError::MissingGoal));
        s.set_goal("Aprovação");
        assert_eq!(s.begin_study(), Err(SessionError::MissingCourse));
        s.select_course("ENEM");
        s.begin_study().unwrap();
        assert_eq!(s.mode(), AppMode::StudyFlow);
    }

    #[test]
    fn begin_study_from_welcome_is_rejected() {
        let mut s = Session::new();
        s.select_course("ENEM");
        s.set_goal("Medicina");
        assert!(matches!(
            s.begin_study(),
            Err(SessionError::InvalidTransition {
                from: AppMode::Welcome,
                ..
            })
        ));
    }

    #[test]
    fn failed_start_returns_to_goal_setting() {
        let mut s = Session::new();
        s.enter_goal_setting().unwrap();
        s.select_course("ENEM");
        s.set_goal("Medicina");
        s.begin_study().unwrap();
        s.study_failed();
        assert_eq!(s.mode(), AppMode::GoalSetting);
    }

    #[test]
    fn correct_answer_updates_results_and_syllabus() {
        let mut s = studying();
        let outcome = s.answer(1).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.topics_touched, 1);
        assert_eq!(s.results().len(), 1);
        assert_eq!(s.results()[0].user_answer, Some(1));
        assert_eq!(s.results()[0].mode, AnswerMode::AiGenerated);
        assert_eq!(s.syllabus().topics()[0].status, TopicStatus::Mastered);
        assert_eq!(s.syllabus().progress_percent(), 50);
    }

    #[test]
    fn wrong_answer_marks_topic_in_progress() {
        let mut s = studying();
        let outcome = s.answer(0).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_answer, 1);
        assert_eq!(s.syllabus().topics()[0].status, TopicStatus::InProgress);
        assert_eq!(s.score(), Score { correct: 0, total: 1, percent: 0 });
    }

    #[test]
    fn answer_guards() {
        let mut s = studying();
        assert_eq!(
            s.answer(4),
            Err(SessionError::OptionOutOfRange {
                index: 4,
                options: 4
            })
        );
        assert!(s.results().is_empty());

        s.answer(0).unwrap();
        s.fixation_ready(FixationData::default());
        assert_eq!(s.answer(1), Err(SessionError::FixationPending));
        assert!(s.acknowledge_fixation().is_some());
        assert!(s.fixation().is_none());
        assert!(s.answer(1).is_ok());

        let mut fresh = Session::new();
        fresh.enter_goal_setting().unwrap();
        fresh.select_course("ENEM");
        fresh.set_goal("x");
        fresh.begin_study().unwrap();
        assert_eq!(fresh.answer(0), Err(SessionError::NoCurrentQuestion));
    }

    #[test]
    fn results_accumulate_across_questions() {
        let mut s = studying();
        s.answer(1).unwrap();
        s.next_question_ready(question("Física", 2));
        s.answer(2).unwrap();
        s.next_question_ready(question("Física", 2));
        s.answer(0).unwrap();
        assert_eq!(
            s.score(),
            Score {
                correct: 2,
                total: 3,
                percent: 67
            }
        );
        // the later wrong answer demoted Física
        assert_eq!(s.syllabus().topics()[1].status, TopicStatus::InProgress);
    }

    #[test]
    fn finish_moves_to_report() {
        let mut s = studying();
        s.answer(0).unwrap();
        s.fixation_ready(FixationData::default());
        s.finish().unwrap();
        assert_eq!(s.mode(), AppMode::Report);
        assert!(s.fixation().is_none());
        s.feedback_ready("Parabéns".into());
        assert_eq!(s.mentor_feedback(), "Parabéns");
        assert_eq!(s.results().len(), 1);
    }

    #[test]
    fn finish_outside_study_is_rejected() {
        let mut s = Session::new();
        assert!(s.finish().is_err());
    }

    #[test]
    fn answers_survive_a_failed_restart() {
        let mut s = studying();
        s.answer(0).unwrap();
        s.study_failed();
        assert_eq!(s.mode(), AppMode::GoalSetting);

        s.finish().unwrap();
        assert_eq!(s.mode(), AppMode::Report);
        assert_eq!(s.score().total, 1);
    }

    #[test]
    fn goal_setting_without_answers_cannot_finish() {
        let mut s = Session::new();
        s.enter_goal_setting().unwrap();
        assert!(matches!(
            s.finish(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn empty_score_is_zero_percent() {
        assert_eq!(Session::new().score(), Score::default());
    }

    #[test]
    fn go_home_from_goal_setting_clears_selection() {
        let mut s = Session::new();
        s.enter_goal_setting().unwrap();
        s.select_course("PF");
        s.select_board("Cebraspe");
        s.go_home();
        assert_eq!(s.mode(), AppMode::Welcome);
        assert_eq!(s.course(), "");

        let mut s = studying();
        s.go_home();
        assert_eq!(s.mode(), AppMode::Welcome);
        assert_eq!(s.course(), "PRF");
    }

    #[test]
    fn side_modes() {
        let mut s = Session::new();
        s.open_ocr().unwrap();
        s.ocr_solved(OcrSolution::default());
        assert!(s.ocr_result().is_some());
        s.clear_ocr();
        assert!(s.ocr_result().is_none());
        assert!(s.open_essay().is_err());

        s.go_home();
        s.open_essay().unwrap();
        s.essay_scored(EssayAnalysis::default());
        assert!(s.essay_result().is_some());
        assert_eq!(s.mode(), AppMode::EssayAnalysis);
    }
}
