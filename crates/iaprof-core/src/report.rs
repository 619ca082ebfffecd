//! Session report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::display_board;
use crate::model::SessionResult;
use crate::session::{Score, Session};
use crate::syllabus::Syllabus;

/// Snapshot of a finished practice session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub course: String,
    /// Board as displayed (`ENEM` when none was chosen).
    pub board: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub goal: String,
    pub score: Score,
    /// Share of mastered syllabus topics.
    pub syllabus_progress: u32,
    pub syllabus: Syllabus,
    pub results: Vec<SessionResult>,
    pub mentor_feedback: String,
}

impl SessionReport {
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            course: session.course().to_string(),
            board: display_board(session.board()).to_string(),
            subject: session.subject().map(str::to_string),
            goal: session.goal().to_string(),
            score: session.score(),
            syllabus_progress: session.syllabus().progress_percent(),
            syllabus: session.syllabus().clone(),
            results: session.results().to_vec(),
            mentor_feedback: session.mentor_feedback().to_string(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Question, SyllabusTopic, TopicStatus};

    fn finished_session() -> Session {
        let mut s = Session::new();
        s.enter_goal_setting().unwrap();
        s.select_course("ENEM");
        s.set_goal("Nota 900 em redação");
        s.begin_study().unwrap();
        s.study_started(
            vec![SyllabusTopic {
                id: "t".into(),
                name: "Matemática".into(),
                weight: 95.0,
                status: TopicStatus::Pending,
            }],
            Question {
                id: "q".into(),
                text: "2 + 2?".into(),
                options: vec!["3".into(), "4".into()],
                correct_answer: 1,
                subject: "Matemática".into(),
                explanation: None,
                difficulty: Difficulty::Easy,
            },
        );
        s.answer(1).unwrap();
        s.finish().unwrap();
        s.feedback_ready("Excelente ritmo!".into());
        s
    }

    #[test]
    fn report_captures_session() {
        let report = SessionReport::from_session(&finished_session());
        assert_eq!(report.board, "ENEM");
        assert_eq!(report.score.correct, 1);
        assert_eq!(report.score.percent, 100);
        assert_eq!(report.syllabus_progress, 100);
        assert_eq!(report.mentor_feedback, "Excelente ritmo!");
    }

    #[test]
    fn json_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        let report = SessionReport::from_session(&finished_session());
        report.save_json(&path).unwrap();

        let loaded = SessionReport::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.syllabus.topics()[0].status, TopicStatus::Mastered);
    }

    #[test]
    fn load_missing_file_fails_with_context() {
        let err = SessionReport::load_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read report"));
    }
}
