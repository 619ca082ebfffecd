//! Core data model types for iaprof.
//!
//! These types mirror the JSON objects exchanged with the generative model
//! (camelCase on the wire) and the client-side session bookkeeping.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty label attached to a generated question.
///
/// Parsing is lenient because the label comes straight from the model:
/// case and accents are ignored and English synonyms are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unrated,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Medium => "Médio",
            Difficulty::Hard => "Difícil",
            Difficulty::Unrated => "",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        let folded: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' | 'à' | 'â' | 'ã' => 'a',
                'é' | 'ê' => 'e',
                'í' => 'i',
                'ó' | 'ô' | 'õ' => 'o',
                'ú' => 'u',
                other => other,
            })
            .collect();
        match folded.as_str() {
            "facil" | "easy" => Difficulty::Easy,
            "medio" | "media" | "medium" => Difficulty::Medium,
            "dificil" | "hard" => Difficulty::Hard,
            _ => Difficulty::Unrated,
        }
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.as_str().to_string()
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    #[serde(default = "missing_answer")]
    pub correct_answer: usize,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Stand-in for an absent `correctAnswer`; never a valid index.
const MISSING_ANSWER: usize = usize::MAX;

fn missing_answer() -> usize {
    MISSING_ANSWER
}

impl Question {
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }

    /// Letter label for an option index (`0` → `A`).
    pub fn option_label(index: usize) -> char {
        (b'A' + (index % 26) as u8) as char
    }

    /// Parse a letter label back into an option index, bounded by `options`.
    pub fn parse_label(&self, label: &str) -> Option<usize> {
        let mut chars = label.trim().chars();
        let c = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() || !c.is_ascii_uppercase() {
            return None;
        }
        let index = (c as u8 - b'A') as usize;
        (index < self.options.len()).then_some(index)
    }

    /// Check that the question is usable as a practice item.
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("question text is empty".into());
        }
        if self.options.len() < 2 {
            return Err(format!(
                "question needs at least 2 options, got {}",
                self.options.len()
            ));
        }
        if self.correct_answer == MISSING_ANSWER {
            return Err("question has no correctAnswer".into());
        }
        if self.correct_answer >= self.options.len() {
            return Err(format!(
                "correctAnswer {} is out of range for {} options",
                self.correct_answer,
                self.options.len()
            ));
        }
        Ok(())
    }
}

/// Remedial content requested after a wrong answer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixationData {
    #[serde(default)]
    pub step_by_step: String,
    #[serde(default)]
    pub main_topic: String,
    #[serde(default)]
    pub fixation_questions: Vec<Question>,
}

/// Where an answered question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerMode {
    AiGenerated,
    Ocr,
}

/// One answered question within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub question: Question,
    pub user_answer: Option<usize>,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
    pub mode: AnswerMode,
}

/// Score and feedback for a single ENEM competency.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompetencyScore {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
}

/// The five ENEM essay competencies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Competencies {
    #[serde(default)]
    pub c1: CompetencyScore,
    #[serde(default)]
    pub c2: CompetencyScore,
    #[serde(default)]
    pub c3: CompetencyScore,
    #[serde(default)]
    pub c4: CompetencyScore,
    #[serde(default)]
    pub c5: CompetencyScore,
}

impl Competencies {
    /// Iterate competencies in order, numbered from 1.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &CompetencyScore)> {
        [&self.c1, &self.c2, &self.c3, &self.c4, &self.c5]
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as u8 + 1, c))
    }

    /// Sum of the five competency scores.
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, c)| c.score).sum()
    }
}

/// Essay scoring result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayAnalysis {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub competencies: Competencies,
    #[serde(default)]
    pub general_feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Mastery status of a syllabus topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TopicStatus {
    #[default]
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Em Progresso")]
    InProgress,
    #[serde(rename = "Dominado")]
    Mastered,
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicStatus::Pending => write!(f, "Pendente"),
            TopicStatus::InProgress => write!(f, "Em Progresso"),
            TopicStatus::Mastered => write!(f, "Dominado"),
        }
    }
}

/// A named subject area with an 80/20 importance weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyllabusTopic {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Importance from 0 to 100, based on historical recurrence.
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub status: TopicStatus,
}

/// A question extracted from a photo, with its resolution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrSolution {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// Top-level mode of a user session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppMode {
    #[default]
    Welcome,
    GoalSetting,
    StudyFlow,
    OcrSolver,
    EssayAnalysis,
    Report,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppMode::Welcome => "welcome",
            AppMode::GoalSetting => "goal-setting",
            AppMode::StudyFlow => "study-flow",
            AppMode::OcrSolver => "ocr-solver",
            AppMode::EssayAnalysis => "essay-analysis",
            AppMode::Report => "report",
        };
        f.write_str(s)
    }
}
