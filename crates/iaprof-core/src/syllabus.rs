//! Syllabus mastery tracking.
//!
//! A syllabus is the ordered list of high-recurrence topics returned by the
//! model for a course. Answer outcomes update topic status by a loose,
//! case-insensitive substring match between the question's subject and the
//! topic name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{SyllabusTopic, TopicStatus};

/// The topics of the current study plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Syllabus {
    topics: Vec<SyllabusTopic>,
}

impl Syllabus {
    /// Normalise a freshly generated plan.
    ///
    /// Every topic starts `Pending`, weights clamp to `[0, 100]`, blank ids
    /// are replaced and nameless topics are dropped.
    pub fn from_plan(topics: Vec<SyllabusTopic>) -> Self {
        let topics = topics
            .into_iter()
            .filter(|t| !t.name.trim().is_empty())
            .map(|mut t| {
                if t.id.trim().is_empty() {
                    t.id = Uuid::new_v4().to_string();
                }
                t.weight = if t.weight.is_finite() {
                    t.weight.clamp(0.0, 100.0)
                } else {
                    0.0
                };
                t.status = TopicStatus::Pending;
                t
            })
            .collect();
        Self { topics }
    }

    pub fn topics(&self) -> &[SyllabusTopic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Apply an answer outcome to every topic matching `subject`.
    ///
    /// A topic matches when either lower-cased name contains the other.
    /// Correct answers mark the topic mastered; wrong answers put it back in
    /// progress, even if it was mastered. Returns the number of topics hit.
    pub fn record_outcome(&mut self, subject: &str, correct: bool) -> usize {
        let subject = subject.trim().to_lowercase();
        if subject.is_empty() {
            return 0;
        }
        let status = if correct {
            TopicStatus::Mastered
        } else {
            TopicStatus::InProgress
        };

        let mut hits = 0;
        for topic in &mut self.topics {
            let name = topic.name.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            if subject.contains(&name) || name.contains(&subject) {
                topic.status = status;
                hits += 1;
            }
        }
        hits
    }

    pub fn mastered_count(&self) -> usize {
        self.count(TopicStatus::Mastered)
    }

    pub fn count(&self, status: TopicStatus) -> usize {
        self.topics.iter().filter(|t| t.status == status).count()
    }

    /// Share of mastered topics, rounded to a whole percent.
    pub fn progress_percent(&self) -> u32 {
        if self.topics.is_empty() {
            return 0;
        }
        (self.mastered_count() as f64 / self.topics.len() as f64 * 100.0).round() as u32
    }

    /// Topics sorted by descending weight. Ties keep plan order.
    pub fn by_weight(&self) -> Vec<&SyllabusTopic> {
        let mut sorted: Vec<&SyllabusTopic> = self.topics.iter().collect();
        sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        sorted
    }
}
