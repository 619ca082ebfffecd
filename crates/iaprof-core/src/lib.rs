//! iaprof-core — session state, syllabus mastery and mentor orchestration.
//!
//! This crate defines the data model, the client-side session state machine
//! and the request/response shaping for the generative model that does all
//! the substantive work: question generation, remediation, OCR solving and
//! essay scoring.

pub mod catalog;
pub mod driver;
pub mod error;
pub mod mentor;
pub mod model;
pub mod prompts;
pub mod report;
pub mod schema;
pub mod session;
pub mod syllabus;
pub mod traits;
