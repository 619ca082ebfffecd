//! iaprof-report — session report rendering.
//!
//! Turns a [`iaprof_core::report::SessionReport`] into a self-contained
//! HTML page or a Markdown summary. JSON output lives on the report type
//! itself.

pub mod html;
pub mod markdown;

pub use html::{generate_html, write_html_report};
pub use markdown::{generate_markdown, write_markdown_report};
