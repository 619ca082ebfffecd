pub mod catalog;
pub mod essay;
pub mod init;
pub mod list_models;
pub mod plan;
pub mod solve;
pub mod study;
pub mod subjects;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine as _;

use iaprof_core::mentor::Mentor;
use iaprof_core::session::Session;
use iaprof_providers::{create_provider, load_config_from, IaprofConfig};

/// Load the configuration and bind a mentor to the configured provider.
pub(crate) fn build_mentor(config_path: Option<&Path>) -> Result<(Mentor, IaprofConfig)> {
    let config = load_config_from(config_path)?;
    let provider = create_provider(&config.provider)?;
    let mentor = Mentor::new(Arc::from(provider), config.mentor_config());
    tracing::debug!(provider = mentor.provider_name(), "mentor ready");
    Ok((mentor, config))
}

/// A session in goal setting with the course, board and subject applied.
///
/// Every course except ENEM needs a board.
pub(crate) fn goal_session(
    course: &str,
    board: Option<&str>,
    subject: Option<&str>,
) -> Result<Session> {
    let mut session = Session::new();
    session.enter_goal_setting()?;
    session.select_course(course);
    anyhow::ensure!(!session.course().is_empty(), "--course must not be blank");
    if let Some(board) = board {
        session.select_board(board);
    }
    anyhow::ensure!(
        session.needs_subject_listing(),
        "--board is required for {}",
        session.course()
    );
    session.select_subject(subject);
    Ok(session)
}

/// Read an image file as the base64 payload the model API expects.
pub(crate) fn read_image_base64(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image: {}", path.display()))?;
    anyhow::ensure!(!bytes.is_empty(), "image is empty: {}", path.display());
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
