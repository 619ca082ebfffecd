//! The `iaprof subjects` command.

use std::path::PathBuf;

use anyhow::Result;

use iaprof_core::catalog::display_board;

use super::{build_mentor, goal_session};

pub async fn execute(
    course: String,
    board: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let session = goal_session(&course, board.as_deref(), None)?;
    let (mentor, _) = build_mentor(config_path.as_deref())?;

    let subjects = mentor
        .course_subjects(session.course(), session.board())
        .await?;

    println!(
        "Disciplinas-chave: {} ({})",
        session.course(),
        display_board(session.board())
    );
    for subject in &subjects {
        println!("  {subject}");
    }
    Ok(())
}
