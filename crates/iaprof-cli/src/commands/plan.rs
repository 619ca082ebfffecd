//! The `iaprof plan` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use iaprof_core::catalog::display_board;
use iaprof_core::syllabus::Syllabus;

use super::{build_mentor, goal_session};

pub async fn execute(
    course: String,
    board: Option<String>,
    subject: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let session = goal_session(&course, board.as_deref(), subject.as_deref())?;
    let (mentor, _) = build_mentor(config_path.as_deref())?;

    let plan = mentor
        .study_plan(session.course(), session.board(), session.subject())
        .await?;
    let syllabus = Syllabus::from_plan(plan);

    println!(
        "Edital 80/20: {} ({}) — {}",
        session.course(),
        display_board(session.board()),
        session.subject().unwrap_or("foco geral")
    );
    println!("{}", syllabus_table(&syllabus));
    Ok(())
}

pub(crate) fn syllabus_table(syllabus: &Syllabus) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Tópico", "Peso", "Status"]);
    for topic in syllabus.by_weight() {
        table.add_row(vec![
            Cell::new(&topic.name),
            Cell::new(format!("{:.0}", topic.weight)),
            Cell::new(topic.status),
        ]);
    }
    table
}
