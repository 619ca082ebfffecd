//! Markdown report generator.

use anyhow::Result;
use std::path::Path;

use iaprof_core::model::Question;
use iaprof_core::report::SessionReport;

/// Keep model text from breaking table cells or starting new blocks.
fn md_inline(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn answer_label(question: &Question, index: Option<usize>) -> String {
    match index.and_then(|i| question.options.get(i).map(|o| (i, o))) {
        Some((i, option)) => format!("{}) {}", Question::option_label(i), md_inline(option)),
        None => "—".to_string(),
    }
}

/// Generate a Markdown report from a session report.
pub fn generate_markdown(report: &SessionReport) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# Performance do Ciclo — {}\n\n",
        md_inline(&report.course)
    ));
    md.push_str(&format!(
        "**Banca:** {} · **Objetivo:** {} · {}\n\n",
        md_inline(&report.board),
        md_inline(&report.goal),
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!(
        "- Domínio do ciclo: **{}%** ({}/{} acertos)\n",
        report.score.percent, report.score.correct, report.score.total
    ));
    md.push_str(&format!(
        "- Edital 80/20 dominado: **{}%**\n",
        report.syllabus_progress
    ));

    if !report.mentor_feedback.is_empty() {
        md.push_str("\n## Feedback Final\n\n");
        for line in report.mentor_feedback.lines() {
            md.push_str(&format!("> {}\n", md_inline(line)));
        }
    }

    if !report.syllabus.is_empty() {
        md.push_str("\n## Edital Estratégico\n\n");
        md.push_str("| Tópico | Peso | Status |\n|---|---:|---|\n");
        for topic in report.syllabus.by_weight() {
            md.push_str(&format!(
                "| {} | {:.0} | {} |\n",
                md_inline(&topic.name),
                topic.weight,
                topic.status
            ));
        }
    }

    md.push_str("\n## Detalhamento das Questões\n\n");
    if report.results.is_empty() {
        md.push_str("_Nenhuma questão respondida._\n");
    }
    for (i, result) in report.results.iter().enumerate() {
        let q = &result.question;
        let mark = if result.is_correct { "✔" } else { "✘" };
        md.push_str(&format!("{}. {mark} {}\n", i + 1, md_inline(&q.text)));
        md.push_str(&format!(
            "   - {} · sua resposta: {}\n",
            md_inline(&q.subject),
            answer_label(q, result.user_answer)
        ));
        if !result.is_correct {
            md.push_str(&format!(
                "   - resposta correta: {}\n",
                answer_label(q, Some(q.correct_answer))
            ));
        }
    }

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(report: &SessionReport, path: &Path) -> Result<()> {
    let md = generate_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)?;
    Ok(())
}
