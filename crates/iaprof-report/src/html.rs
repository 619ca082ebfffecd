//! HTML report generator.
//!
//! Produces a self-contained, printable HTML page with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use iaprof_core::model::{Question, TopicStatus};
use iaprof_core::report::SessionReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn status_class(status: TopicStatus) -> &'static str {
    match status {
        TopicStatus::Pending => "pending",
        TopicStatus::InProgress => "progress",
        TopicStatus::Mastered => "mastered",
    }
}

fn option_text(question: &Question, index: Option<usize>) -> String {
    match index.and_then(|i| question.options.get(i).map(|o| (i, o))) {
        Some((i, option)) => format!("{}) {}", Question::option_label(i), html_escape(option)),
        None => "—".to_string(),
    }
}

/// Generate an HTML report from a session report.
pub fn generate_html(report: &SessionReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>IAprof mentor — {}</title>\n",
        html_escape(&report.course)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<p class=\"kicker\">Relatório Estratégico</p>\n");
    html.push_str("<h1>Performance do Ciclo</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\"><span class=\"tag\">{}</span> <span class=\"tag board\">{}</span> {}</p>\n",
        html_escape(&report.course),
        html_escape(&report.board),
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str(&format!(
        "<p class=\"goal\">Objetivo: {}</p>\n",
        html_escape(&report.goal)
    ));
    html.push_str("</header>\n");

    // Score cards
    html.push_str("<section class=\"cards\">\n");
    html.push_str(&format!(
        "<div class=\"card primary\"><span>Domínio do Ciclo</span><strong>{}%</strong></div>\n",
        report.score.percent
    ));
    html.push_str(&format!(
        "<div class=\"card\"><span>Acertos</span><strong>{}/{}</strong></div>\n",
        report.score.correct, report.score.total
    ));
    html.push_str(&format!(
        "<div class=\"card\"><span>Edital 80/20</span><strong>{}%</strong></div>\n",
        report.syllabus_progress
    ));
    html.push_str("</section>\n");

    // Mentor feedback
    if !report.mentor_feedback.is_empty() {
        html.push_str("<section class=\"feedback\">\n<h2>Feedback Final</h2>\n");
        html.push_str(&format!(
            "<blockquote>{}</blockquote>\n",
            html_escape(&report.mentor_feedback)
        ));
        html.push_str("</section>\n");
    }

    // Syllabus
    if !report.syllabus.is_empty() {
        html.push_str("<section>\n<h2>Edital Estratégico</h2>\n");
        html.push_str("<table>\n<thead><tr><th>Tópico</th><th>Peso</th><th>Status</th></tr></thead>\n<tbody>\n");
        for topic in report.syllabus.by_weight() {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{:.0}</td><td class=\"{}\">{}</td></tr>\n",
                html_escape(&topic.name),
                topic.weight,
                status_class(topic.status),
                topic.status,
            ));
        }
        html.push_str("</tbody></table>\n</section>\n");
    }

    // Per-question detail
    html.push_str("<section>\n<h2>Detalhamento das Questões</h2>\n");
    if report.results.is_empty() {
        html.push_str("<p class=\"empty\">Nenhuma questão respondida.</p>\n");
    }
    for (i, result) in report.results.iter().enumerate() {
        let q = &result.question;
        let class = if result.is_correct { "right" } else { "wrong" };
        html.push_str(&format!("<article class=\"result {class}\">\n"));
        html.push_str(&format!(
            "<h3>{}. {}</h3>\n",
            i + 1,
            html_escape(&q.text)
        ));
        html.push_str(&format!(
            "<p class=\"meta\">{} · {}</p>\n",
            html_escape(&q.subject),
            q.difficulty
        ));
        html.push_str(&format!(
            "<p>Sua resposta: {}</p>\n",
            option_text(q, result.user_answer)
        ));
        if !result.is_correct {
            html.push_str(&format!(
                "<p>Resposta correta: {}</p>\n",
                option_text(q, Some(q.correct_answer))
            ));
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");

    html.push_str("<footer>IAprof mentor</footer>\n");
    html.push_str("</body>\n</html>\n");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: system-ui, -apple-system, sans-serif; max-width: 880px; margin: 0 auto; padding: 2rem; color: #0f172a; background: #f8fafc; }
header { margin-bottom: 2rem; }
.kicker { color: #2563eb; font-weight: 800; text-transform: uppercase; letter-spacing: .2em; font-size: .75rem; }
h1 { font-size: 2.5rem; margin: .25rem 0 1rem; }
.tag { display: inline-block; padding: .25rem .75rem; border-radius: .75rem; background: #e2e8f0; font-weight: 700; font-size: .75rem; text-transform: uppercase; }
.tag.board { background: #dbeafe; color: #1d4ed8; }
.meta { color: #64748b; }
.goal { font-style: italic; }
.cards { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; margin-bottom: 2rem; }
.card { background: #fff; border-radius: 1.5rem; padding: 1.5rem; text-align: center; box-shadow: 0 4px 16px rgba(15,23,42,.06); }
.card span { display: block; font-size: .7rem; text-transform: uppercase; letter-spacing: .3em; color: #64748b; }
.card strong { font-size: 2.5rem; }
.card.primary { background: #2563eb; color: #fff; }
.card.primary span { color: #dbeafe; }
.feedback blockquote { font-size: 1.25rem; font-style: italic; background: #fff; border-left: 4px solid #2563eb; margin: 0; padding: 1rem 1.5rem; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { padding: .5rem .75rem; border-bottom: 1px solid #e2e8f0; text-align: left; }
td.mastered { color: #059669; font-weight: 700; }
td.progress { color: #d97706; font-weight: 700; }
td.pending { color: #94a3b8; }
.result { background: #fff; border-radius: 1rem; padding: 1rem 1.5rem; margin-bottom: 1rem; border-left: 4px solid; }
.result.right { border-color: #10b981; }
.result.wrong { border-color: #f43f5e; }
.empty { color: #94a3b8; }
footer { margin-top: 3rem; text-align: center; font-weight: 800; letter-spacing: .3em; text-transform: uppercase; font-size: .7rem; color: #94a3b8; }
@media print { body { background: #fff; } .card, .result { box-shadow: none; } }
"#;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use chrono::Utc;
    use iaprof_core::model::{AnswerMode, Difficulty, SessionResult, SyllabusTopic};
    use iaprof_core::session::Score;
    use iaprof_core::syllabus::Syllabus;
    use uuid::Uuid;

    pub(crate) fn make_test_report() -> SessionReport {
        let question = Question {
            id: "q1".into(),
            text: "Qual alternativa usa a crase <corretamente>?".into(),
            options: vec!["Vou à praia".into(), "Vou à pé".into()],
            correct_answer: 0,
            subject: "Português".into(),
            explanation: None,
            difficulty: Difficulty::Medium,
        };
        SessionReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            course: "PRF".into(),
            board: "Cebraspe".into(),
            subject: None,
            goal: "Aprovação em 2026".into(),
            score: Score {
                correct: 1,
                total: 2,
                percent: 50,
            },
            syllabus_progress: 50,
            syllabus: Syllabus::from_plan(vec![
                SyllabusTopic {
                    id: "t1".into(),
                    name: "Crase".into(),
                    weight: 40.0,
                    status: TopicStatus::Pending,
                },
                SyllabusTopic {
                    id: "t2".into(),
                    name: "Legislação de Trânsito".into(),
                    weight: 95.0,
                    status: TopicStatus::Pending,
                },
            ]),
            results: vec![
                SessionResult {
                    question: question.clone(),
                    user_answer: Some(0),
                    is_correct: true,
                    timestamp: Utc::now(),
                    mode: AnswerMode::AiGenerated,
                },
                SessionResult {
                    question,
                    user_answer: Some(1),
                    is_correct: false,
                    timestamp: Utc::now(),
                    mode: AnswerMode::AiGenerated,
                },
            ],
            mentor_feedback: "Foco na legislação & bons estudos!".into(),
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("PRF"));
        assert!(html.contains("Cebraspe"));
        assert!(html.contains("50%"));
        assert!(html.contains("1/2"));
        assert!(html.contains("Resposta correta: A) Vou à praia"));
    }

    #[test]
    fn html_escapes_model_text() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("&lt;corretamente&gt;"));
        assert!(html.contains("legislação &amp; bons"));
        assert!(!html.contains("<corretamente>"));
    }

    #[test]
    fn syllabus_is_listed_by_weight() {
        let html = generate_html(&make_test_report());
        let heavy = html.find("Legislação de Trânsito").unwrap();
        let light = html.find("<td>Crase</td>").unwrap();
        assert!(heavy < light);
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
