//! The `iaprof study` command: an interactive practice loop over stdin.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use iaprof_core::catalog::display_board;
use iaprof_core::driver::StudyDriver;
use iaprof_core::model::{FixationData, Question};
use iaprof_core::report::SessionReport;
use iaprof_report::{write_html_report, write_markdown_report};

use super::{build_mentor, goal_session, plan::syllabus_table};

pub async fn execute(
    course: String,
    board: Option<String>,
    subject: Option<String>,
    goal: String,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut session = goal_session(&course, board.as_deref(), subject.as_deref())?;
    session.set_goal(&goal);
    let (mentor, config) = build_mentor(config_path.as_deref())?;

    let mut driver = StudyDriver::with_session(mentor, session);
    eprintln!(
        "iaprof — {} ({}), preparando o ciclo...",
        driver.session().course(),
        display_board(driver.session().board())
    );
    driver.start_study().await?;
    eprintln!("Responda com a letra da alternativa; q encerra o ciclo.\n");

    practice(&mut driver, &mut std::io::stdin().lock()).await?;

    driver.finish().await?;
    let report = SessionReport::from_session(driver.session());
    tracing::info!(
        answered = report.score.total,
        correct = report.score.correct,
        "study session finished"
    );
    print_summary(&report);
    save_report(&report, &config.output_dir, &format)?;
    Ok(())
}

/// Answer questions until the student quits, input ends or a new cycle
/// cannot be started. Recorded answers are kept in every case.
pub(crate) async fn practice<R: BufRead>(driver: &mut StudyDriver, input: &mut R) -> Result<()> {
    loop {
        let Some(question) = driver.session().current_question().cloned() else {
            break;
        };
        print_question(&question, driver.session().results().len() + 1);

        let Some(line) = prompt(input, "Resposta: ")? else {
            break;
        };
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        let Some(index) = question.parse_label(&line) else {
            println!("Alternativa inválida: {line:?}");
            continue;
        };

        let outcome = driver.answer(index).await?;
        if outcome.correct {
            println!("✔ Correto!\n");
            continue;
        }

        println!(
            "✘ Incorreto. Resposta correta: {}) {}\n",
            Question::option_label(outcome.correct_answer),
            question
                .options
                .get(outcome.correct_answer)
                .map_or("", String::as_str)
        );
        match driver.session().fixation() {
            Some(fixation) => {
                print_fixation(fixation);
                let next = prompt(input, "Enter para continuar (q encerra): ")?;
                if next.map_or(true, |l| l.eq_ignore_ascii_case("q")) {
                    break;
                }
                if let Err(e) = driver.continue_after_fixation().await {
                    tracing::warn!("cycle restart failed, closing the session: {e:#}");
                    break;
                }
            }
            None => {
                if let Err(e) = driver.start_study().await {
                    tracing::warn!("cycle restart failed, closing the session: {e:#}");
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Read one trimmed line; `None` once input is exhausted.
fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_question(question: &Question, number: usize) {
    println!(
        "Questão {number} · {} · {}",
        question.subject, question.difficulty
    );
    println!("{}\n", question.text);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {option}", Question::option_label(i));
    }
    println!();
}

fn print_fixation(fixation: &FixationData) {
    println!("Conceito-chave: {}\n", fixation.main_topic);
    println!("{}\n", fixation.step_by_step);
    for (i, q) in fixation.fixation_questions.iter().enumerate() {
        println!("Fixação {}: {}", i + 1, q.text);
        for (j, option) in q.options.iter().enumerate() {
            println!("  {}) {option}", Question::option_label(j));
        }
        println!("  Gabarito: {}", Question::option_label(q.correct_answer));
        if let Some(explanation) = &q.explanation {
            println!("  {explanation}");
        }
        println!();
    }
}

fn print_summary(report: &SessionReport) {
    println!("\nPerformance do Ciclo");
    println!(
        "  Domínio do ciclo: {}% ({}/{} acertos)",
        report.score.percent, report.score.correct, report.score.total
    );
    println!("  Edital 80/20 dominado: {}%", report.syllabus_progress);
    if !report.syllabus.is_empty() {
        println!("{}", syllabus_table(&report.syllabus));
    }
    if !report.mentor_feedback.is_empty() {
        println!("\n{}", report.mentor_feedback);
    }
}

fn save_report(report: &SessionReport, output: &Path, format: &str) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "md"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("session-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("session-{timestamp}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "md" => {
                let path = output.join(format!("session-{timestamp}.md"));
                write_markdown_report(report, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }
    Ok(())
}
