//! The `iaprof essay` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use iaprof_core::driver::StudyDriver;
use iaprof_core::mentor::EssayInput;

use super::{build_mentor, read_image_base64};

pub async fn execute(
    file: Option<PathBuf>,
    text: Option<String>,
    image: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let input = essay_input(file, text, image)?;
    let (mentor, _) = build_mentor(config_path.as_deref())?;

    let mut driver = StudyDriver::new(mentor);
    driver.session_mut().open_essay()?;
    let analysis = driver.analyze_essay(&input).await?;

    println!("Nota: {:.0}/1000\n", analysis.score);
    for (n, competency) in analysis.competencies.iter() {
        println!("  C{n}: {:>3.0}  {}", competency.score, competency.feedback);
    }
    println!("\n{}", analysis.general_feedback);
    if !analysis.suggestions.is_empty() {
        println!("\nSugestões:");
        for suggestion in &analysis.suggestions {
            println!("  - {suggestion}");
        }
    }
    Ok(())
}

fn essay_input(
    file: Option<PathBuf>,
    text: Option<String>,
    image: Option<PathBuf>,
) -> Result<EssayInput> {
    let input = match (file, text, image) {
        (Some(path), None, None) => EssayInput::Text(
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read essay: {}", path.display()))?,
        ),
        (None, Some(text), None) => EssayInput::Text(text),
        (None, None, Some(path)) => EssayInput::Image(read_image_base64(&path)?),
        _ => anyhow::bail!("give exactly one of --file, --text or --image"),
    };
    if let EssayInput::Text(text) = &input {
        anyhow::ensure!(!text.trim().is_empty(), "essay text is empty");
    }
    Ok(input)
}
