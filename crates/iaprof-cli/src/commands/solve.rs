//! The `iaprof solve` command.

use std::path::PathBuf;

use anyhow::Result;

use iaprof_core::driver::StudyDriver;

use super::{build_mentor, read_image_base64};

pub async fn execute(image: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let data = read_image_base64(&image)?;
    let (mentor, _) = build_mentor(config_path.as_deref())?;

    let mut driver = StudyDriver::new(mentor);
    driver.session_mut().open_ocr()?;
    let solution = driver.solve_image(&data).await?;

    println!("Questão:\n  {}\n", solution.question);
    println!("Resposta: {}\n", solution.answer);
    println!("Explicação:\n  {}", solution.explanation);
    Ok(())
}
