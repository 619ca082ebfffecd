//! The `iaprof init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("iaprof.toml").exists() {
        println!("iaprof.toml already exists, skipping.");
    } else {
        std::fs::write("iaprof.toml", SAMPLE_CONFIG)?;
        println!("Created iaprof.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or edit iaprof.toml)");
    println!("  2. Run: iaprof catalog");
    println!("  3. Run: iaprof study --course PRF --board Cebraspe --goal \"Aprovação\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# iaprof configuration

# temperature = 0.7
max_retries = 2
retry_delay_ms = 1000
output_dir = "./iaprof-reports"

[provider]
type = "gemini"
api_key = "${GEMINI_API_KEY}"
# base_url = "https://generativelanguage.googleapis.com"

[models]
fast = "gemini-3-flash-preview"
deep = "gemini-3-pro-preview"
vision = "gemini-2.5-flash-image"
"#;
