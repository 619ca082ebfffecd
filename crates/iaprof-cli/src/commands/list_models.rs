//! The `iaprof list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use iaprof_providers::create_provider;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = iaprof_providers::load_config_from(config_path.as_deref())?;
    let provider = create_provider(&config.provider)?;

    println!("Provider: {}", provider.name());
    for model in provider.available_models() {
        println!(
            "  {} — {} ({}K context{})",
            model.id,
            model.name,
            model.max_context / 1000,
            if model.vision { ", vision" } else { "" },
        );
    }

    println!("\nConfigured:");
    println!("  fast   = {}", config.models.fast);
    println!("  deep   = {}", config.models.deep);
    println!("  vision = {}", config.models.vision);
    Ok(())
}
