use anyhow::{Context, Result};
use colored::Colorize;
use haru_application::HaruApp;
use std::fs;
use std::path::{Path, PathBuf};

pub fn export(app: &HaruApp, output: Option<PathBuf>) -> Result<()> {
    let blob = app.export()?;
    match output {
        Some(path) => {
            fs::write(&path, blob + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{}", format!("Exported to {}", path.display()).green());
        }
        None => println!("{blob}"),
    }
    Ok(())
}

pub fn import(app: &HaruApp, file: &Path) -> Result<()> {
    let blob = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = app
        .try_import(&blob)
        .with_context(|| format!("Import of {} failed; stored data is unchanged", file.display()))?;
    println!(
        "{}",
        format!("Imported {}", summary.keys_written.join(", ")).green()
    );
    Ok(())
}
