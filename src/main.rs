//! Artifact OCR Rater
//!
//! Fetches OCR text for an artifact screenshot URL, parses the upgrade
//! level and stat lines out of the noisy text, and prints a weighted
//! quality score for the sub-attributes.

mod config;
mod locale;
mod normalize;
mod ocr;
mod parser;
mod rater;
mod similarity;
mod stats;

use anyhow::{anyhow, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

use locale::LocalePack;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("artifact_rater.log")))
        .unwrap_or_else(|| "artifact_rater.log".into());
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    config::init_config();
    let config = config::get_config();

    let url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: artifact-rater <image-url>"))?;

    let pack = match &config.locale_file {
        Some(path) => LocalePack::load(path)?,
        None => match config.language.as_str() {
            "ja" => LocalePack::ja(),
            "en" => LocalePack::en(),
            other => return Err(anyhow!("unknown language '{}' in config", other)),
        },
    };

    log(&format!("Running OCR for {}", url));
    let text = ocr::fetch_text(&url, config.ocr_endpoint, &pack)?;

    let mut result = parser::parse(&text, &pack);
    match result.level {
        Some(level) => log(&format!("Level: +{}", level)),
        None => log("Level: not found"),
    }
    if result.entries.is_empty() {
        log("No stat lines recognized");
    }
    for (index, entry) in result.entries.iter().enumerate() {
        let role = if index == 0 { "main" } else { "sub" };
        let suffix = if entry.percent { "%" } else { "" };
        log(&format!(
            "  {}: {} {}{}",
            role,
            entry.attribute.label(),
            entry.value,
            suffix
        ));
    }

    let score = rater::rate(result.level, &mut result.entries, &config.weights);
    log(&format!("Score: {:.1}", score));

    Ok(())
}
