//! Single-cell classification.

use courtslots::scrapers::classify;

pub fn cmd_classify(text: &str, classes: &str, style: &str) -> anyhow::Result<()> {
    let classification = classify(text, classes, style);
    println!("{}", serde_json::to_string_pretty(&classification)?);
    Ok(())
}
