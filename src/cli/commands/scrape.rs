//! Venue scrape command.

use std::sync::Arc;

use anyhow::Context;
use console::style;
use url::Url;

use courtslots::config::Settings;
use courtslots::scrapers::events::Tee;
use courtslots::scrapers::{scraper_for, EventSink, MemorySink, ScrapeEvent, TracingSink};

use crate::cli::icons::{dim_arrow, error, success, warn};

pub struct ScrapeOptions {
    pub pretty: bool,
    pub events: bool,
}

/// Records events in memory while still logging them.
struct RecordingSink {
    memory: MemorySink,
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ScrapeEvent) {
        Tee::new(&self.memory, &TracingSink).emit(event);
    }
}

/// Venue name to record: the given one, else the URL's host.
fn venue_name(name: Option<&str>, url: &Url) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => url.host_str().unwrap_or_default().to_string(),
    }
}

pub async fn cmd_scrape(
    settings: &Settings,
    url: &str,
    name: Option<&str>,
    options: ScrapeOptions,
) -> anyhow::Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid venue URL: {}", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Venue URL must be http or https: {}", url);
    }
    let name = venue_name(name, &parsed);

    let recorder = Arc::new(RecordingSink {
        memory: MemorySink::new(),
    });
    let scraper = if options.events {
        scraper_for(settings).with_sink(recorder.clone())
    } else {
        scraper_for(settings)
    };

    let result = scraper.scrape(url, &name).await;

    let json = if options.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    if options.events {
        for event in recorder.memory.events() {
            eprintln!("{} {}", dim_arrow(), serde_json::to_string(&event)?);
        }
    }

    if let Some(message) = result.error_message() {
        eprintln!(
            "{} {} ({}): {}",
            error(),
            result.venue_name(),
            result.status(),
            message
        );
        anyhow::bail!("scrape of {} failed", url);
    }

    if result.total_courts() == 0 {
        eprintln!("{} No courts scraped for {}", warn(), url);
        return Ok(());
    }

    let available: usize = result.courts().iter().map(|c| c.available_slots()).sum();
    eprintln!(
        "{} {}: scraped {} court(s), {} available slot(s)",
        success(),
        result.venue_name(),
        style(result.total_courts()).cyan(),
        style(available).green()
    );
    Ok(())
}
