//! Configuration display.

use std::path::Path;

use console::style;

use courtslots::config::{discover_config, Settings};

use crate::cli::icons::dim_arrow;

/// Print the effective settings, noting which file they came from.
pub fn cmd_config_show(settings: &Settings, explicit: Option<&Path>) -> anyhow::Result<()> {
    match explicit.map(Path::to_path_buf).or_else(discover_config) {
        Some(path) => eprintln!("{} Source: {}", dim_arrow(), path.display()),
        None => eprintln!("{} Source: {}", dim_arrow(), style("defaults").dim()),
    }
    print!("{}", settings.to_toml()?);
    Ok(())
}
