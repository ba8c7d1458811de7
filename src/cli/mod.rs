//! Command-line interface for courtslots.

mod commands;
pub mod icons;

pub use commands::{is_verbose, run};
