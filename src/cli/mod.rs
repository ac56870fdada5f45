//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

/// Report a failed command and exit with status 1.
///
/// In JSON mode the error goes to stdout as `{"error": ...}` so scripts can
/// parse it; otherwise it is printed to stderr.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        println!("{}", serde_json::json!({ "error": format!("{err:#}") }));
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1)
}
