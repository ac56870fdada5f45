//! Output formatting utilities for the CLI.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

/// Output of a command, renderable for people or as JSON.
pub trait CommandOutput: Serialize {
    /// Plain-text rendering.
    fn to_human(&self) -> String;
    /// JSON rendering for `--json`.
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` to stdout in the selected mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Comma-separated names, or `-` when there are none.
pub fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_table_uppercases_headers() {
        let mut table = list_table(&["contractor", "new"]);
        table.add_row(vec!["Acme Co", "Paused"]);
        let rendered = table.to_string();
        assert!(rendered.contains("CONTRACTOR"));
        assert!(rendered.contains("Acme Co"));
    }

    #[test]
    fn test_name_list() {
        assert_eq!(name_list(&[]), "-");
        assert_eq!(
            name_list(&["Acme Co".to_string(), "Beta LLC".to_string()]),
            "Acme Co, Beta LLC"
        );
    }
}
