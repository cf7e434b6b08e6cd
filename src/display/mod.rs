//! Display formatting for terminal output
//!
//! Renders group listings and per-file failure reports as plain text.

use crate::error::ItemFailure;
use crate::groups::GroupListing;

/// Format the groups of an archive, one `  - item` line per entry
pub fn format_group_list(listing: &[GroupListing]) -> String {
    if listing.is_empty() {
        return "No groups in archive.".to_string();
    }

    let mut output = String::new();
    for group in listing {
        output.push_str(&format!("Group: {}\n", group.name));
        for item in &group.items {
            output.push_str(&format!("  - {}\n", item));
        }
    }
    output
}

/// Format per-file failures under a heading, or nothing if there are none
pub fn format_failures(heading: &str, failures: &[ItemFailure]) -> String {
    if failures.is_empty() {
        return String::new();
    }

    let mut output = format!("{} ({}):\n", heading, failures.len());
    for failure in failures {
        output.push_str(&format!(
            "  {}: {}\n",
            failure.path.display(),
            failure.error
        ));
    }
    output
}
