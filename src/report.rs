//! Markdown report rendering.
//!
//! Plain Markdown only (headings, lists, links); nothing that requires a
//! particular downstream renderer. Never fails: an empty entry list renders
//! a "no matches" document.

use crate::models::{RankedEntry, Report, SearchMode};

/// Render the ranked list into a single Markdown document.
///
/// `failed_keywords` lists phrases whose searches were given up on; a
/// non-empty list adds a partial-coverage note so the reader knows the
/// report may be incomplete.
pub fn render(
    entries: &[RankedEntry],
    domain: &str,
    mode: SearchMode,
    failed_keywords: &[String],
) -> Report {
    let mut doc = String::new();

    doc.push_str(&format!("# GitHub repositories for \"{domain}\"\n\n"));
    doc.push_str(&format!("**Workflow**: `{mode}`\n\n"));

    if !failed_keywords.is_empty() {
        doc.push_str(&format!(
            "> Note: searches for {} could not be completed; results may be partial.\n\n",
            format_keyword_list(failed_keywords)
        ));
    }

    if entries.is_empty() {
        doc.push_str(&format!(
            "No matching repositories were found for \"{domain}\". \
             Try a different or more specific domain description.\n"
        ));
        return Report {
            markdown: doc,
            mode,
        };
    }

    doc.push_str(&format!(
        "Ranked by popularity, recent activity, and keyword coverage. \
         Showing {} result(s).\n\n",
        entries.len()
    ));

    for entry in entries {
        doc.push_str(&format!(
            "## {}. [{}]({})\n\n",
            entry.rank, entry.identifier, entry.url
        ));
        if let Some(description) = &entry.description {
            if !description.is_empty() {
                doc.push_str(&format!("{description}\n\n"));
            }
        }
        doc.push_str(&format!("- Stars: {}\n", entry.stars));
        doc.push_str(&format!("- Forks: {}\n", entry.forks));
        let last_activity = entry
            .pushed_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        doc.push_str(&format!("- Last activity: {last_activity}\n"));
        if let Some(language) = &entry.language {
            doc.push_str(&format!("- Language: {language}\n"));
        }
        let keywords: Vec<&str> = entry.matched_keywords.iter().map(|s| s.as_str()).collect();
        doc.push_str(&format!("- Matched keywords: {}\n\n", keywords.join(", ")));
    }

    Report {
        markdown: doc,
        mode,
    }
}

fn format_keyword_list(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
