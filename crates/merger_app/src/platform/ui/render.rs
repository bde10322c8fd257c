use std::fmt::Write as _;

use merger_core::{AppViewModel, ListState, Notice, Theme};

const HISTORY_REMINDER: &str = "previously uploaded, reupload to merge";

/// Renders the full view as terminal text: the ordered list, the status
/// line with available actions, and the latest notice.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    if view.entries.is_empty() {
        out.push_str("No files selected\n");
    } else {
        for (position, row) in view.entries.iter().enumerate() {
            match row.size_bytes {
                Some(size) => {
                    let _ = writeln!(
                        out,
                        "{:>2}. {} ({})",
                        position + 1,
                        row.name,
                        format_size_mb(size)
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{:>2}. {} ({})",
                        position + 1,
                        row.name,
                        HISTORY_REMINDER
                    );
                }
            }
        }
    }

    let state_label = match view.list {
        ListState::Empty => "empty",
        ListState::HistoryOnly => "history only",
        ListState::Populated => "ready",
    };
    let theme_label = match view.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    let mut actions = Vec::new();
    if view.merge_in_flight {
        actions.push("merging...");
    }
    if view.merge_available {
        actions.push("merge");
    }
    if view.clear_history_available {
        actions.push("clear");
    }
    let _ = writeln!(
        out,
        "[{} | {} file(s) | theme: {}{}{}]",
        state_label,
        view.entries.len(),
        theme_label,
        if actions.is_empty() { "" } else { " | " },
        actions.join(", ")
    );

    if let Some(notice) = &view.notice {
        match notice {
            Notice::ValidationRejected(reason) => {
                let _ = writeln!(out, "rejected: {reason}");
            }
            Notice::MergeFailed(reason) => {
                let _ = writeln!(out, "merge failed: {reason}");
            }
            Notice::MergeSucceeded(report) => {
                let _ = writeln!(
                    out,
                    "merged {} pages into {} ({})",
                    report.pages,
                    report.output.display(),
                    format_size_mb(report.size_bytes)
                );
            }
        }
    }

    out
}

fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}
