//! Fixed-width text listings served to picker frontends.

use crate::tracker::operations::Tracker;
use crate::tracker::types::WindowRecord;

/// Truncate to `max` characters, marking the cut with an ellipsis when there
/// is room for one. Counts chars, not bytes, so multibyte titles stay intact.
pub fn max_len(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max > 3 {
        let mut out: String = s.chars().take(max - 3).collect();
        out.push_str("...");
        out
    } else {
        s.chars().take(max).collect()
    }
}

impl Tracker {
    fn format_row(&self, record: &WindowRecord) -> String {
        let w = self.listing_widths();
        let display = max_len(&record.output.replacen("HEADLESS-", "H-", 1), w.display);
        let space = max_len(&record.workspace, w.workspace);
        let app = max_len(&record.app, w.app);
        let title = max_len(&record.title, w.title);
        format!(
            "{display:<dw$} | {space:<sw$} | {app:<aw$} | {title:<tw$} ({id})",
            dw = w.display,
            sw = w.workspace,
            aw = w.app,
            tw = w.title,
            id = record.id,
        )
    }

    /// All tracked windows in MRU order, one formatted row each.
    pub fn switcher_list(&self) -> Vec<String> {
        self.records()
            .iter()
            .map(|record| self.format_row(record))
            .collect()
    }

    /// Windows eligible for a pick-and-move, which excludes everything on the
    /// focused window's workspace.
    pub fn pick_window_list(&self) -> Vec<String> {
        let focused_space = self
            .focused()
            .map(|rec| rec.workspace.clone())
            .unwrap_or_default();
        self.records()
            .iter()
            .filter(|record| record.workspace != focused_space)
            .map(|record| self.format_row(record))
            .collect()
    }

    /// Trailing `(id)` of a formatted row, parsed back out.
    pub fn parse_row_id(row: &str) -> Option<i64> {
        let start = row.rfind('(')?;
        let end = row.rfind(')')?;
        row.get(start + 1..end)?.parse().ok()
    }
}
