// 🔎 Window Finder
// Rows of a reference table around a target x, for the preview panel

use crate::reference::{ReferenceRow, ReferenceTable};

pub const DEFAULT_WINDOW: usize = 5;

/// Return `size` contiguous rows centered on the row closest to `target_x`.
///
/// Rows are stably sorted by x first. Ties on distance go to the first
/// row in sorted order. The window is clamped to the table, so it always
/// holds `min(size, table.len())` rows.
pub fn window(table: &ReferenceTable, target_x: f64, size: usize) -> Vec<ReferenceRow> {
    let mut sorted: Vec<&ReferenceRow> = table.rows.iter().collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    if sorted.is_empty() || size == 0 {
        return Vec::new();
    }

    let mut closest = 0;
    let mut best = f64::INFINITY;
    for (idx, row) in sorted.iter().enumerate() {
        let diff = (row.x - target_x).abs();
        if diff < best {
            best = diff;
            closest = idx;
        }
    }

    let half = size / 2;
    let mut start = closest.saturating_sub(half);
    let mut end = start + size;
    if end > sorted.len() {
        end = sorted.len();
        start = end.saturating_sub(size);
    }

    sorted[start..end].iter().map(|row| (*row).clone()).collect()
}
