/// First row to draw so the highlighted row stays visible in a list of
/// `max_visible_rows`.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    highlighted: usize,
) -> usize {
    if total_rows <= max_visible_rows || highlighted < max_visible_rows {
        return 0;
    }

    highlighted + 1 - max_visible_rows
}
