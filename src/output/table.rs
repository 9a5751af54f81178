//! Table rendering, via `comfy-table`, the idiomatic-Rust analogue of the
//! original's `go-pretty/table`.

use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::output::view::RecordView;

/// Renders a numbered listing of records: index, key, value (sentinel-
/// substituted per [`RecordView`]), and last-updated timestamp.
pub fn render_listing(views: &[RecordView]) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Key", "Value", "Updated"]);

    for (index, view) in views.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index).fg(Color::DarkGrey),
            Cell::new(&view.key).fg(Color::Cyan),
            Cell::new(view.value.as_deref().unwrap_or("")),
            Cell::new(view.timestamp.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Renders one key's full history, oldest first, with a `Latest` marker.
pub fn render_history(views: &[RecordView]) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Value", "Updated", "Latest"]);

    for (index, view) in views.iter().enumerate() {
        let is_latest = index == views.len() - 1;
        table.add_row(vec![
            Cell::new(index).fg(Color::DarkGrey),
            Cell::new(view.value.as_deref().unwrap_or("")),
            Cell::new(view.timestamp.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
            Cell::new(if is_latest { "*" } else { "" }).fg(Color::Green),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::record::Record;
    use chrono::Utc;

    #[test]
    fn render_listing_includes_every_row() {
        let record = Record {
            id: 1,
            key: "k".to_string(),
            value: "v".to_string(),
            is_locked: false,
            is_hidden: false,
            timestamp: Utc::now(),
            is_latest: true,
            expires_at: None,
        };
        let views = vec![RecordView::from_record(&record, false)];
        let rendered = render_listing(&views).to_string();
        assert!(rendered.contains('k'));
        assert!(rendered.contains('v'));
    }
}
