use parking_lot::Mutex;
use shorturl_core::CoreError;
use shorturl_panel::{TableRow, View};

/// Keeps the last rendered rows and prints them as aligned columns.
#[derive(Debug, Default)]
pub struct TerminalView {
    rows: Mutex<Vec<TableRow>>,
}

impl TerminalView {
    pub fn print(&self) {
        let rows = self.rows.lock();
        if rows.is_empty() {
            println!("(no mappings)");
            return;
        }

        let code_width = column_width("CODE", rows.iter().map(|row| row.short_code.as_str()));
        let link_width = column_width("SHORT URL", rows.iter().map(|row| row.short_url.text.as_str()));

        println!("{:code_width$}  {:link_width$}  LONG URL", "CODE", "SHORT URL");
        for row in rows.iter() {
            println!(
                "{:code_width$}  {:link_width$}  {}",
                row.short_code.as_str(),
                row.short_url.text,
                row.long_url.text
            );
        }
    }
}

/// Width in chars of the widest cell, header included. `{:width$}` pads by chars.
fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.chars().count())
}

impl View for TerminalView {
    fn render_rows(&self, rows: &[TableRow]) {
        *self.rows.lock() = rows.to_vec();
    }

    fn clear_form(&self) {}

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn report_error(&self, error: &CoreError) {
        eprintln!("error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_chars() {
        assert_eq!(column_width("CODE", ["ab", "café"].into_iter()), 4);
        assert_eq!(column_width("CODE", ["ünïcødé"].into_iter()), 7);
        assert_eq!(column_width("SHORT URL", std::iter::empty()), 9);
    }

    #[test]
    fn render_keeps_last_rows() {
        let view = TerminalView::default();
        let rows = vec![TableRow::for_mapping(
            &shorturl_core::Mapping::new("é", "https://example.com"),
            "h",
        )];
        view.render_rows(&rows);
        assert_eq!(*view.rows.lock(), rows);
    }
}
