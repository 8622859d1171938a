use shorturl_core::{CoreError, Mapping, ShortCode};

/// A hyperlink cell. Both fields are plain text; views must escape them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Link to the destination URL.
    pub long_url: Link,
    /// Link to the short URL, resolved against the session host.
    pub short_url: Link,
    /// The code the row's delete control acts on, captured at render time.
    pub short_code: ShortCode,
}

impl TableRow {
    pub fn for_mapping(mapping: &Mapping, host: &str) -> Self {
        let code = &mapping.short_code;
        Self {
            long_url: Link {
                href: mapping.long_url.clone(),
                text: mapping.long_url.clone(),
            },
            short_url: Link {
                href: format!("/{}", code.to_path_segment()),
                text: code.to_url(host),
            },
            short_code: code.clone(),
        }
    }
}

/// The surface an [`AdminPanel`](crate::AdminPanel) draws on.
///
/// Calls arrive from whichever task drives the panel, so implementations use
/// interior mutability.
pub trait View: Send + Sync + 'static {
    /// Replaces every table row with `rows`, in order.
    ///
    /// Called with the table already updated and unlocked, so implementations
    /// may read the panel back. They must not render through it.
    fn render_rows(&self, rows: &[TableRow]);

    /// Empties the long URL and short code fields of the create form.
    fn clear_form(&self);

    /// Shows a blocking alert.
    fn alert(&self, message: &str);

    /// Tells the operator a create or delete did not go through.
    fn report_error(&self, error: &CoreError);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_links() {
        let row = TableRow::for_mapping(
            &Mapping::new("abc", "https://example.com/page"),
            "short.example:8080",
        );
        assert_eq!(row.long_url.href, "https://example.com/page");
        assert_eq!(row.long_url.text, "https://example.com/page");
        assert_eq!(row.short_url.href, "/abc");
        assert_eq!(row.short_url.text, "short.example:8080/abc");
        assert_eq!(row.short_code.as_str(), "abc");
    }

    #[test]
    fn short_href_is_encoded() {
        let row = TableRow::for_mapping(&Mapping::new("a b", "https://e.example"), "h");
        assert_eq!(row.short_url.href, "/a%20b");
        assert_eq!(row.short_url.text, "h/a b");
    }
}
