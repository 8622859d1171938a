use crate::panel::PanelEvent;
use crate::view::{Link, TableRow, View};
use parking_lot::Mutex;
use shorturl_core::CoreError;

/// URL schemes that would run script when the link is followed.
const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

#[derive(Debug, Default)]
struct State {
    rows: String,
    long_url: String,
    short_code: String,
    alerts: Vec<String>,
    errors: Vec<String>,
}

/// Renders the mapping table as HTML `<tr>` markup.
///
/// Every piece of row text is escaped, so a crafted long URL shows up as
/// text instead of becoming markup. Links whose scheme could run script are
/// rendered with a `#` href. The create form's fields live here too, so
/// [`submit_event`](Self::submit_event) reads what the operator typed.
#[derive(Debug, Default)]
pub struct HtmlTableView {
    state: Mutex<State>,
}

impl HtmlTableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table body markup from the last render.
    pub fn markup(&self) -> String {
        self.state.lock().rows.clone()
    }

    /// Fills the create form, as typing into it would.
    pub fn fill_form(&self, long_url: impl Into<String>, short_code: impl Into<String>) {
        let mut state = self.state.lock();
        state.long_url = long_url.into();
        state.short_code = short_code.into();
    }

    /// Current `(long_url, short_code)` form values.
    pub fn form(&self) -> (String, String) {
        let state = self.state.lock();
        (state.long_url.clone(), state.short_code.clone())
    }

    /// The event a submit of the form in its current state produces.
    pub fn submit_event(&self) -> PanelEvent {
        let (long_url, short_code) = self.form();
        PanelEvent::Submit {
            long_url,
            short_code,
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.lock().alerts.clone()
    }

    /// Error messages reported for failed actions, oldest first.
    pub fn errors(&self) -> Vec<String> {
        self.state.lock().errors.clone()
    }
}

impl View for HtmlTableView {
    fn render_rows(&self, rows: &[TableRow]) {
        let markup: String = rows.iter().map(render_row).collect();
        self.state.lock().rows = markup;
    }

    fn clear_form(&self) {
        let mut state = self.state.lock();
        state.long_url.clear();
        state.short_code.clear();
    }

    fn alert(&self, message: &str) {
        self.state.lock().alerts.push(message.to_string());
    }

    fn report_error(&self, error: &CoreError) {
        self.state.lock().errors.push(error.to_string());
    }
}

fn render_row(row: &TableRow) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td><button type=\"button\" data-short-code=\"{}\">&times;</button></td></tr>",
        render_link(&row.long_url),
        render_link(&row.short_url),
        v_htmlescape::escape(row.short_code.as_str()),
    )
}

fn render_link(link: &Link) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        v_htmlescape::escape(safe_href(&link.href)),
        v_htmlescape::escape(&link.text)
    )
}

fn safe_href(href: &str) -> &str {
    let normalized: String = href
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
    {
        "#"
    } else {
        href
    }
}

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorturl_core::Mapping;

    fn rows(mappings: &[Mapping]) -> Vec<TableRow> {
        mappings
            .iter()
            .map(|m| TableRow::for_mapping(m, "short.example"))
            .collect()
    }

    fn expected_row(code: &str, long_url: &str) -> String {
        format!(
            "<tr><td><a href=\"{url}\">{url}</a></td>\
             <td><a href=\"{href}\">{text}</a></td>\
             <td><button type=\"button\" data-short-code=\"{code}\">&times;</button></td></tr>",
            url = escape(long_url),
            href = escape(&format!("/{code}")),
            text = escape(&format!("short.example/{code}")),
        )
    }

    #[test]
    fn renders_one_row_per_mapping() {
        let view = HtmlTableView::new();
        view.render_rows(&rows(&[
            Mapping::new("abc", "https://example.com"),
            Mapping::new("def", "https://example.org"),
        ]));

        assert_eq!(
            view.markup(),
            expected_row("abc", "https://example.com") + &expected_row("def", "https://example.org")
        );
    }

    #[test]
    fn empty_list_renders_nothing() {
        let view = HtmlTableView::new();
        view.render_rows(&rows(&[Mapping::new("abc", "https://example.com")]));
        view.render_rows(&[]);
        assert_eq!(view.markup(), "");
    }

    #[test]
    fn markup_in_long_url_is_escaped() {
        let view = HtmlTableView::new();
        view.render_rows(&rows(&[Mapping::new(
            "x",
            "https://e.example/'><script>alert(1)</script>",
        )]));

        let markup = view.markup();
        assert!(!markup.contains("<script>"));
        assert!(!markup.contains("'>"));
        assert!(markup.contains("&#x27;&gt;&lt;script&gt;alert(1)&lt;"));
    }

    #[test]
    fn script_schemes_are_neutralized() {
        let view = HtmlTableView::new();
        view.render_rows(&rows(&[Mapping::new("x", " JavaScript:alert(1)")]));

        let markup = view.markup();
        assert!(markup.starts_with("<tr><td><a href=\"#\"> JavaScript:alert(1)</a>"));
    }

    #[test]
    fn form_round_trip() {
        let view = HtmlTableView::new();
        view.fill_form("https://example.com", "abc");
        assert_eq!(
            view.submit_event(),
            PanelEvent::Submit {
                long_url: "https://example.com".to_string(),
                short_code: "abc".to_string(),
            }
        );

        view.clear_form();
        assert_eq!(view.form(), (String::new(), String::new()));
    }

    #[test]
    fn escape_covers_attribute_quotes() {
        assert_eq!(escape(r#"a&b"c'd"#), "a&amp;b&quot;c&#x27;d");
        assert_eq!(escape("<b>"), "&lt;b&gt;");
    }
}
