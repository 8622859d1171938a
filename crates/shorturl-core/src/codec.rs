use crate::error::{CoreError, Result};
use crate::mapping::Mapping;
use serde::{Deserialize, Serialize};

/// Body of a JSON create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBody {
    pub url: String,
}

/// A create request body in the shape the variant expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// `{"url": "<long url>"}` sent as `application/json`.
    Json(CreateBody),
    /// `<long url>;<short code>` sent as plain text.
    Text(String),
}

impl Payload {
    /// Parses a plaintext create body.
    ///
    /// The split happens at the last `;` so long URLs may contain semicolons.
    pub fn parse_text(body: &str) -> Result<Mapping> {
        let (long_url, short_code) = body
            .rsplit_once(';')
            .ok_or_else(|| CoreError::Decode(format!("missing ';' separator: '{body}'")))?;
        Ok(Mapping::new(short_code, long_url))
    }
}

/// Wire format of the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// A JSON array of `{url, short_code}` objects.
    Json,
    /// One `short_code,long_url` line per mapping; blank lines are ignored.
    DelimitedText,
}

impl ListFormat {
    /// Parses a list response body, preserving server order.
    pub fn decode(&self, body: &str) -> Result<Vec<Mapping>> {
        match self {
            ListFormat::Json => Ok(serde_json::from_str(body)?),
            ListFormat::DelimitedText => decode_text(body),
        }
    }

    /// Serializes mappings the way the backend sends them.
    pub fn encode(&self, mappings: &[Mapping]) -> Result<String> {
        match self {
            ListFormat::Json => Ok(serde_json::to_string(mappings)?),
            ListFormat::DelimitedText => Ok(mappings
                .iter()
                .map(|m| format!("{},{}\n", m.short_code, m.long_url))
                .collect()),
        }
    }
}

fn decode_text(body: &str) -> Result<Vec<Mapping>> {
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            // split once: the long url may itself contain commas
            let (short_code, long_url) = line.split_once(',').ok_or_else(|| {
                CoreError::Decode(format!("line {} has no ',' separator", index + 1))
            })?;
            Ok(Mapping::new(short_code, long_url))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_ignores_blank_lines() {
        let body = "abc,https://a.example\n\n\ndef,https://d.example\n";
        let mappings = ListFormat::DelimitedText.decode(body).unwrap();
        assert_eq!(
            mappings,
            vec![
                Mapping::new("abc", "https://a.example"),
                Mapping::new("def", "https://d.example"),
            ]
        );
    }

    #[test]
    fn text_keeps_commas_in_long_url() {
        let body = "q,https://s.example/?tags=a,b,c\r\n";
        let mappings = ListFormat::DelimitedText.decode(body).unwrap();
        assert_eq!(mappings[0].long_url, "https://s.example/?tags=a,b,c");
    }

    #[test]
    fn text_rejects_line_without_separator() {
        let err = ListFormat::DelimitedText
            .decode("abc,https://a.example\nbroken\n")
            .unwrap_err();
        assert_eq!(err, CoreError::Decode("line 2 has no ',' separator".into()));
    }

    #[test]
    fn empty_bodies_decode_to_empty_lists() {
        assert!(ListFormat::DelimitedText.decode("").unwrap().is_empty());
        assert!(ListFormat::Json.decode("[]").unwrap().is_empty());
    }

    #[test]
    fn json_preserves_server_order() {
        let body = r#"[{"url":"https://z.example","short_code":"z"},{"url":"https://a.example","short_code":"a"}]"#;
        let codes: Vec<_> = ListFormat::Json
            .decode(body)
            .unwrap()
            .into_iter()
            .map(|m| m.short_code.to_string())
            .collect();
        assert_eq!(codes, ["z", "a"]);
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(matches!(
            ListFormat::Json.decode("not json"),
            Err(CoreError::Decode(_))
        ));
    }

    #[test]
    fn encoded_lists_decode_in_order() {
        let mappings = vec![
            Mapping::new("b", "https://b.example/x,y"),
            Mapping::new("a", "https://a.example"),
        ];
        for format in [ListFormat::Json, ListFormat::DelimitedText] {
            let body = format.encode(&mappings).unwrap();
            assert_eq!(format.decode(&body).unwrap(), mappings);
        }
    }

    #[test]
    fn text_payload_splits_at_last_semicolon() {
        let mapping = Payload::parse_text("https://e.example/a;b;code").unwrap();
        assert_eq!(mapping, Mapping::new("code", "https://e.example/a;b"));
        assert!(Payload::parse_text("no separator").is_err());
    }
}
