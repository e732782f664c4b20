//! Hosted documentation embeds.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;

use super::http::FetchError;
use crate::html::Fragment;

const EMBED_API: &str = "https://readthedocs.org/api/v3/embed/?url=";

/// Characters that would otherwise end or split the `url` query value.
const QUERY_VALUE: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'&').add(b'+');

/// Embed endpoint for a documentation URL.
pub fn embed_url(url: &str) -> String {
    format!("{EMBED_API}{}", utf8_percent_encode(url, QUERY_VALUE))
}

/// Embedded section HTML, or `None` if it has no visible text.
pub fn extract_content(data: &Value) -> Result<Option<String>, FetchError> {
    let content = data
        .get("content")
        .ok_or_else(|| FetchError::Payload("missing `content`".into()))?;

    let Some(html) = content.as_str() else {
        return Ok(None);
    };
    let has_text = !Fragment::parse(html).text_content().trim().is_empty();
    Ok(has_text.then(|| html.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embed_url_escapes_query_chars() {
        assert_eq!(
            embed_url("https://docs.example.org/en/latest/a b.html?x=1&y=2+3#sec"),
            "https://readthedocs.org/api/v3/embed/?url=\
             https://docs.example.org/en/latest/a%20b.html?x=1%26y=2%2B3%23sec"
        );
    }

    #[test]
    fn test_extract_content() {
        let data = json!({"content": "<section><p>Hello</p></section>"});
        assert_eq!(
            extract_content(&data).unwrap().as_deref(),
            Some("<section><p>Hello</p></section>")
        );
    }

    #[test]
    fn test_blank_content_dropped() {
        for content in [json!(""), json!("<div>  \n </div>"), json!(null)] {
            let data = json!({ "content": content });
            assert_eq!(extract_content(&data).unwrap(), None);
        }
    }

    #[test]
    fn test_missing_content_is_error() {
        assert!(extract_content(&json!({"detail": "nope"})).is_err());
    }
}
