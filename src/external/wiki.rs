//! Wikipedia page summaries.

use serde_json::Value;

use super::http::FetchError;

const SUMMARY_API: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";

/// Summary endpoint for a page title (as it appears in the link).
pub fn summary_url(title: &str) -> String {
    format!("{SUMMARY_API}{title}")
}

/// Tip HTML from a summary response: the extract, preceded by a floated
/// thumbnail when the page has one.
pub fn render_summary(data: &Value) -> Result<String, FetchError> {
    let extract = data
        .get("extract_html")
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::Payload("missing `extract_html`".into()))?;

    match data.pointer("/thumbnail/source").and_then(Value::as_str) {
        Some(src) => Ok(format!(
            r#"<img src="{}" alt="Wikipedia thumbnail" style="float:left; margin-right:10px;">{extract}"#,
            crate::utils::html::escape_attr(src)
        )),
        None => Ok(extract.to_string()),
    }
}
