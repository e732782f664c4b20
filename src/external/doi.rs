//! DOI records.
//!
//! Records are fetched as JSON from the configured API and turned into tip
//! HTML by a [`RecordRenderer`], by default a minijinja template with the
//! record bound to `data` and a `map_join` filter available.

use minijinja::value::Rest;
use minijinja::{Environment, ErrorKind};
use serde_json::Value;
use thiserror::Error;

/// Errors turning a fetched record into HTML.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid template")]
    Template(#[source] minijinja::Error),

    #[error("template rendering failed")]
    Render(#[source] minijinja::Error),
}

/// Renders a fetched DOI record into tip HTML.
pub trait RecordRenderer {
    fn render(&self, data: &Value) -> Result<String, RenderError>;
}

/// Record URL for a DOI name.
pub fn record_url(api: &str, doi: &str) -> String {
    format!("{api}{doi}")
}

/// Template-based [`RecordRenderer`].
pub struct JinjaRenderer {
    env: Environment<'static>,
    source: String,
}

impl JinjaRenderer {
    /// Compile-check `source` and set up the environment.
    pub fn new(source: impl Into<String>) -> Result<Self, RenderError> {
        let source = source.into();

        Environment::new()
            .template_from_str(&source)
            .map_err(RenderError::Template)?;

        let mut env = Environment::new();
        env.add_filter("map_join", map_join_filter);

        Ok(Self { env, source })
    }
}

impl RecordRenderer for JinjaRenderer {
    fn render(&self, data: &Value) -> Result<String, RenderError> {
        self.env
            .render_str(&self.source, minijinja::context! { data => data })
            .map_err(RenderError::Render)
    }
}

/// Join selected attributes of each object into one string per object.
///
/// Missing or null attributes become `default`; non-string values are
/// rendered as JSON.
///
/// ```ignore
/// let authors = json!([{"given": "Ada", "family": "Lovelace"}, {"family": "Babbage"}]);
/// map_join(authors.as_array().unwrap(), &["given", "family"], " ", "")
///     == ["Ada Lovelace", " Babbage"]
/// ```
pub fn map_join(items: &[Value], attributes: &[&str], sep: &str, default: &str) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            attributes
                .iter()
                .map(|attr| match item.get(attr) {
                    None | Some(Value::Null) => default.to_string(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(sep)
        })
        .collect()
}

/// `items | map_join('attr', ..., sep=' ', default='')` in templates.
///
/// Keyword arguments arrive as a trailing kwargs value among the positional
/// ones, so they are split off by hand.
fn map_join_filter(
    items: Vec<minijinja::Value>,
    args: Rest<minijinja::Value>,
) -> Result<Vec<String>, minijinja::Error> {
    let (kwargs, positional) = match args.0.split_last() {
        Some((last, rest)) if last.is_kwargs() => (Some(last), rest),
        _ => (None, &args.0[..]),
    };

    let mut sep = " ".to_string();
    let mut default = String::new();
    if let Some(kwargs) = kwargs {
        for key in kwargs.try_iter()? {
            let value = kwargs.get_item(&key)?;
            match key.as_str() {
                Some("sep") => sep = value.to_string(),
                Some("default") => default = value.to_string(),
                _ => {
                    return Err(minijinja::Error::new(
                        ErrorKind::TooManyArguments,
                        format!("map_join got an unexpected keyword argument {key}"),
                    ));
                }
            }
        }
    }

    let attributes: Vec<&str> = positional
        .iter()
        .map(|attr| {
            attr.as_str().ok_or_else(|| {
                minijinja::Error::new(ErrorKind::InvalidOperation, "map_join attributes must be strings")
            })
        })
        .collect::<Result<_, _>>()?;

    let items: Vec<Value> = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|err| minijinja::Error::new(ErrorKind::InvalidOperation, err.to_string()))?;
    Ok(map_join(&items, &attributes, &sep, &default))
}
