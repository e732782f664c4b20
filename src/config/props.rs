//! Tooltip property overrides (`[tips.props]`).
//!
//! Props are validated once and compiled into the object-literal fragment
//! spliced into every page script, e.g.
//! `placement: 'auto-start', maxWidth: 500, interactive: false`.

use super::{ConfigDiagnostics, FieldPath};
use toml::Value;

/// Placements accepted by the tooltip library.
pub const PLACEMENTS: [&str; 15] = [
    "auto",
    "auto-start",
    "auto-end",
    "top",
    "top-start",
    "top-end",
    "bottom",
    "bottom-start",
    "bottom-end",
    "right",
    "right-start",
    "right-end",
    "left",
    "left-start",
    "left-end",
];

const SUPPORTED: [&str; 6] = [
    "placement",
    "maxWidth",
    "interactive",
    "theme",
    "delay",
    "duration",
];

const PROPS: FieldPath = FieldPath::new("tips.props");
const PLACEMENT: FieldPath = FieldPath::new("tips.props.placement");
const MAX_WIDTH: FieldPath = FieldPath::new("tips.props.maxWidth");
const INTERACTIVE: FieldPath = FieldPath::new("tips.props.interactive");
const THEME: FieldPath = FieldPath::new("tips.props.theme");
const DELAY: FieldPath = FieldPath::new("tips.props.delay");
const DURATION: FieldPath = FieldPath::new("tips.props.duration");

/// An optional prop that may also be explicitly nulled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Setting<T> {
    #[default]
    Unset,
    Null,
    Value(T),
}

/// Validated tooltip properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipProps {
    pub placement: String,
    /// `None` renders as `'none'` (no width limit).
    pub max_width: Option<u32>,
    pub interactive: bool,
    pub theme: Setting<String>,
    pub delay: Setting<Vec<u32>>,
    pub duration: Setting<Vec<u32>>,
}

impl Default for TooltipProps {
    fn default() -> Self {
        Self {
            placement: "auto-start".to_string(),
            max_width: Some(500),
            interactive: false,
            theme: Setting::Unset,
            delay: Setting::Unset,
            duration: Setting::Unset,
        }
    }
}

impl TooltipProps {
    /// Merge user overrides over the defaults, reporting every invalid entry.
    pub fn from_table(table: &toml::Table, diag: &mut ConfigDiagnostics) -> Self {
        let mut props = Self::default();

        for (key, value) in table {
            match key.as_str() {
                "placement" => match value.as_str() {
                    Some(p) if PLACEMENTS.contains(&p) => props.placement = p.to_string(),
                    _ => diag.error_with_hint(
                        PLACEMENT,
                        format!("invalid placement {value}"),
                        format!("expected one of: {}", PLACEMENTS.join(", ")),
                    ),
                },
                "maxWidth" => match value {
                    Value::Integer(n) => match u32::try_from(*n) {
                        Ok(n) => props.max_width = Some(n),
                        Err(_) => diag.error(MAX_WIDTH, format!("{n} is out of range")),
                    },
                    Value::String(s) if s == "none" => props.max_width = None,
                    _ => diag.error(MAX_WIDTH, "must be an integer or \"none\""),
                },
                "interactive" => match value.as_bool() {
                    Some(b) => props.interactive = b,
                    None => diag.error(INTERACTIVE, "must be a boolean"),
                },
                "theme" => match value.as_str() {
                    Some("") => props.theme = Setting::Null,
                    Some(s) => props.theme = Setting::Value(s.to_string()),
                    None => diag.error(THEME, "must be a string (empty for none)"),
                },
                "delay" => props.delay = integer_list(value, DELAY, diag),
                "duration" => props.duration = integer_list(value, DURATION, diag),
                other => diag.error_with_hint(
                    PROPS,
                    format!("unsupported property `{other}`"),
                    format!("supported: {}", SUPPORTED.join(", ")),
                ),
            }
        }

        props
    }

    /// Compile into a JavaScript object-literal fragment (no braces).
    pub fn to_js(&self) -> String {
        let mut parts = vec![
            format!("placement: {}", js_quote(&self.placement)),
            format!(
                "maxWidth: {}",
                self.max_width
                    .map_or_else(|| "'none'".to_string(), |n| n.to_string())
            ),
            format!("interactive: {}", self.interactive),
        ];

        match &self.theme {
            Setting::Unset => {}
            Setting::Null => parts.push("theme: null".to_string()),
            Setting::Value(theme) => parts.push(format!("theme: {}", js_quote(theme))),
        }
        for (name, setting) in [("delay", &self.delay), ("duration", &self.duration)] {
            match setting {
                Setting::Unset => {}
                Setting::Null => parts.push(format!("{name}: null")),
                Setting::Value(values) => {
                    let list: Vec<_> = values.iter().map(u32::to_string).collect();
                    parts.push(format!("{name}: [{}]", list.join(", ")));
                }
            }
        }

        parts.join(", ")
    }
}

fn integer_list(value: &Value, field: FieldPath, diag: &mut ConfigDiagnostics) -> Setting<Vec<u32>> {
    let Some(items) = value.as_array() else {
        diag.error(field, "must be an array of integers");
        return Setting::Unset;
    };
    if items.is_empty() {
        return Setting::Null;
    }

    let parsed: Option<Vec<u32>> = items
        .iter()
        .map(|v| v.as_integer().and_then(|n| u32::try_from(n).ok()))
        .collect();
    match parsed {
        Some(values) => Setting::Value(values),
        None => {
            diag.error(field, "must contain only non-negative integers");
            Setting::Unset
        }
    }
}

/// Single-quoted JavaScript string literal.
fn js_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
