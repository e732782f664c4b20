//! Template types for typed variable injection.

use std::marker::PhantomData;

/// A set of values substituted into a [`Template`].
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Static template text bound to the variables it accepts.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Replace placeholders in one pass over `content`.
///
/// Each `(placeholder, value)` pair is matched literally; inserted values are
/// never scanned again.
pub fn substitute(content: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("__") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match vars.iter().find(|(placeholder, _)| tail.starts_with(placeholder)) {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push_str("__");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_single_pass() {
        let out = substitute(
            "a(__A__) b(__B__) __proto__",
            &[("__A__", "__B__"), ("__B__", "x")],
        );
        assert_eq!(out, "a(__B__) b(x) __proto__");
    }
}
