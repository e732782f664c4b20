//! Embedded static resources.
//!
//! - `template` - Template types for typed variable injection
//! - `script` - The per-page tooltip binding script
//!
//! ```ignore
//! use embed::script::{TIP_SCRIPT, TipScriptVars};
//!
//! let js = TIP_SCRIPT.render(&vars);
//! ```

mod template;

pub use template::{Template, TemplateVars, substitute};

pub mod script {
    use super::{Template, TemplateVars, substitute};

    /// `onShow` hook typesetting math inside a freshly shown tooltip.
    const MATHJAX_ON_SHOW: &str =
        "onShow(instance) {MathJax.typesetPromise([instance.popper]).then(() => {});},";

    /// Variables for tippy.js.
    ///
    /// `selector_to_html` and `skip_classes` are JSON literals; `props` is a
    /// JavaScript object-literal fragment without braces.
    pub struct TipScriptVars {
        pub selector_to_html: String,
        pub skip_classes: String,
        pub parent_selector: String,
        pub add_class: Option<String>,
        pub props: String,
        pub math: bool,
    }

    impl TemplateVars for TipScriptVars {
        fn apply(&self, content: &str) -> String {
            let add_class = self
                .add_class
                .as_ref()
                .map(|class| format!("            link.classList.add({class});\n"))
                .unwrap_or_default();
            let on_show = if self.math {
                format!("                {MATHJAX_ON_SHOW}\n")
            } else {
                String::new()
            };

            substitute(
                content,
                &[
                    ("__ADD_CLASS__\n", &add_class),
                    ("__ON_SHOW__\n", &on_show),
                    ("__PROPS__", &self.props),
                    ("__PARENT_SELECTOR__", &self.parent_selector),
                    ("__SKIP_CLASSES__", &self.skip_classes),
                    ("__SELECTOR_TO_HTML__", &self.selector_to_html),
                ],
            )
        }
    }

    /// Script binding one tooltip per matching anchor.
    pub const TIP_SCRIPT: Template<TipScriptVars> =
        Template::new(include_str!("tippy.js"));
}
