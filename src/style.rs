//! Style builder compilation.

use crate::emit::{js_string, strip_line_breaks, Es5Writer, StatementEmitter};
use crate::validate::DOC_ACCESSOR;

/// Where a compiled style element is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTarget {
    /// The creation already has a document builder: append to its shadow root.
    PrivateRoot,
    /// No private root yet: append to the global document head.
    GlobalHead,
}

/// Compiles CSS into a `function(){...}` style builder.
///
/// The target is decided by the caller when the CSS is included and is baked
/// into the output; a document added later does not change it.
pub fn compile_style(css: &str, target: StyleTarget) -> String {
    let style_var = "a";
    let css_literal = js_string(&strip_line_breaks(css));

    let mut writer = Es5Writer::new();
    writer.open_function(&[]);
    match target {
        StyleTarget::PrivateRoot => {
            writer.create_element(style_var, "document", "style");
            writer.assign_attr(style_var, "innerHTML", &css_literal);
            writer.append_child(&format!("this.{}()", DOC_ACCESSOR), style_var);
        }
        StyleTarget::GlobalHead => {
            writer.assign_var("_d", "document");
            writer.create_element(style_var, "_d", "style");
            writer.assign_attr(style_var, "innerHTML", &css_literal);
            writer.append_child("_d.head", style_var);
        }
    }
    writer.close_block();
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS: &str = "\n  p {\n    color: red;\n  }\n  #id {\n    font-size: 2em;\n  }\n  ";

    #[test]
    fn test_private_root_target() {
        assert_eq!(
            compile_style(CSS, StyleTarget::PrivateRoot),
            r#"function(){var a = document.createElement("style");a.innerHTML = "  p {    color: red;  }  #id {    font-size: 2em;  }  ";this._doc().appendChild(a);}"#
        );
    }

    #[test]
    fn test_global_head_target() {
        assert_eq!(
            compile_style("p{color:red}", StyleTarget::GlobalHead),
            r#"function(){var _d = document;var a = _d.createElement("style");a.innerHTML = "p{color:red}";_d.head.appendChild(a);}"#
        );
    }

    #[test]
    fn test_css_quotes_are_escaped() {
        let out = compile_style(r#"q::before{content:"\201C"}"#, StyleTarget::GlobalHead);
        assert!(out.contains(r#"a.innerHTML = "q::before{content:\"\\201C\"}";"#));
    }
}
