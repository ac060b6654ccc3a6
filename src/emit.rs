//! Statement emission for generated builders.
//!
//! Document and style builders are written through [`StatementEmitter`], so
//! the compilers only decide *what* to emit. [`Es5Writer`] is the canonical
//! emitter: plain ES5 statements, one after another, no line breaks.

/// Removes every `\n`, `\t` and `\r`.
pub fn strip_line_breaks(src: &str) -> String {
    src.chars()
        .filter(|c| !matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Double-quoted JavaScript string literal. Line terminators and other
/// control characters are escaped so the literal stays on one line.
pub fn js_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() && (c as u32) < 0x80 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

pub trait StatementEmitter {
    /// `var name = expr;`
    fn assign_var(&mut self, name: &str, expr: &str);

    /// `target.attr = expr;`
    fn assign_attr(&mut self, target: &str, attr: &str, expr: &str);

    /// `var var_name = doc.createElement("tag");`
    fn create_element(&mut self, var_name: &str, doc: &str, tag: &str);

    /// `var var_name = doc.createTextNode("text");`
    fn create_text_node(&mut self, var_name: &str, doc: &str, text: &str);

    /// `var var_name = doc.createComment("text");`
    fn create_comment(&mut self, var_name: &str, doc: &str, text: &str);

    /// `var_name.setAttribute("key", "value");`
    fn set_attribute(&mut self, var_name: &str, key: &str, value: &str);

    /// `parent.appendChild(child);`
    fn append_child(&mut self, parent: &str, child: &str);

    /// `function(params){`
    fn open_function(&mut self, params: &[&str]);

    /// `}`
    fn close_block(&mut self);

    fn finish(self) -> String;
}

#[derive(Debug, Default)]
pub struct Es5Writer {
    buf: String,
}

impl Es5Writer {
    pub fn new() -> Self {
        Self::default()
    }

    fn end_expr(&mut self) {
        self.buf.push(';');
    }
}

impl StatementEmitter for Es5Writer {
    fn assign_var(&mut self, name: &str, expr: &str) {
        self.buf.push_str("var ");
        self.buf.push_str(name);
        self.buf.push_str(" = ");
        self.buf.push_str(expr);
        self.end_expr();
    }

    fn assign_attr(&mut self, target: &str, attr: &str, expr: &str) {
        self.buf.push_str(target);
        self.buf.push('.');
        self.buf.push_str(attr);
        self.buf.push_str(" = ");
        self.buf.push_str(expr);
        self.end_expr();
    }

    fn create_element(&mut self, var_name: &str, doc: &str, tag: &str) {
        let expr = format!("{}.createElement({})", doc, js_string(tag));
        self.assign_var(var_name, &expr);
    }

    fn create_text_node(&mut self, var_name: &str, doc: &str, text: &str) {
        let expr = format!("{}.createTextNode({})", doc, js_string(text));
        self.assign_var(var_name, &expr);
    }

    fn create_comment(&mut self, var_name: &str, doc: &str, text: &str) {
        let expr = format!("{}.createComment({})", doc, js_string(text));
        self.assign_var(var_name, &expr);
    }

    fn set_attribute(&mut self, var_name: &str, key: &str, value: &str) {
        self.buf.push_str(var_name);
        self.buf.push_str(".setAttribute(");
        self.buf.push_str(&js_string(key));
        self.buf.push_str(", ");
        self.buf.push_str(&js_string(value));
        self.buf.push(')');
        self.end_expr();
    }

    fn append_child(&mut self, parent: &str, child: &str) {
        self.buf.push_str(parent);
        self.buf.push_str(".appendChild(");
        self.buf.push_str(child);
        self.buf.push(')');
        self.end_expr();
    }

    fn open_function(&mut self, params: &[&str]) {
        self.buf.push_str("function(");
        self.buf.push_str(&params.join(","));
        self.buf.push_str("){");
    }

    fn close_block(&mut self) {
        self.buf.push('}');
    }

    fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_breaks() {
        assert_eq!(strip_line_breaks("a\n\tb\r\nc"), "abc");
        assert_eq!(strip_line_breaks("a b"), "a b");
    }

    #[test]
    fn test_js_string() {
        assert_eq!(js_string("plain"), "\"plain\"");
        assert_eq!(js_string(r#"a "b" \c"#), r#""a \"b\" \\c""#);
    }

    #[test]
    fn test_js_string_line_terminators() {
        assert_eq!(js_string("a\nb\rc\td"), r#""a\nb\rc\td""#);
        assert_eq!(js_string("x\u{2028}y\u{2029}z"), r#""x\u2028y\u2029z""#);
        assert_eq!(js_string("bell\u{7}"), r#""bell\u0007""#);
        assert_eq!(js_string("caf\u{e9} \u{a0}"), "\"caf\u{e9} \u{a0}\"");
    }

    #[test]
    fn test_writer_statements() {
        let mut w = Es5Writer::new();
        w.open_function(&["target"]);
        w.assign_var("_d", "document");
        w.create_element("a", "_d", "div");
        w.set_attribute("a", "class", "classel");
        w.append_child("_sr", "a");
        w.create_text_node("b", "_d", "hi");
        w.create_comment("c", "_d", "note");
        w.assign_attr("this", "x", "1");
        w.close_block();
        assert_eq!(
            w.finish(),
            r#"function(target){var _d = document;var a = _d.createElement("div");a.setAttribute("class", "classel");_sr.appendChild(a);var b = _d.createTextNode("hi");var c = _d.createComment("note");this.x = 1;}"#
        );
    }
}
