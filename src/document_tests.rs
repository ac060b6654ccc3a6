use crate::document::{compile_document, emit_document_statements, DocumentOptions};
use crate::emit::StatementEmitter;
use crate::parse::{Exclusions, HtmlDocument, NodeKind};

/// Records statements by kind instead of writing source.
#[derive(Default)]
struct CountingEmitter {
    creates: Vec<String>,
    attributes: Vec<(String, String, String)>,
    appends: Vec<(String, String)>,
}

impl StatementEmitter for CountingEmitter {
    fn assign_var(&mut self, _name: &str, _expr: &str) {}

    fn assign_attr(&mut self, _target: &str, _attr: &str, _expr: &str) {}

    fn create_element(&mut self, var_name: &str, _doc: &str, tag: &str) {
        self.creates.push(format!("{}:{}", var_name, tag));
    }

    fn create_text_node(&mut self, var_name: &str, _doc: &str, text: &str) {
        self.creates.push(format!("{}:#{}", var_name, text));
    }

    fn create_comment(&mut self, var_name: &str, _doc: &str, text: &str) {
        self.creates.push(format!("{}:!{}", var_name, text));
    }

    fn set_attribute(&mut self, var_name: &str, key: &str, value: &str) {
        self.attributes
            .push((var_name.to_string(), key.to_string(), value.to_string()));
    }

    fn append_child(&mut self, parent: &str, child: &str) {
        self.appends.push((parent.to_string(), child.to_string()));
    }

    fn open_function(&mut self, _params: &[&str]) {}

    fn close_block(&mut self) {}

    fn finish(self) -> String {
        String::new()
    }
}

fn count(html: &str) -> CountingEmitter {
    let doc = HtmlDocument::parse(html).unwrap();
    let mut emitter = CountingEmitter::default();
    emit_document_statements(&doc, &mut emitter, &DocumentOptions::default());
    emitter
}

const SCENARIO: &str = r#"<div class="classel"><p id="paragraph">this is a text</p><div data="a data"></div></div><span class="first-class second-class" id="spanid"></span>"#;

#[test]
fn test_scenario_statement_counts_and_wiring() {
    let e = count(SCENARIO);
    assert_eq!(
        e.creates,
        vec!["a:div", "b:p", "c:#this is a text", "d:div", "e:span"]
    );
    assert_eq!(e.appends.len(), 5);
    assert_eq!(e.attributes.len(), 4);

    let parents: Vec<(&str, &str)> = e
        .appends
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    assert_eq!(
        parents,
        vec![("_sr", "a"), ("a", "b"), ("b", "c"), ("a", "d"), ("_sr", "e")]
    );
}

#[test]
fn test_scenario_compiled_source() {
    let doc = HtmlDocument::parse(SCENARIO).unwrap();
    let out = compile_document(&doc, &DocumentOptions::default());
    assert_eq!(
        out,
        concat!(
            "function(target){var _d = document;",
            "var _sr = _d.querySelector(target).attachShadow({mode:'open'});",
            r#"var a = _d.createElement("div");a.setAttribute("class", "classel");_sr.appendChild(a);"#,
            r#"var b = _d.createElement("p");b.setAttribute("id", "paragraph");a.appendChild(b);"#,
            r#"var c = _d.createTextNode("this is a text");b.appendChild(c);"#,
            r#"var d = _d.createElement("div");d.setAttribute("data", "a data");a.appendChild(d);"#,
            r#"var e = _d.createElement("span");e.setAttribute("class", "first-class second-class");e.setAttribute("id", "spanid");_sr.appendChild(e);"#,
            "this._doc = function() { return _sr};}"
        )
    );
}

#[test]
fn test_kept_nodes_match_statements() {
    let html = "<ul><li a=\"1\" b=\"2\">one</li><li>two</li></ul><br><img src=\"x.png\" alt=\"\">";
    let e = count(html);
    // ul, li, #one, li, #two, br, img
    assert_eq!(e.creates.len(), 7);
    assert_eq!(e.appends.len(), 7);
    assert_eq!(e.attributes.len(), 4);
}

#[test]
fn test_whitespace_text_is_dropped() {
    let e = count("<div>\n   <p>x</p>\n\t</div>");
    assert_eq!(e.creates, vec!["a:div", "b:p", "c:#x"]);
}

#[test]
fn test_nbsp_is_kept() {
    let e = count("<p>&nbsp;</p>");
    assert_eq!(e.creates, vec!["a:p".to_string(), "b:#\u{a0}".to_string()]);
}

#[test]
fn test_comments_and_doctype_are_skipped() {
    let e = count("<!DOCTYPE html><!-- note --><div></div>");
    assert_eq!(e.creates, vec!["a:div"]);
}

#[test]
fn test_extra_exclusion_lifts_children() {
    let doc = HtmlDocument::parse("<section><b>x</b></section>").unwrap();
    let options = DocumentOptions {
        exclusions: Exclusions::default().with_tag("section"),
        ..DocumentOptions::default()
    };
    let mut e = CountingEmitter::default();
    emit_document_statements(&doc, &mut e, &options);
    assert_eq!(e.creates, vec!["a:b", "b:#x"]);
    assert_eq!(e.appends[0], ("_sr".to_string(), "a".to_string()));
}

#[test]
fn test_identifiers_restart_per_compilation() {
    let first = count("<i></i>");
    let second = count("<b></b>");
    assert_eq!(first.creates, vec!["a:i"]);
    assert_eq!(second.creates, vec!["a:b"]);
}

#[test]
fn test_many_nodes_get_distinct_identifiers() {
    let html = "<i></i>".repeat(60);
    let e = count(&html);
    assert_eq!(e.creates.len(), 60);
    assert_eq!(e.creates[26], "aa:i");
    let mut vars: Vec<&str> = e.creates.iter().map(|c| c.split(':').next().unwrap()).collect();
    vars.sort();
    vars.dedup();
    assert_eq!(vars.len(), 60);
}

#[test]
fn test_encoded_line_breaks_stay_escaped() {
    let doc = HtmlDocument::parse(r#"<div title="a&#10;b">x&#13;y</div>"#).unwrap();
    let out = compile_document(&doc, &DocumentOptions::default());
    assert!(out.contains(r#"a.setAttribute("title", "a\nb");"#));
    assert!(out.contains(r#"_d.createTextNode("x\ry")"#));
    assert!(!out.contains('\n') && !out.contains('\r'));
}

#[test]
fn test_namespaced_attribute_keeps_prefix() {
    let doc = HtmlDocument::parse(r##"<svg><use xlink:href="#i"></use></svg>"##).unwrap();
    let out = compile_document(&doc, &DocumentOptions::default());
    assert!(out.contains(
        r##"var b = _d.createElement("use");b.setAttribute("xlink:href", "#i");a.appendChild(b);"##
    ));
}

#[test]
fn test_comments_let_through_become_comment_nodes() {
    let doc = HtmlDocument::parse("<!DOCTYPE html><div><!-- note --></div>").unwrap();
    let options = DocumentOptions {
        exclusions: Exclusions {
            kinds: vec![NodeKind::Document],
            tags: vec!["html".to_string(), "head".to_string(), "body".to_string()],
        },
        ..DocumentOptions::default()
    };
    let mut e = CountingEmitter::default();
    emit_document_statements(&doc, &mut e, &options);
    // The doctype has no builder statement and is dropped.
    assert_eq!(e.creates, vec!["a:div", "b:! note "]);
    assert_eq!(e.appends[1], ("a".to_string(), "b".to_string()));
}
