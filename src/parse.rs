//! HTML parsing for creation documents.
//!
//! html5ever does the parsing; this module only wraps the resulting rcdom tree
//! and answers the questions the document compiler asks about a node: its
//! kind, tag, text and attributes, and whether the traversal should skip it.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use lazy_static::lazy_static;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;

use crate::emit::strip_line_breaks;
use crate::validate::{CompilerError, ERR_PARSE};

lazy_static! {
    /// ASCII whitespace only: U+00A0 (`&nbsp;`) must survive as real text.
    static ref BLANK_TEXT_RE: Regex = Regex::new(r"^[\t\n\x0C\r ]+$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE ACCESS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype,
    Text,
    Comment,
    Element,
    ProcessingInstruction,
}

pub fn node_kind(handle: &Handle) -> NodeKind {
    match &handle.data {
        NodeData::Document => NodeKind::Document,
        NodeData::Doctype { .. } => NodeKind::Doctype,
        NodeData::Text { .. } => NodeKind::Text,
        NodeData::Comment { .. } => NodeKind::Comment,
        NodeData::Element { .. } => NodeKind::Element,
        NodeData::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
    }
}

pub fn tag_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

pub fn text_content(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

pub fn comment_content(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Comment { contents } => Some(contents.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomAttribute {
    pub key: String,
    pub value: String,
    pub namespace: Option<String>,
}

impl DomAttribute {
    /// `namespace:key` when the attribute carries a namespace prefix.
    pub fn qualified_key(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns, self.key),
            None => self.key.clone(),
        }
    }
}

pub fn attributes(handle: &Handle) -> Vec<DomAttribute> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| DomAttribute {
                key: attr.name.local.to_string(),
                value: attr.value.to_string(),
                namespace: attr
                    .name
                    .prefix
                    .as_ref()
                    .map(|p| p.to_string())
                    .filter(|p| !p.is_empty()),
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn is_blank_text(text: &str) -> bool {
    BLANK_TEXT_RE.is_match(text)
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXCLUSIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Nodes the traversal steps over while still descending into their children.
/// Owned by the caller and passed to each compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusions {
    pub kinds: Vec<NodeKind>,
    pub tags: Vec<String>,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self {
            kinds: vec![
                NodeKind::Document,
                NodeKind::Doctype,
                NodeKind::Comment,
                NodeKind::ProcessingInstruction,
            ],
            tags: vec!["html".to_string(), "head".to_string(), "body".to_string()],
        }
    }
}

impl Exclusions {
    /// Excludes nothing but the document node itself.
    pub fn document_only() -> Self {
        Self {
            kinds: vec![NodeKind::Document],
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_ascii_lowercase());
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn is_excluded(&self, handle: &Handle) -> bool {
        if self.kinds.contains(&node_kind(handle)) {
            return true;
        }
        match tag_name(handle) {
            Some(tag) => self.tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)),
            None => false,
        }
    }

    /// Excluded nodes and whitespace-only text are both skipped.
    pub fn skips(&self, handle: &Handle) -> bool {
        if self.is_excluded(handle) {
            return true;
        }
        text_content(handle).is_some_and(|t| is_blank_text(&t))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════════

pub struct HtmlDocument {
    dom: RcDom,
}

impl HtmlDocument {
    /// Parses an HTML fragment. Line breaks and tabs are removed first so
    /// source indentation never turns into text nodes.
    pub fn parse(html: &str) -> Result<Self, CompilerError> {
        let sanitized = strip_line_breaks(html);
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut sanitized.as_bytes())
            .map_err(|e| CompilerError::upstream(ERR_PARSE, "html", e))?;

        tracing::debug!(bytes = sanitized.len(), "parsed creation html");
        Ok(Self { dom })
    }

    pub fn root(&self) -> &Handle {
        &self.dom.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_first(handle: &Handle, tag: &str) -> Option<Handle> {
        if tag_name(handle).as_deref() == Some(tag) {
            return Some(handle.clone());
        }
        for child in handle.children.borrow().iter() {
            if let Some(found) = find_first(child, tag) {
                return Some(found);
            }
        }
        None
    }

    #[test]
    fn test_blank_text() {
        assert!(is_blank_text(" "));
        assert!(is_blank_text(" \t\n"));
        assert!(!is_blank_text(""));
        assert!(!is_blank_text("\u{a0}"));
        assert!(!is_blank_text(" a "));
    }

    #[test]
    fn test_default_exclusions() {
        let doc = HtmlDocument::parse("<div id='x'>hi</div>").unwrap();
        let ex = Exclusions::default();
        assert!(ex.is_excluded(doc.root()));
        let body = find_first(doc.root(), "body").unwrap();
        assert!(ex.is_excluded(&body));
        let div = find_first(doc.root(), "div").unwrap();
        assert!(!ex.is_excluded(&div));
        assert!(!Exclusions::document_only().is_excluded(&body));
    }

    #[test]
    fn test_attributes_in_order() {
        let doc = HtmlDocument::parse(r#"<span class="a b" id="s" data-x="1"></span>"#).unwrap();
        let span = find_first(doc.root(), "span").unwrap();
        let keys: Vec<String> = attributes(&span).iter().map(|a| a.qualified_key()).collect();
        assert_eq!(keys, vec!["class", "id", "data-x"]);
    }

    #[test]
    fn test_namespaced_attribute() {
        let doc =
            HtmlDocument::parse(r##"<svg><use xlink:href="#icon"></use></svg>"##).unwrap();
        let node = find_first(doc.root(), "use").unwrap();
        let attrs = attributes(&node);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].qualified_key(), "xlink:href");
        assert_eq!(attrs[0].value, "#icon");
    }

    #[test]
    fn test_line_breaks_removed_before_parsing() {
        let doc = HtmlDocument::parse("<p>\n\thello\n</p>").unwrap();
        let p = find_first(doc.root(), "p").unwrap();
        let children = p.children.borrow();
        assert_eq!(children.len(), 1);
        assert_eq!(text_content(&children[0]).as_deref(), Some("hello"));
    }
}
