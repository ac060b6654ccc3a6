//! # Document Builder Compilation
//!
//! Turns a parsed HTML fragment into the body of a creation's `_buildDoc`
//! method. The generated function attaches an open shadow root to the mount
//! target and rebuilds the fragment inside it, one statement at a time:
//!
//! ```text
//! function(target){
//!   var _d = document;
//!   var _sr = _d.querySelector(target).attachShadow({mode:'open'});
//!   var a = _d.createElement("div");
//!   a.setAttribute("class", "classel");
//!   _sr.appendChild(a);
//!   ...
//!   this._doc = function() { return _sr};
//! }
//! ```
//!
//! ## Key Invariants
//!
//! 1. **One node, one variable**: every kept node gets a fresh identifier from
//!    an allocator that lives for this compilation only.
//! 2. **Statement triple**: a kept node emits exactly one create statement, one
//!    `setAttribute` per attribute (in attribute order) and one append.
//! 3. **Transparent wrappers**: excluded nodes emit nothing and their children
//!    attach to the nearest kept ancestor, or to the shadow root.
//! 4. **Lazy accessor**: the builder ends by installing `this._doc`, so methods
//!    calling `this._doc()` reach the shadow root once it exists.

use markup5ever_rcdom::Handle;

use crate::emit::{Es5Writer, StatementEmitter};
use crate::ident::IdentifierAllocator;
use crate::parse::{
    attributes, comment_content, node_kind, tag_name, text_content, Exclusions, HtmlDocument,
    NodeKind,
};
use crate::validate::DOC_ACCESSOR;
use crate::visitor::DomVisitor;

/// Per-compilation settings for the document builder.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Expression the local document alias is initialised from.
    pub document_expr: String,
    /// Name of the local document alias.
    pub document_alias: String,
    /// Name of the shadow root variable.
    pub shadow_root_var: String,
    /// Name of the builder's mount-target parameter.
    pub target_param: String,
    pub exclusions: Exclusions,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            document_expr: "document".to_string(),
            document_alias: "_d".to_string(),
            shadow_root_var: "_sr".to_string(),
            target_param: "target".to_string(),
            exclusions: Exclusions::default(),
        }
    }
}

/// Emits node statements while the traversal walks the document. `vars[0]` is
/// the shadow root; every kept node pushes its own identifier.
struct NodeBuilder<'w, W: StatementEmitter> {
    writer: &'w mut W,
    doc: &'w str,
    alloc: IdentifierAllocator,
    vars: Vec<String>,
}

impl<W: StatementEmitter> DomVisitor for NodeBuilder<'_, W> {
    fn visit_node(&mut self, node: &Handle, parent: usize) -> usize {
        let kind = node_kind(node);
        if !matches!(kind, NodeKind::Element | NodeKind::Text | NodeKind::Comment) {
            // Doctypes and processing instructions have no DOM constructor.
            tracing::debug!(?kind, "skipping node without a builder statement");
            return parent;
        }

        let var_name = self.alloc.next();
        match kind {
            NodeKind::Element => {
                let tag = tag_name(node).unwrap_or_default();
                self.writer.create_element(&var_name, self.doc, &tag);
            }
            NodeKind::Comment => {
                let text = comment_content(node).unwrap_or_default();
                self.writer.create_comment(&var_name, self.doc, &text);
            }
            _ => {
                let text = text_content(node).unwrap_or_default();
                self.writer.create_text_node(&var_name, self.doc, &text);
            }
        }

        for attr in attributes(node) {
            self.writer
                .set_attribute(&var_name, &attr.qualified_key(), &attr.value);
        }

        self.writer.append_child(&self.vars[parent], &var_name);

        self.vars.push(var_name);
        self.vars.len() - 1
    }
}

/// Writes the node statements only, without the surrounding function.
pub fn emit_document_statements<W: StatementEmitter>(
    doc: &HtmlDocument,
    writer: &mut W,
    options: &DocumentOptions,
) -> usize {
    let mut builder = NodeBuilder {
        writer,
        doc: &options.document_alias,
        alloc: IdentifierAllocator::new(),
        vars: vec![options.shadow_root_var.clone()],
    };
    doc.read_and_execute(&mut builder, 0, &options.exclusions);
    builder.alloc.len()
}

/// Compiles a parsed fragment into a `function(target){...}` document builder.
pub fn compile_document(doc: &HtmlDocument, options: &DocumentOptions) -> String {
    let mut writer = Es5Writer::new();
    writer.open_function(&[options.target_param.as_str()]);
    writer.assign_var(&options.document_alias, &options.document_expr);
    writer.assign_var(
        &options.shadow_root_var,
        &format!(
            "{}.querySelector({}).attachShadow({{mode:'open'}})",
            options.document_alias, options.target_param
        ),
    );

    let nodes = emit_document_statements(doc, &mut writer, options);
    tracing::debug!(nodes, "compiled document builder");

    writer.assign_attr(
        "this",
        DOC_ACCESSOR,
        &format!("function() {{ return {}}}", options.shadow_root_var),
    );
    writer.close_block();
    writer.finish()
}
