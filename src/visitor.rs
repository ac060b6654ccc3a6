use markup5ever_rcdom::Handle;

use crate::parse::{Exclusions, HtmlDocument};

/// The DomVisitor trait is the single traversal mechanism over parsed creation
/// documents.
///
/// Rules:
/// 1. Traversal is depth-first, pre-order, children in document order.
/// 2. `visit_node` is only called for nodes the exclusions do not skip.
/// 3. The value it returns becomes the parent index of the node's children.
/// 4. A skipped node passes its own parent index down unchanged, so its
///    children attach to the nearest visited ancestor.
pub trait DomVisitor {
    fn visit_node(&mut self, node: &Handle, parent: usize) -> usize;
}

pub fn walk<V: DomVisitor + ?Sized>(
    visitor: &mut V,
    node: &Handle,
    parent: usize,
    exclusions: &Exclusions,
) {
    let current = if exclusions.skips(node) {
        parent
    } else {
        visitor.visit_node(node, parent)
    };

    for child in node.children.borrow().iter() {
        walk(visitor, child, current, exclusions);
    }
}

impl HtmlDocument {
    /// Walks the whole document, starting with `root_parent` as the parent
    /// index of top-level nodes.
    pub fn read_and_execute<V: DomVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        root_parent: usize,
        exclusions: &Exclusions,
    ) {
        walk(visitor, self.root(), root_parent, exclusions);
    }
}
