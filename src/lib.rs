//! # Creation Compiler
//!
//! Compiles "creations" (named object literals with an optional HTML fragment
//! and CSS block) into self-contained ES5 scripts, then wraps them into one
//! loader function that mounts a creation into a shadow root on demand.
//!
//! ## Pipeline
//!
//! 1. **Evaluate**: the object literal source becomes a [`Value`] tree.
//! 2. **Include**: HTML compiles to a `_buildDoc(target)` member that attaches
//!    a shadow root and rebuilds the fragment statement by statement; CSS
//!    compiles to a `_buildStyle()` member.
//! 3. **Build**: the member map serializes back to `name={...}`.
//! 4. **Wrap**: every creation is controlled, then composed into the loader,
//!    optionally restricted to a hostname allow-list.
//!
//! ## Invariants
//!
//! 1. **Private identifiers**: each document compilation allocates its own
//!    identifiers (`a..z`, `aa..az`, ...); nothing is shared across creations.
//! 2. **Build is a read**: `Creation::build` never mutates the creation.
//! 3. **Style target is fixed at inclusion**: CSS included after HTML goes to
//!    the shadow root, CSS included before it goes to the page head.
//! 4. **Guard first**: the allow-list check runs before any creation lookup.

mod codegen;
mod creation;
mod discovery;
mod document;
mod emit;
mod evaluate;
mod ident;
#[cfg(feature = "napi")]
mod native;
mod parse;
mod serialize;
mod style;
mod validate;
mod value;
mod visitor;
mod wrapper;

#[cfg(test)]
mod document_tests;

pub use codegen::{generate_loader, LoaderEntry};
pub use creation::{Creation, CREATION_TEMPLATE};
pub use discovery::{discover_creations, CreationSources};
pub use document::{compile_document, emit_document_statements, DocumentOptions};
pub use emit::{js_string, strip_line_breaks, Es5Writer, StatementEmitter};
pub use evaluate::{document_references, evaluate_function, evaluate_object};
pub use ident::IdentifierAllocator;
#[cfg(feature = "napi")]
pub use native::{compile_creation_native, wrap_native, CreationInput, WrapOutput};
pub use parse::{Exclusions, HtmlDocument, NodeKind};
pub use serialize::{serialize, serialize_fields};
pub use style::{compile_style, StyleTarget};
pub use validate::*;
pub use value::Value;
pub use visitor::{walk, DomVisitor};
pub use wrapper::{
    Wrapper, WrapperConfig, DEFAULT_LOADER_NAME, DEFAULT_POLYFILL_URL, OUTPUT_EXTENSION,
};
