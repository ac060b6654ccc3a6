//! # Creation Assembly
//!
//! A [`Creation`] is one named object literal: attributes, methods, and the
//! optional `_buildDoc` / `_buildStyle` builders compiled from HTML and CSS.
//! The member map is the single source of truth; [`Creation::build`] reads it
//! afresh on every call, so building twice yields the same text.

use crate::document::{compile_document, DocumentOptions};
use crate::evaluate::{document_references, evaluate_function, evaluate_object};
use crate::parse::HtmlDocument;
use crate::serialize::serialize_fields;
use crate::style::{compile_style, StyleTarget};
use crate::validate::{
    check_binding_name, check_field_name, is_accepted_field_name, is_reserved_member, CompilerError, BUILD_DOC,
    BUILD_STYLE, DOC_ACCESSOR, ERR_BUILDER_NOT_FUNCTION, ERR_DOC_ACCESSOR_NOT_FUNCTION,
    ERR_INIT_NOT_FUNCTION, ERR_INVALID_NAME, ERR_NOT_AN_OBJECT, ERR_NO_DOC_INIT,
    ERR_RESERVED_NAME, INIT_HOOK,
};
use crate::value::Value;

/// Authoring template for a new creation.
pub const CREATION_TEMPLATE: &str = r#"creation = {
  // Use this accessor instead of document. Ex: this._doc().querySelector(...)
  // Use 'document' to reach the host page's document
  _doc: function() {return document},
  _init: function() {
    // Runs once the document and style are built
  },
  attribute: "a value (optional)",
  method: function(a, b) {
    // a method (optional)
  }
}"#;

#[derive(Debug, Clone)]
pub struct Creation {
    name: String,
    members: Vec<(String, Value)>,
    /// Default `_init` parameters, overridable per `init` call.
    params: Vec<(String, Value)>,
    has_document: bool,
    has_style: bool,
}

impl Creation {
    /// An empty creation.
    pub fn new(name: &str) -> Result<Self, CompilerError> {
        check_binding_name(name, "creation")?;
        Ok(Self {
            name: name.to_string(),
            members: Vec::new(),
            params: Vec::new(),
            has_document: false,
            has_style: false,
        })
    }

    /// A creation initialised from object literal source.
    pub fn from_source(name: &str, src: &str) -> Result<Self, CompilerError> {
        let mut creation = Self::new(name)?;
        match evaluate_object(src)? {
            Value::Object(fields) => creation.members = fields,
            _ => {
                return Err(CompilerError::new(
                    ERR_NOT_AN_OBJECT,
                    "No object literal found in the creation source",
                ))
            }
        }
        creation.has_document = creation.member(BUILD_DOC).is_some_and(Value::is_function);
        creation.has_style = creation.member(BUILD_STYLE).is_some_and(Value::is_function);
        Ok(creation)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_document(&self) -> bool {
        self.has_document
    }

    pub fn has_style(&self) -> bool {
        self.has_style
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        self.members.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members
            .iter()
            .filter(|(_, v)| !v.is_function())
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, &str)> {
        self.members.iter().filter_map(|(k, v)| match v {
            Value::Function(src) => Some((k.as_str(), src.as_str())),
            _ => None,
        })
    }

    pub fn add_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CompilerError> {
        check_field_name(name, "attribute")?;
        check_not_reserved(name)?;
        self.set_member(name, value.into());
        Ok(())
    }

    /// Declares an init parameter and its default value. Only declared
    /// parameters can be overridden by the caller of `init`.
    pub fn add_param(&mut self, name: &str, default: impl Into<Value>) -> Result<(), CompilerError> {
        check_field_name(name, "parameter")?;
        let value = default.into();
        match self.params.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name.to_string(), value)),
        }
        Ok(())
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The parameter defaults as an object literal, `{field:value,...}`.
    pub fn params_source(&self) -> String {
        format!("{{{}}}", serialize_fields(&self.params))
    }

    pub fn add_method(&mut self, name: &str, src: &str) -> Result<(), CompilerError> {
        check_field_name(name, "method")?;
        check_not_reserved(name)?;
        let func = evaluate_function(src)?;
        if self.has_document {
            self.warn_global_document(name, &func);
        }
        self.set_member(name, Value::Function(func));
        Ok(())
    }

    /// Compiles `html` into the `_buildDoc` member.
    pub fn include_html(&mut self, html: &str) -> Result<(), CompilerError> {
        self.include_html_with(html, &DocumentOptions::default())
    }

    pub fn include_html_with(
        &mut self,
        html: &str,
        options: &DocumentOptions,
    ) -> Result<(), CompilerError> {
        self.check_doc_init()?;
        let doc = HtmlDocument::parse(html)?;
        let builder = compile_document(&doc, options);
        self.set_member(BUILD_DOC, Value::Function(builder));
        self.has_document = true;

        let user_methods: Vec<(String, String)> = self
            .methods()
            .filter(|(k, _)| !is_reserved_member(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (name, src) in user_methods {
            self.warn_global_document(&name, &src);
        }

        tracing::debug!(creation = %self.name, "included html");
        Ok(())
    }

    /// Compiles `css` into the `_buildStyle` member. The style targets the
    /// private root only if a document builder already exists.
    pub fn include_css(&mut self, css: &str) -> Result<(), CompilerError> {
        self.check_doc_init()?;
        let target = if self.has_document {
            StyleTarget::PrivateRoot
        } else {
            StyleTarget::GlobalHead
        };
        self.set_member(BUILD_STYLE, Value::Function(compile_style(css, target)));
        self.has_style = true;
        tracing::debug!(creation = %self.name, ?target, "included css");
        Ok(())
    }

    /// Includes HTML then CSS, so the style lands in the shadow root. Empty
    /// inputs are skipped.
    pub fn include_html_css(&mut self, html: &str, css: &str) -> Result<(), CompilerError> {
        if !html.is_empty() {
            self.include_html(html)?;
        }
        if !css.is_empty() {
            self.include_css(css)?;
        }
        Ok(())
    }

    /// Reports every structural defect at once.
    pub fn control(&self) -> Vec<CompilerError> {
        let mut errs = Vec::new();

        for (name, value) in &self.members {
            if !is_accepted_field_name(name) {
                errs.push(CompilerError::new(
                    ERR_INVALID_NAME,
                    &format!("{}: member '{}' should be an alphanumerical word", self.name, name),
                ));
            }
            if value.is_function() {
                continue;
            }
            let code = match name.as_str() {
                INIT_HOOK => ERR_INIT_NOT_FUNCTION,
                DOC_ACCESSOR => ERR_DOC_ACCESSOR_NOT_FUNCTION,
                BUILD_DOC | BUILD_STYLE => ERR_BUILDER_NOT_FUNCTION,
                _ => continue,
            };
            errs.push(CompilerError::new(
                code,
                &format!("{}: member '{}' must be a function", self.name, name),
            ));
        }

        errs
    }

    /// The object literal, `{field:value,...}`.
    pub fn source(&self) -> String {
        format!("{{{}}}", serialize_fields(&self.members))
    }

    /// The named object literal, `name={field:value,...}`.
    pub fn build(&self) -> String {
        format!("{}={}", self.name, self.source())
    }

    fn set_member(&mut self, name: &str, value: Value) {
        match self.members.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.members.push((name.to_string(), value)),
        }
    }

    fn check_doc_init(&self) -> Result<(), CompilerError> {
        match self.member(DOC_ACCESSOR) {
            Some(v) if !v.is_function() => Err(CompilerError::with_details(
                ERR_NO_DOC_INIT,
                &format!(
                    "{}: no document initialization found, '{}' is not a function",
                    self.name, DOC_ACCESSOR
                ),
                Some("include"),
                vec![format!("Define `{}: function() {{return document}}` or remove it", DOC_ACCESSOR)],
            )),
            _ => Ok(()),
        }
    }

    fn warn_global_document(&self, method: &str, src: &str) {
        let refs = document_references(src);
        if refs > 0 {
            tracing::warn!(
                creation = %self.name,
                method,
                refs,
                "method reads the global document; use this._doc() to reach the shadow root"
            );
        }
    }
}

fn check_not_reserved(name: &str) -> Result<(), CompilerError> {
    if is_reserved_member(name) {
        return Err(CompilerError::new(
            ERR_RESERVED_NAME,
            &format!("'{}' is reserved for compiled builders", name),
        ));
    }
    Ok(())
}
