//! Wrapper sessions: inject creations, secure them, wrap them into a loader.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::codegen::{generate_loader, LoaderEntry};
use crate::creation::Creation;
use crate::discovery::{discover_creations, read_source};
use crate::validate::{
    check_binding_name, normalize_domains, CompilerError, ERR_DUPLICATE_NAME, ERR_PARSE,
    ERR_UNKNOWN_CREATION,
};

/// Extension of generated loader files. Discovery skips files ending with it.
pub const OUTPUT_EXTENSION: &str = ".min.js";

pub const DEFAULT_LOADER_NAME: &str = "Wb";

pub const DEFAULT_POLYFILL_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/webcomponentsjs/1.0.0-rc.11/webcomponents-lite.js";

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrapperConfig {
    /// Hostnames the loader runs on. Empty means unrestricted.
    pub allowed_domains: Vec<String>,
    pub loader_name: String,
    /// Shadow DOM polyfill, loaded only by browsers without `attachShadow`.
    pub polyfill_url: String,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            allowed_domains: Vec::new(),
            loader_name: DEFAULT_LOADER_NAME.to_string(),
            polyfill_url: DEFAULT_POLYFILL_URL.to_string(),
        }
    }
}

impl WrapperConfig {
    pub fn from_json(json: &str) -> Result<Self, CompilerError> {
        let config: WrapperConfig = serde_json::from_str(json)
            .map_err(|e| CompilerError::upstream(ERR_PARSE, "config", e))?;
        config.validated()
    }

    /// Checks the loader name and normalizes the allow-list.
    pub fn validated(mut self) -> Result<Self, CompilerError> {
        check_binding_name(&self.loader_name, "loader")?;
        self.allowed_domains = normalize_domains(&self.allowed_domains)?;
        Ok(self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WRAPPER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct Wrapper {
    config: WrapperConfig,
    creations: Vec<Creation>,
}

impl Wrapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WrapperConfig) -> Result<Self, CompilerError> {
        Ok(Self {
            config: config.validated()?,
            creations: Vec::new(),
        })
    }

    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.creations.iter().map(Creation::name)
    }

    /// Adds a fully built creation. Nothing is registered on failure.
    pub fn register(&mut self, creation: Creation) -> Result<&mut Creation, CompilerError> {
        if self.creations.iter().any(|c| c.name() == creation.name()) {
            return Err(CompilerError::new(
                ERR_DUPLICATE_NAME,
                &format!("The creation '{}' already exists", creation.name()),
            ));
        }

        tracing::debug!(creation = creation.name(), "registered creation");
        self.creations.push(creation);
        let last = self.creations.len() - 1;
        Ok(&mut self.creations[last])
    }

    /// Registers a creation from object literal source.
    pub fn inject(&mut self, src: &str, name: &str) -> Result<&mut Creation, CompilerError> {
        let creation = Creation::from_source(name, src)?;
        self.register(creation)
    }

    pub fn inject_file(&mut self, path: &Path, name: &str) -> Result<&mut Creation, CompilerError> {
        let src = read_source(path)?;
        self.inject(&src, name)
    }

    /// Injects every creation found under `dir`, including sibling HTML and
    /// CSS. Returns the injected names in discovery order. A creation whose
    /// HTML or CSS fails to compile is not registered.
    pub fn inject_dir(&mut self, dir: &Path) -> Result<Vec<String>, CompilerError> {
        let mut names = Vec::new();
        for sources in discover_creations(dir)? {
            let mut creation = Creation::from_source(&sources.name, &sources.script)?;
            creation.include_html_css(
                sources.html.as_deref().unwrap_or_default(),
                sources.css.as_deref().unwrap_or_default(),
            )?;
            self.register(creation)?;
            names.push(sources.name);
        }
        Ok(names)
    }

    pub fn get(&self, name: &str) -> Result<&Creation, CompilerError> {
        self.creations
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| unknown_creation(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Creation, CompilerError> {
        self.creations
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| unknown_creation(name))
    }

    /// Restricts the loader to `domains`.
    pub fn secure<I, S>(&mut self, domains: I) -> Result<(), CompilerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.allowed_domains = normalize_domains(domains)?;
        Ok(())
    }

    /// `name={...}` for one creation.
    pub fn build_script(&self, name: &str) -> Result<String, CompilerError> {
        Ok(self.get(name)?.build())
    }

    /// Controls every creation, then composes the loader.
    pub fn wrap(&self) -> Result<String, Vec<CompilerError>> {
        let errors: Vec<CompilerError> = self.creations.iter().flat_map(Creation::control).collect();
        if !errors.is_empty() {
            tracing::warn!(defects = errors.len(), "creations failed control");
            return Err(errors);
        }

        let entries: Vec<LoaderEntry> = self
            .creations
            .par_iter()
            .map(|c| LoaderEntry {
                name: c.name().to_string(),
                source: c.source(),
                params: c.params_source(),
            })
            .collect();

        Ok(generate_loader(&self.config, &entries))
    }

    pub fn secure_and_wrap<I, S>(&mut self, domains: I) -> Result<String, Vec<CompilerError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.secure(domains).map_err(|e| vec![e])?;
        self.wrap()
    }
}

fn unknown_creation(name: &str) -> CompilerError {
    CompilerError::new(
        ERR_UNKNOWN_CREATION,
        &format!("The creation '{}' does not exist", name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{ERR_INVALID_DOMAIN, ERR_INVALID_NAME};

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut wb = Wrapper::new();
        wb.inject("", "first").unwrap();
        let err = wb.inject("{}", "first").unwrap_err();
        assert_eq!(err.code, ERR_DUPLICATE_NAME);
        assert_eq!(wb.names().count(), 1);
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut wb = Wrapper::new();
        wb.register(Creation::new("card").unwrap()).unwrap();
        let err = wb.register(Creation::new("card").unwrap()).unwrap_err();
        assert_eq!(err.code, ERR_DUPLICATE_NAME);
        assert_eq!(wb.names().collect::<Vec<_>>(), vec!["card"]);
    }

    #[test]
    fn test_wrap_emits_param_defaults() {
        let mut wb = Wrapper::new();
        wb.inject("", "card").unwrap().add_param("title", "Hi").unwrap();
        let out = wb.wrap().unwrap();
        assert!(out.contains(r#"var ps={"card":{title:"Hi"}};"#));
    }

    #[test]
    fn test_get_unknown() {
        let wb = Wrapper::new();
        assert_eq!(wb.get("nope").unwrap_err().code, ERR_UNKNOWN_CREATION);
        assert_eq!(wb.build_script("nope").unwrap_err().code, ERR_UNKNOWN_CREATION);
    }

    #[test]
    fn test_build_script_and_mutation() {
        let mut wb = Wrapper::new();
        wb.inject("obj = { a: 'x' }", "obj").unwrap();
        wb.get_mut("obj").unwrap().add_attribute("b", 2).unwrap();
        assert_eq!(wb.build_script("obj").unwrap(), r#"obj={a:"x",b:2}"#);
    }

    #[test]
    fn test_secure_validates_domains() {
        let mut wb = Wrapper::new();
        assert_eq!(wb.secure(["not a host"]).unwrap_err().code, ERR_INVALID_DOMAIN);
        wb.secure(["toto.com", "toto.com"]).unwrap();
        assert_eq!(wb.config().allowed_domains, vec!["toto.com"]);
    }

    #[test]
    fn test_wrap_keeps_registration_order() {
        let mut wb = Wrapper::new();
        for name in ["zeta", "alpha", "mid"] {
            wb.inject("", name).unwrap();
        }
        let out = wb.wrap().unwrap();
        assert!(out.contains(r#"var cs={"zeta":{},"alpha":{},"mid":{}};"#));
    }

    #[test]
    fn test_wrap_collects_all_defects() {
        let mut wb = Wrapper::new();
        wb.inject("a = { _init: 1 }", "a").unwrap();
        wb.inject("b = { _doc: 2 }", "b").unwrap();
        let errs = wb.wrap().unwrap_err();
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn test_config_from_json() {
        let config = WrapperConfig::from_json(r#"{"allowedDomains":["toto.com"],"loaderName":"Loader"}"#).unwrap();
        assert_eq!(config.allowed_domains, vec!["toto.com"]);
        assert_eq!(config.loader_name, "Loader");
        assert_eq!(config.polyfill_url, DEFAULT_POLYFILL_URL);

        let err = WrapperConfig::from_json(r#"{"loaderName":"my-loader"}"#).unwrap_err();
        assert_eq!(err.code, ERR_INVALID_NAME);
        let err = WrapperConfig::from_json(r#"{"loaderName":"1Wb"}"#).unwrap_err();
        assert_eq!(err.code, ERR_INVALID_NAME);
        assert_eq!(WrapperConfig::from_json("{").unwrap_err().code, ERR_PARSE);
    }
}
