//! Loader generation.
//!
//! Composes compiled creations into a single factory function. The host page
//! uses it as `new Wb("name").init("#mount", {param: 1}).then(...)`.

use crate::emit::js_string;
use crate::validate::{BUILD_DOC, BUILD_STYLE, INIT_HOOK};
use crate::wrapper::WrapperConfig;

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// One compiled creation as the loader sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderEntry {
    pub name: String,
    /// The creation object literal, `{...}`.
    pub source: String,
    /// Default init parameters as an object literal, `{...}`.
    pub params: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOADER
// ═══════════════════════════════════════════════════════════════════════════════

/// Emits the loader function for `creations`, in registration order.
pub fn generate_loader(config: &WrapperConfig, creations: &[LoaderEntry]) -> String {
    let loader = config.loader_name.as_str();
    let mut out = String::new();

    out.push_str(&format!("function {}(id){{", loader));
    out.push_str(&domain_guard(config));
    out.push_str(&format!("if(window===this){{return new {}(id);}}", loader));
    out.push_str(&lookup_table(creations));
    out.push_str(&params_table(creations));
    out.push_str("var c=cs[id];var t=this;");
    out.push_str(PARAMS_MERGE);
    out.push_str(&build_sequence());
    out.push_str(&init_entry(config));
    out.push_str("this.get=function(){return c;};");
    out.push_str("return this;}");

    tracing::debug!(
        loader,
        creations = creations.len(),
        domains = config.allowed_domains.len(),
        "generated loader"
    );
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Hostname allow-list check. Empty when the loader is unrestricted.
fn domain_guard(config: &WrapperConfig) -> String {
    if config.allowed_domains.is_empty() {
        return String::new();
    }
    let hosts: Vec<String> = config.allowed_domains.iter().map(|d| js_string(d)).collect();
    format!(
        "var ah=[{}];if(ah.indexOf(window.location.hostname)==-1){{console.log({});return;}}",
        hosts.join(","),
        js_string(&format!("{} error: domain restricted", config.loader_name))
    )
}

fn lookup_table(creations: &[LoaderEntry]) -> String {
    let entries: Vec<String> = creations
        .iter()
        .map(|entry| format!("{}:{}", js_string(&entry.name), entry.source))
        .collect();
    format!("var cs={{{}}};", entries.join(","))
}

fn params_table(creations: &[LoaderEntry]) -> String {
    let entries: Vec<String> = creations
        .iter()
        .map(|entry| format!("{}:{}", js_string(&entry.name), entry.params))
        .collect();
    format!("var ps={{{}}};", entries.join(","))
}

/// Caller parameters override declared defaults; undeclared keys are ignored.
const PARAMS_MERGE: &str = "this._params=function(p){var d=ps[id]||{},m={};for(var k in d){if(d.hasOwnProperty(k))m[k]=(p&&p.hasOwnProperty(k))?p[k]:d[k];}return m;};";

/// `_buildDoc(target)`, then `_buildStyle()`, then `_init(params)`, each only
/// if the creation defines it.
fn build_sequence() -> String {
    format!(
        "this._build=function(target,p){{if(\"{doc}\" in c)c.{doc}(target);if(\"{style}\" in c)c.{style}();if(\"{init}\" in c)c.{init}(p);}};",
        doc = BUILD_DOC,
        style = BUILD_STYLE,
        init = INIT_HOOK
    )
}

fn init_entry(config: &WrapperConfig) -> String {
    let loader = &config.loader_name;
    let unknown = js_string(&format!("{} error: creation not found", loader));
    let missing = js_string(&format!("{} error: element not found in the document", loader));

    let mut out = String::new();
    out.push_str("this.init=function(target,params){return new Promise(function(r,e){");
    out.push_str(&format!(
        "if(typeof c=='undefined'){{console.log({unknown},id);e(new Error({unknown}+' '+id));return;}}",
        unknown = unknown
    ));
    out.push_str(&format!(
        "if(document.querySelector(target)==null){{console.log({missing},target);e(new Error({missing}+' '+target));return;}}",
        missing = missing
    ));
    out.push_str("var p=t._params(params);");
    out.push_str(&format!(
        "if((\"{doc}\" in c)&&!document.head.attachShadow){{var s=document.createElement('script');s.type='text/javascript';s.src={url};s.onload=function(){{t._build(target,p);r(c);}};document.getElementsByTagName('head')[0].appendChild(s);}}",
        doc = BUILD_DOC,
        url = js_string(&config.polyfill_url)
    ));
    out.push_str("else{t._build(target,p);r(c);}");
    out.push_str("});};");
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
