#[cfg(feature = "napi")]
use napi_derive::napi;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_NOT_AN_OBJECT: &str = "WBZ-ERR-STRUCT-001";
pub const ERR_INIT_NOT_FUNCTION: &str = "WBZ-ERR-STRUCT-002";
pub const ERR_DOC_ACCESSOR_NOT_FUNCTION: &str = "WBZ-ERR-STRUCT-003";
pub const ERR_BUILDER_NOT_FUNCTION: &str = "WBZ-ERR-STRUCT-004";
pub const ERR_DUPLICATE_NAME: &str = "WBZ-ERR-NAME-001";
pub const ERR_INVALID_NAME: &str = "WBZ-ERR-NAME-002";
pub const ERR_RESERVED_NAME: &str = "WBZ-ERR-NAME-003";
pub const ERR_INVALID_DOMAIN: &str = "WBZ-ERR-NAME-004";
pub const ERR_UNKNOWN_CREATION: &str = "WBZ-ERR-NAME-005";
pub const ERR_PARSE: &str = "WBZ-ERR-PARSE-001";
pub const ERR_UNSUPPORTED_VALUE: &str = "WBZ-ERR-PARSE-002";
pub const ERR_NOT_A_FUNCTION: &str = "WBZ-ERR-PARSE-003";
pub const ERR_IO: &str = "WBZ-ERR-PARSE-004";
pub const ERR_NO_DOC_INIT: &str = "WBZ-ERR-PRECOND-001";

// ═══════════════════════════════════════════════════════════════════════════════
// RESERVED MEMBERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Document builder installed by `Creation::include_html`.
pub const BUILD_DOC: &str = "_buildDoc";
/// Style builder installed by `Creation::include_css`.
pub const BUILD_STYLE: &str = "_buildStyle";
/// Lazy accessor to the creation's document (global document or shadow root).
pub const DOC_ACCESSOR: &str = "_doc";
/// Optional initialization hook, run last by the loader.
pub const INIT_HOOK: &str = "_init";

lazy_static! {
    static ref FIELD_NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
    static ref BINDING_NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref HOSTNAME_RE: Regex =
        Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
            .unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// GUARANTEES
// ═══════════════════════════════════════════════════════════════════════════════

fn get_guarantee(code: &str) -> &'static str {
    match code {
        ERR_NOT_AN_OBJECT => "A creation source always evaluates to a single object literal.",
        ERR_INIT_NOT_FUNCTION => "The loader only calls `_init` when it is a function.",
        ERR_DOC_ACCESSOR_NOT_FUNCTION => {
            "Methods reach the creation's document through the `_doc()` accessor."
        }
        ERR_BUILDER_NOT_FUNCTION => "Builder members are compiled functions, never data.",
        ERR_DUPLICATE_NAME => "Creation names are unique within one wrapper.",
        ERR_INVALID_NAME => "Member and creation names are alphanumeric words.",
        ERR_RESERVED_NAME => "Builder members are only produced by the compiler.",
        ERR_INVALID_DOMAIN => "The domain allow-list only contains hostnames.",
        ERR_UNKNOWN_CREATION => "Only injected creations can be looked up.",
        ERR_PARSE => "Inputs are parsed before anything is generated.",
        ERR_UNSUPPORTED_VALUE => "Only static values and functions are compiled.",
        ERR_NOT_A_FUNCTION => "Methods are function literals.",
        ERR_IO => "Creation sources are read completely before compilation.",
        ERR_NO_DOC_INIT => "HTML and CSS are only attached to creations with a usable document accessor.",
        _ => "Unknown invariant.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message}")]
pub struct CompilerError {
    pub code: String,
    pub message: String,
    pub guarantee: String,
    /// Phase that failed (`script`, `method`, `html`, `css`, `wrap`, ...).
    pub phase: Option<String>,
    pub hints: Vec<String>,
}

impl CompilerError {
    pub fn new(code: &str, message: &str) -> Self {
        Self::with_details(code, message, None, vec![])
    }

    pub fn with_details(
        code: &str,
        message: &str,
        phase: Option<&str>,
        hints: Vec<String>,
    ) -> Self {
        CompilerError {
            code: code.to_string(),
            message: message.to_string(),
            guarantee: get_guarantee(code).to_string(),
            phase: phase.map(str::to_string),
            hints,
        }
    }

    /// Wraps a collaborator failure (parser, reader) with the phase it came from.
    pub fn upstream(code: &str, phase: &str, cause: impl std::fmt::Display) -> Self {
        Self::with_details(
            code,
            &format!("{} error: {}", phase, cause),
            Some(phase),
            vec![],
        )
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Attribute, method and creation names must be a non-empty alphanumeric word.
pub fn is_accepted_field_name(name: &str) -> bool {
    FIELD_NAME_RE.is_match(name)
}

/// Creation and loader names end up as JavaScript bindings, so they cannot
/// start with a digit.
pub fn is_accepted_binding_name(name: &str) -> bool {
    BINDING_NAME_RE.is_match(name)
}

pub fn check_binding_name(name: &str, kind: &str) -> Result<(), CompilerError> {
    if !is_accepted_binding_name(name) {
        return Err(CompilerError::new(
            ERR_INVALID_NAME,
            &format!(
                "The {} name '{}' should be an alphanumerical word not starting with a digit",
                kind, name
            ),
        ));
    }
    Ok(())
}

pub fn is_reserved_member(name: &str) -> bool {
    name == BUILD_DOC || name == BUILD_STYLE
}

pub fn check_field_name(name: &str, kind: &str) -> Result<(), CompilerError> {
    if !is_accepted_field_name(name) {
        return Err(CompilerError::new(
            ERR_INVALID_NAME,
            &format!("The {} name '{}' should be an alphanumerical word", kind, name),
        ));
    }
    Ok(())
}

pub fn is_valid_hostname(host: &str) -> bool {
    HOSTNAME_RE.is_match(host)
}

/// Validates an allow-list, lowercasing hostnames and dropping repeats while
/// keeping first-seen order.
pub fn normalize_domains<I, S>(domains: I) -> Result<Vec<String>, CompilerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for domain in domains {
        let domain = domain.as_ref().trim().to_ascii_lowercase();
        if !is_valid_hostname(&domain) {
            return Err(CompilerError::new(
                ERR_INVALID_DOMAIN,
                &format!("'{}' is not a hostname", domain),
            )
            .with_hint("Use a bare hostname such as `example.com`, without scheme or port"));
        }
        if !out.contains(&domain) {
            out.push(domain);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert!(is_accepted_field_name("addStr"));
        assert!(is_accepted_field_name("_init"));
        assert!(is_accepted_field_name("0"));
        assert!(!is_accepted_field_name(""));
        assert!(!is_accepted_field_name("my-field"));
        assert!(!is_accepted_field_name("a b"));
    }

    #[test]
    fn test_binding_names() {
        assert!(is_accepted_binding_name("card"));
        assert!(is_accepted_binding_name("_card2"));
        assert!(!is_accepted_binding_name("1card"));
        assert!(!is_accepted_binding_name(""));
        assert_eq!(check_binding_name("9lives", "creation").unwrap_err().code, ERR_INVALID_NAME);
    }

    #[test]
    fn test_error_carries_guarantee() {
        let err = CompilerError::new(ERR_DUPLICATE_NAME, "foo already exists");
        assert_eq!(err.code, ERR_DUPLICATE_NAME);
        assert_eq!(err.guarantee, "Creation names are unique within one wrapper.");
        assert_eq!(err.to_string(), "[WBZ-ERR-NAME-001] foo already exists");
    }

    #[test]
    fn test_upstream_keeps_phase() {
        let err = CompilerError::upstream(ERR_PARSE, "html", "unexpected end");
        assert_eq!(err.phase.as_deref(), Some("html"));
        assert!(err.message.contains("unexpected end"));
    }

    #[test]
    fn test_normalize_domains() {
        let domains = normalize_domains(["toto.com", "tata.com", "toto.com"]).unwrap();
        assert_eq!(domains, vec!["toto.com", "tata.com"]);
        let domains = normalize_domains(["Toto.COM", "toto.com"]).unwrap();
        assert_eq!(domains, vec!["toto.com"]);
        assert!(normalize_domains(["localhost"]).is_ok());
        assert!(normalize_domains(["https://toto.com"]).is_err());
        assert!(normalize_domains(["toto.com:8080"]).is_err());
    }
}
