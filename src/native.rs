//! Node bindings.

use napi_derive::napi;

use crate::creation::Creation;
use crate::validate::CompilerError;
use crate::wrapper::{Wrapper, WrapperConfig};

#[napi(object)]
pub struct CreationInput {
    pub name: String,
    pub script: String,
    pub html: Option<String>,
    pub css: Option<String>,
    /// Default init parameters, as a JSON object.
    pub params: Option<serde_json::Value>,
}

#[napi(object)]
pub struct WrapOutput {
    pub has_errors: bool,
    pub errors: Vec<CompilerError>,
    pub loader: String,
}

fn to_napi(err: CompilerError) -> napi::Error {
    napi::Error::from_reason(err.to_string())
}

/// Builds a complete creation from its sources, params included.
fn build_creation(input: &CreationInput) -> Result<Creation, CompilerError> {
    let mut creation = Creation::from_source(&input.name, &input.script)?;
    creation.include_html_css(
        input.html.as_deref().unwrap_or_default(),
        input.css.as_deref().unwrap_or_default(),
    )?;
    if let Some(serde_json::Value::Object(params)) = &input.params {
        for (key, value) in params {
            creation.add_param(key, value.clone())?;
        }
    }
    Ok(creation)
}

/// Compiles one creation to `name={...}`.
#[napi]
pub fn compile_creation_native(input: CreationInput) -> napi::Result<String> {
    let creation = build_creation(&input).map_err(to_napi)?;
    Ok(creation.build())
}

/// Wraps creations into a loader. Compilation and control defects are
/// reported in the output instead of thrown.
#[napi]
pub fn wrap_native(
    creations: Vec<CreationInput>,
    config_json: Option<serde_json::Value>,
) -> napi::Result<WrapOutput> {
    let config: WrapperConfig = match config_json {
        Some(json) => serde_json::from_value(json)
            .map_err(|e| napi::Error::from_reason(format!("Invalid config: {}", e)))?,
        None => WrapperConfig::default(),
    };
    let mut wrapper = Wrapper::with_config(config).map_err(to_napi)?;

    let mut errors = Vec::new();
    for input in &creations {
        let registered = build_creation(input)
            .and_then(|creation| wrapper.register(creation).map(|_| ()));
        if let Err(e) = registered {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        match wrapper.wrap() {
            Ok(loader) => {
                return Ok(WrapOutput {
                    has_errors: false,
                    errors,
                    loader,
                })
            }
            Err(defects) => errors = defects,
        }
    }

    Ok(WrapOutput {
        has_errors: true,
        errors,
        loader: String::new(),
    })
}
