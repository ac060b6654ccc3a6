//! Discovery of creation sources on disk.
//!
//! A creation is a `<name>.js` object literal, optionally accompanied by
//! `<name>.html` and `<name>.css` in the same directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::validate::{CompilerError, ERR_IO};
use crate::wrapper::OUTPUT_EXTENSION;

// ═══════════════════════════════════════════════════════════════════════════════
// METADATA TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationSources {
    pub name: String,
    pub path: PathBuf,
    pub script: String,
    pub html: Option<String>,
    pub css: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CREATION DISCOVERY
// ═══════════════════════════════════════════════════════════════════════════════

/// Collects every creation under `dir`, sorted by path.
pub fn discover_creations(dir: &Path) -> Result<Vec<CreationSources>, CompilerError> {
    if !dir.is_dir() {
        return Err(CompilerError::new(
            ERR_IO,
            &format!("{} is not a directory", dir.display()),
        ));
    }

    let mut found = Vec::new();
    for path in find_script_files(dir)? {
        found.push(read_creation(&path)?);
    }

    tracing::debug!(dir = %dir.display(), creations = found.len(), "discovered creations");
    Ok(found)
}

/// Recursively find `.js` files, leaving out generated `.min.js` artifacts.
fn find_script_files(dir: &Path) -> Result<Vec<PathBuf>, CompilerError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| CompilerError::upstream(ERR_IO, "discovery", e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if file_name.ends_with(OUTPUT_EXTENSION) {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == "js") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn read_creation(script_path: &Path) -> Result<CreationSources, CompilerError> {
    let name = script_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            CompilerError::new(
                ERR_IO,
                &format!("invalid file name {}", script_path.display()),
            )
        })?;

    Ok(CreationSources {
        script: read_source(script_path)?,
        html: read_sibling(script_path, "html")?,
        css: read_sibling(script_path, "css")?,
        path: script_path.to_path_buf(),
        name,
    })
}

fn read_sibling(script_path: &Path, ext: &str) -> Result<Option<String>, CompilerError> {
    let sibling = script_path.with_extension(ext);
    if sibling.is_file() {
        read_source(&sibling).map(Some)
    } else {
        Ok(None)
    }
}

pub(crate) fn read_source(path: &Path) -> Result<String, CompilerError> {
    fs::read_to_string(path).map_err(|e| {
        CompilerError::upstream(ERR_IO, "io", format!("{}: {}", path.display(), e))
    })
}
