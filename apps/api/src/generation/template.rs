//! Prompt templates: `{name}` placeholders filled by a single substitution pass.
//!
//! A template source is either inline text or `file://<path>`, in which case the
//! file's contents are the template. Braces that do not wrap an identifier are
//! literal text, so JSON examples inside a prompt survive untouched.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::errors::AppError;

pub const FILE_SCHEME: &str = "file://";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Resolves a template or document source: `file://<path>` is read from disk,
/// anything else is returned as-is.
pub fn read_source(source: &str) -> Result<String, AppError> {
    let Some(path) = source.strip_prefix(FILE_SCHEME) else {
        return Ok(source.to_string());
    };
    if path.trim().is_empty() {
        return Err(AppError::InvalidInput(format!(
            "'{source}' has an empty path after {FILE_SCHEME}"
        )));
    }

    let path = Path::new(path);
    let contents =
        std::fs::read_to_string(path).map_err(|e| AppError::file_access(path, e))?;
    debug!("Read {} bytes from {}", contents.len(), path.display());
    Ok(contents)
}

#[derive(Debug, Clone)]
pub struct Template {
    text: String,
    placeholders: BTreeSet<String>,
}

impl Template {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let placeholders = PLACEHOLDER
            .captures_iter(&text)
            .map(|caps| caps[1].to_string())
            .collect();
        Self { text, placeholders }
    }

    /// Reads `source` (inline or `file://`) and parses it.
    pub fn load(source: &str) -> Result<Self, AppError> {
        read_source(source).map(Self::parse)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(String::as_str)
    }

    /// Fails if the template declares a placeholder outside `supplied`.
    pub fn require_fields(&self, supplied: &[&str]) -> Result<(), AppError> {
        match self.placeholders().find(|p| !supplied.contains(p)) {
            Some(field) => Err(AppError::TemplateFieldMissing {
                field: field.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Substitutes every placeholder from `fields`. Substituted values are not
    /// rescanned, so braces inside a value stay literal.
    pub fn render(&self, fields: &[(&str, &str)]) -> Result<String, AppError> {
        let lookup: HashMap<&str, &str> = fields.iter().copied().collect();
        let supplied: Vec<&str> = lookup.keys().copied().collect();
        self.require_fields(&supplied)?;

        let rendered = PLACEHOLDER.replace_all(&self.text, |caps: &Captures| {
            lookup.get(&caps[1]).copied().unwrap_or_default().to_string()
        });
        Ok(rendered.into_owned())
    }
}
