//! Markdown → DOCX + PDF export into the configured export directory.

pub mod cleaner;
pub mod converter;
pub mod handlers;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{error, info};

use crate::config_store::ConfigStore;
use crate::errors::AppError;
use crate::generation::require_input;

use converter::{DocumentConverter, OutputFormat, PandocConverter, DEFAULT_CONVERTER};

pub const EXPORT_SECTION: &str = "export";

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    pub path: PathBuf,
    #[serde(default)]
    pub args: ConverterArgs,
    #[serde(default = "default_converter")]
    pub converter: String,
}

/// Extra command-line arguments appended per output format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConverterArgs {
    #[serde(default)]
    pub docx: Vec<String>,
    #[serde(default)]
    pub pdf: Vec<String>,
}

fn default_converter() -> String {
    DEFAULT_CONVERTER.to_string()
}

impl ExportSettings {
    pub fn from_store(store: &ConfigStore) -> Result<Self, AppError> {
        if !store.contains("export.path") {
            return Err(AppError::ExportNotConfigured);
        }
        store.get_section(EXPORT_SECTION)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedDocuments {
    pub docx_path: PathBuf,
    pub pdf_path: PathBuf,
}

/// `<candidate>-<role>-<kind>`, lowercased, whitespace and path separators
/// replaced by `-`. "Generate" is stripped from the kind so a button label
/// like "Generate Resume" names the file `...-resume`.
pub fn export_base_name(candidate: &str, role: &str, kind: &str) -> String {
    let kind = kind.to_lowercase().replace("generate", "");
    let joined = format!("{candidate}-{role}-{}", kind.trim());
    joined
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '-'
            } else {
                c
            }
        })
        .collect()
}

pub struct DocumentExporter {
    settings: ExportSettings,
    converter: Arc<dyn DocumentConverter>,
}

impl DocumentExporter {
    pub fn new(settings: ExportSettings, converter: Arc<dyn DocumentConverter>) -> Self {
        Self {
            settings,
            converter,
        }
    }

    pub fn with_pandoc(settings: ExportSettings) -> Self {
        let converter = Arc::new(PandocConverter::new(settings.converter.clone()));
        Self::new(settings, converter)
    }

    pub fn directory(&self) -> &Path {
        &self.settings.path
    }

    /// Writes `<base>.docx` and `<base>.pdf`, overwriting existing files.
    /// A failed DOCX conversion aborts before PDF; the intermediate markdown
    /// file never outlives the call.
    pub async fn export(
        &self,
        markdown: &str,
        candidate: &str,
        role: &str,
        kind: &str,
    ) -> Result<ExportedDocuments, AppError> {
        require_input("markdown", markdown)?;
        require_input("candidate", candidate)?;

        let dir = self.settings.path.clone();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::file_access(&dir, e))?;

        let base = export_base_name(candidate, role, kind);
        let source = self.write_markdown(&base, markdown).await?;

        let docx_path = dir.join(format!("{base}.{}", OutputFormat::Docx.as_str()));
        let pdf_path = dir.join(format!("{base}.{}", OutputFormat::Pdf.as_str()));

        let converted = self.convert_all(source.path(), &docx_path, &pdf_path).await;

        let source_path = source.path().to_path_buf();
        if let Err(e) = source.close() {
            error!("Failed to remove {}: {e}", source_path.display());
        }
        converted?;

        info!(
            "Exported {} and {}",
            docx_path.display(),
            pdf_path.display()
        );
        Ok(ExportedDocuments {
            docx_path,
            pdf_path,
        })
    }

    async fn convert_all(
        &self,
        source: &Path,
        docx_path: &Path,
        pdf_path: &Path,
    ) -> Result<(), AppError> {
        let args = &self.settings.args;
        self.converter
            .convert(source, OutputFormat::Docx, docx_path, &args.docx)
            .await?;
        self.converter
            .convert(source, OutputFormat::Pdf, pdf_path, &args.pdf)
            .await
    }

    async fn write_markdown(&self, base: &str, markdown: &str) -> Result<NamedTempFile, AppError> {
        let dir = self.settings.path.clone();
        let prefix = format!("{base}-");
        let markdown = markdown.to_string();

        tokio::task::spawn_blocking(move || {
            let mut file = tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(".md")
                .tempfile_in(&dir)
                .map_err(|e| AppError::file_access(&dir, e))?;
            let written = file.write_all(markdown.as_bytes());
            let written = written.and_then(|_| file.flush());
            if let Err(e) = written {
                return Err(AppError::file_access(file.path(), e));
            }
            Ok(file)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow!("markdown writer task failed: {e}")))?
    }
}
