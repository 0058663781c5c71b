//! External document conversion. `PandocConverter` shells out through
//! `tokio::process`; tests swap in their own `DocumentConverter`.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::errors::AppError;

pub const DEFAULT_CONVERTER: &str = "pandoc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Docx,
    Pdf,
}

impl OutputFormat {
    /// Both the file extension and the converter's `-t` target name.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }
}

#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(
        &self,
        input: &Path,
        format: OutputFormat,
        output: &Path,
        extra_args: &[String],
    ) -> Result<(), AppError>;
}

pub struct PandocConverter {
    program: String,
}

impl PandocConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// `<input> -t <format> -o <output> <extra_args...>`
pub fn pandoc_args(
    input: &Path,
    format: OutputFormat,
    output: &Path,
    extra_args: &[String],
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        input.as_os_str().to_owned(),
        "-t".into(),
        format.as_str().into(),
        "-o".into(),
        output.as_os_str().to_owned(),
    ];
    args.extend(extra_args.iter().map(OsString::from));
    args
}

#[async_trait]
impl DocumentConverter for PandocConverter {
    async fn convert(
        &self,
        input: &Path,
        format: OutputFormat,
        output: &Path,
        extra_args: &[String],
    ) -> Result<(), AppError> {
        let args = pandoc_args(input, format, output, extra_args);
        debug!("Running {} {:?}", self.program, args);

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| AppError::Conversion(format!("failed to run {}: {e}", self.program)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(AppError::Conversion(format!(
                "{} exited with {} converting to {}: {}",
                self.program,
                result.status,
                format.as_str(),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_pandoc_args_order() {
        let args = pandoc_args(
            Path::new("/out/tmp.md"),
            OutputFormat::Docx,
            Path::new("/out/jane-doe-engineer-resume.docx"),
            &["--reference-doc=ref.docx".to_string()],
        );
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "/out/tmp.md",
                "-t",
                "docx",
                "-o",
                "/out/jane-doe-engineer-resume.docx",
                "--reference-doc=ref.docx",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_conversion_error() {
        let converter = PandocConverter::new("definitely-not-a-real-converter-binary");
        let result = converter
            .convert(
                Path::new("in.md"),
                OutputFormat::Pdf,
                &PathBuf::from("out.pdf"),
                &[],
            )
            .await;
        assert!(matches!(result, Err(AppError::Conversion(msg)) if msg.contains("failed to run")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_conversion_error() {
        // `false` ignores its arguments and exits 1.
        let converter = PandocConverter::new("false");
        let result = converter
            .convert(Path::new("in.md"), OutputFormat::Docx, Path::new("out.docx"), &[])
            .await;
        assert!(matches!(result, Err(AppError::Conversion(msg)) if msg.contains("exited with")));
    }
}
