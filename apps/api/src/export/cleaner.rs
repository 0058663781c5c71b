//! Startup sweep of leftover export artifacts.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::{info, warn};

/// Extensions produced by an export, compared case-insensitively.
pub const EXPORT_EXTENSIONS: &[&str] = &["md", "docx", "pdf"];

#[derive(Debug, Default, Serialize)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

fn is_export_artifact(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            EXPORT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Deletes `md`/`docx`/`pdf` files directly inside `dir`. Never recurses and
/// never fails: problems are logged and reported.
pub async fn cleanup(dir: &Path) -> CleanupReport {
    sweep(dir, |path| async move { fs::remove_file(path).await }).await
}

async fn sweep<F, Fut>(dir: &Path, mut remove: F) -> CleanupReport
where
    F: FnMut(PathBuf) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let mut report = CleanupReport::default();

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Nothing to clean: {} does not exist", dir.display());
            return report;
        }
        Err(e) => {
            warn!("Cannot read export directory {}: {e}", dir.display());
            return report;
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Stopped reading {}: {e}", dir.display());
                break;
            }
        };

        let path = entry.path();
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if !is_file || !is_export_artifact(&path) {
            continue;
        }

        match remove(path.clone()).await {
            Ok(()) => {
                info!("Removed stale export {}", path.display());
                report.removed.push(path);
            }
            Err(e) => {
                warn!("Could not remove {}: {e}", path.display());
                report.failed.push(path);
            }
        }
    }

    report
}
