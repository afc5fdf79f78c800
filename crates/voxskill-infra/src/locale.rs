//! Filesystem-backed prompt catalogs.
//!
//! Each locale is a flat JSON file `<dir>/<code>.json` mapping prompt keys
//! to a template string or a list of template variants.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use voxskill_core::locale::{LocaleSource, PromptCatalog};
use voxskill_types::error::LocaleError;

const LOCALE_EXTENSION: &str = "json";

/// Reads `<code>.json` files from a languages directory.
#[derive(Debug, Clone)]
pub struct FsLocaleSource {
    dir: PathBuf,
}

impl FsLocaleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `code`. Codes that could escape the
    /// directory are rejected.
    pub fn path_for(&self, code: &str) -> Result<PathBuf, LocaleError> {
        if code.is_empty() || code.contains(['/', '\\']) || code.contains("..") {
            return Err(LocaleError::NotFound {
                path: code.to_string(),
            });
        }
        Ok(self.dir.join(format!("{code}.{LOCALE_EXTENSION}")))
    }

    /// Locale codes with a file in the directory, sorted.
    pub async fn list_locales(&self) -> Result<Vec<String>, LocaleError> {
        let io_err = |e: std::io::Error| LocaleError::Io {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_err)?;
        let mut codes = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LOCALE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                codes.push(stem.to_string());
            }
        }
        codes.sort();
        Ok(codes)
    }
}

impl LocaleSource for FsLocaleSource {
    async fn load_catalog(&self, code: &str) -> Result<PromptCatalog, LocaleError> {
        let path = self.path_for(code)?;
        let shown = path.display().to_string();

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(LocaleError::NotFound { path: shown });
            }
            Err(err) => {
                return Err(LocaleError::Io {
                    path: shown,
                    message: err.to_string(),
                });
            }
        };

        let catalog = PromptCatalog::from_json(&content).map_err(|e| LocaleError::Parse {
            path: shown.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %shown, prompts = catalog.len(), "loaded prompt catalog");
        Ok(catalog)
    }
}
