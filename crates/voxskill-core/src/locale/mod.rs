//! Localized prompt catalogs.
//!
//! - `PromptCatalog` -- the immutable key -> templates mapping for one request
//! - `LocaleSource` -- port for loading a catalog by locale code
//! - `resolve_catalog` -- exact-locale lookup with a two-letter fallback
//! - `picker` -- injectable variant selection

pub mod picker;

use std::collections::HashMap;
use std::future::Future;

use voxskill_types::error::{LocaleError, SkillError};
use voxskill_types::prompt::PromptEntry;

pub use picker::{FixedPicker, RandomPicker, VariantPicker};

/// Placeholder filled by [`fill_template`].
pub const TEMPLATE_SLOT: &str = "{}";

/// Prompt templates for one locale, keyed by logical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptCatalog {
    entries: HashMap<String, PromptEntry>,
}

impl PromptCatalog {
    pub fn new(entries: HashMap<String, PromptEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from the JSON text of a locale file.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::new)
    }

    pub fn get(&self, key: &str) -> Option<&PromptEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some_and(|entry| !entry.is_empty())
    }

    /// Pick one variant of `key` using `picker`.
    pub fn pick(&self, key: &str, picker: &mut dyn VariantPicker) -> Result<&str, SkillError> {
        let variants = self
            .get(key)
            .map(PromptEntry::variants)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SkillError::MissingPrompt(key.to_string()))?;

        let index = picker.pick_index(variants.len()).min(variants.len() - 1);
        Ok(&variants[index])
    }

    /// Keys from `required` that are absent or empty in this catalog.
    pub fn missing_keys<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|key| !self.contains(key))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Substitute `value` into the first `{}` of `template`.
///
/// Templates without a slot are returned unchanged.
pub fn fill_template(template: &str, value: &str) -> String {
    template.replacen(TEMPLATE_SLOT, value, 1)
}

/// The two-letter base language of a locale code (`en-GB` -> `en`).
pub fn base_language(locale: &str) -> &str {
    locale.get(..2).unwrap_or(locale)
}

/// Trait for locale catalog backends.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// The filesystem implementation lives in voxskill-infra.
pub trait LocaleSource: Send + Sync {
    /// Load the catalog stored under exactly `code` (no fallback).
    fn load_catalog(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<PromptCatalog, LocaleError>> + Send;
}

/// Load the catalog for `locale`, falling back once to its base language.
///
/// Any failure of the exact lookup (missing file, unreadable, malformed)
/// triggers the fallback. Failure of both yields `LocaleError::Unavailable`.
pub async fn resolve_catalog<S: LocaleSource + ?Sized>(
    source: &S,
    locale: &str,
) -> Result<PromptCatalog, LocaleError> {
    match source.load_catalog(locale).await {
        Ok(catalog) => return Ok(catalog),
        Err(err) => {
            tracing::debug!(locale, error = %err, "exact locale unavailable, trying base language");
        }
    }

    let base = base_language(locale);
    match source.load_catalog(base).await {
        Ok(catalog) => Ok(catalog),
        Err(err) => {
            tracing::warn!(locale, base, error = %err, "no prompt catalog for locale");
            Err(LocaleError::Unavailable {
                locale: locale.to_string(),
                base: base.to_string(),
            })
        }
    }
}

/// Catalogs held in memory, keyed by locale code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocaleSource {
    catalogs: HashMap<String, PromptCatalog>,
}

impl InMemoryLocaleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, code: impl Into<String>, catalog: PromptCatalog) -> Self {
        self.catalogs.insert(code.into(), catalog);
        self
    }
}

impl LocaleSource for InMemoryLocaleSource {
    async fn load_catalog(&self, code: &str) -> Result<PromptCatalog, LocaleError> {
        self.catalogs
            .get(code)
            .cloned()
            .ok_or_else(|| LocaleError::NotFound {
                path: code.to_string(),
            })
    }
}
