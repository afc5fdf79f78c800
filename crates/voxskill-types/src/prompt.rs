//! Locale prompt file entry.
//!
//! A locale file is a flat JSON object mapping a prompt key to either a
//! single template or a list of interchangeable variants.

use serde::{Deserialize, Serialize};

/// One prompt key's templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptEntry {
    Single(String),
    Variants(Vec<String>),
}

impl PromptEntry {
    /// All variants of this entry (a single template is a one-element slice).
    pub fn variants(&self) -> &[String] {
        match self {
            PromptEntry::Single(template) => std::slice::from_ref(template),
            PromptEntry::Variants(templates) => templates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.variants().is_empty()
    }
}
