//! `voxskill check-locales`: verify every locale file is complete.

use std::path::Path;

use console::style;

use voxskill_core::greeter::keys::REQUIRED_PROMPTS;
use voxskill_core::locale::LocaleSource;
use voxskill_infra::locale::FsLocaleSource;
use voxskill_types::error::LocaleError;

/// Audit result for one locale file.
#[derive(Debug)]
pub struct LocaleReport {
    pub code: String,
    pub prompts: usize,
    /// Required keys that are absent or have no text.
    pub missing: Vec<String>,
    /// Set when the file could not be read or parsed.
    pub error: Option<String>,
}

impl LocaleReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.missing.is_empty()
    }
}

/// Check every `<code>.json` in `dir` against the prompts the skill uses.
pub async fn audit_locales(dir: &Path) -> Result<Vec<LocaleReport>, LocaleError> {
    let source = FsLocaleSource::new(dir);
    let mut reports = Vec::new();

    for code in source.list_locales().await? {
        let report = match source.load_catalog(&code).await {
            Ok(catalog) => {
                let missing = catalog
                    .missing_keys(REQUIRED_PROMPTS)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                LocaleReport {
                    code,
                    prompts: catalog.len(),
                    missing,
                    error: None,
                }
            }
            Err(err) => LocaleReport {
                code,
                prompts: 0,
                missing: Vec::new(),
                error: Some(err.to_string()),
            },
        };
        reports.push(report);
    }

    Ok(reports)
}

/// Print the audit and fail when any locale is incomplete.
pub async fn check_locales(dir: &Path, quiet: bool) -> anyhow::Result<()> {
    let reports = audit_locales(dir).await?;
    if reports.is_empty() {
        anyhow::bail!("no locale files found in {}", dir.display());
    }

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", style("✓").green())
        } else {
            format!("{}", style("✗").red())
        }
    };

    if !quiet {
        println!();
        println!(
            "  Checking {} locale file(s) in {}",
            reports.len(),
            style(dir.display()).cyan()
        );
        println!();
    }

    for report in &reports {
        if quiet && report.is_complete() {
            continue;
        }
        println!(
            "  {} {} ({} prompts)",
            check_mark(report.is_complete()),
            style(&report.code).bold(),
            report.prompts
        );
        if let Some(error) = &report.error {
            println!("      {}", style(error).red());
        }
        for key in &report.missing {
            println!("      missing {}", style(key).yellow());
        }
    }

    let incomplete = reports.iter().filter(|r| !r.is_complete()).count();
    if incomplete > 0 {
        anyhow::bail!("{incomplete} locale file(s) incomplete");
    }
    if !quiet {
        println!();
    }
    Ok(())
}
