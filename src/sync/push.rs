use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::changeset::{resolve_change_set, ChangeScope};
use crate::client::RemoteTemplateClient;
use crate::report::{SyncReport, SyncResultEntry};
use crate::store::TemplateStore;

/// Push the resolved change set to the remote store.
///
/// Remote updates run one at a time, each awaited before the next starts;
/// the remote store is not assumed to tolerate concurrent writes to the same
/// identifier. A failing item is recorded and iteration continues — the run
/// fails in aggregate iff at least one entry failed, after the full ordered
/// report has been persisted. A partial failure must never look like a
/// successful run.
pub async fn push_templates(
    client: &dyn RemoteTemplateClient,
    store: &TemplateStore,
    scope: &ChangeScope,
    report_path: &Path,
) -> Result<()> {
    println!("{}", "Starting template sync to remote store...".cyan().bold());

    let change_set = resolve_change_set(store, scope)?;

    if change_set.is_empty() {
        println!("  {} No templates found to sync", "Note:".yellow());
        return Ok(());
    }

    println!(
        "  {} {} template(s) to sync:",
        "Found".green(),
        change_set.len()
    );
    for entry in &change_set {
        println!("    - {} (template {})", entry.filename, entry.template_id);
    }
    println!();

    let mut results: Vec<SyncResultEntry> = Vec::with_capacity(change_set.len());

    for entry in &change_set {
        println!("  {} {}...", "Syncing".cyan(), entry.filename);

        let outcome = match store.read(&entry.path) {
            Ok(html) => client
                .update(entry.template_id, &html)
                .await
                .map(|_| "Template updated successfully".to_string())
                .map_err(|e| (e.to_string(), e.detail().map(str::to_string))),
            Err(e) => Err((e.to_string(), None)),
        };

        match outcome {
            Ok(message) => {
                println!(
                    "    {} Updated template {}",
                    "✓".green(),
                    entry.template_id
                );
                results.push(SyncResultEntry {
                    template_id: entry.template_id,
                    filename: entry.filename.clone(),
                    success: true,
                    message,
                    error: None,
                });
            }
            Err((message, detail)) => {
                println!(
                    "    {} Failed to update template {}: {}",
                    "✗".red(),
                    entry.template_id,
                    message
                );
                log::warn!(
                    "Update failed for {} ({}): {}",
                    entry.filename,
                    entry.template_id,
                    message
                );
                results.push(SyncResultEntry {
                    template_id: entry.template_id,
                    filename: entry.filename.clone(),
                    success: false,
                    message,
                    error: detail,
                });
            }
        }
    }

    let report = SyncReport::from_results(results);
    report
        .save(report_path)
        .with_context(|| format!("Failed to persist run report to {}", report_path.display()))?;

    report.print_summary();

    if report.has_failures() {
        anyhow::bail!(
            "{} of {} templates failed to sync",
            report.failed(),
            report.results.len()
        );
    }

    println!("{}", "All templates synced successfully!".green().bold());
    Ok(())
}
