use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default location of the run report, relative to the working directory.
/// A CI collaborator reads this file to render a human summary.
pub const DEFAULT_REPORT_FILE: &str = "sync-results.json";

/// Outcome of pushing one template, immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResultEntry {
    /// Remote identifier of the template.
    pub template_id: u64,

    /// Local filename the content was read from.
    pub filename: String,

    /// Whether the remote update succeeded.
    pub success: bool,

    /// Human-readable outcome message.
    pub message: String,

    /// Raw error detail for failures, when the remote provided one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Persisted aggregate of per-item outcomes for one push run.
///
/// Overwritten on every run; version control and CI logs are the history.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// ISO 8601 timestamp of report generation.
    pub timestamp: String,

    /// Per-template outcomes, in the order the push processed them.
    pub results: Vec<SyncResultEntry>,
}

impl SyncReport {
    /// Wrap a run's ordered outcomes in a report.
    pub fn from_results(results: Vec<SyncResultEntry>) -> Self {
        SyncReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            results,
        }
    }

    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    /// True iff at least one entry failed — the run's aggregate outcome.
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| !r.success)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
    }

    /// Generate a markdown report
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Template Sync Report\n\n");
        output.push_str(&format!("**Generated:** {}\n", self.timestamp));
        output.push_str(&format!("**Successful:** {}\n", self.successful()));
        output.push_str(&format!("**Failed:** {}\n\n", self.failed()));

        if self.results.is_empty() {
            output.push_str("No templates were synced.\n");
            return output;
        }

        output.push_str("| Template | File | Result | Message |\n");
        output.push_str("|----------|------|--------|----------|\n");
        for entry in &self.results {
            output.push_str(&format!(
                "| {} | `{}` | {} | {} |\n",
                entry.template_id,
                entry.filename,
                if entry.success { "✅" } else { "❌" },
                entry.message.replace('|', "\\|"),
            ));
        }

        output
    }

    /// Print a colored console summary
    pub fn print_summary(&self) {
        println!("\n{}", "=== Sync Summary ===".bold().cyan());
        println!(
            "  {} Successful: {}",
            "✓".green(),
            self.successful().to_string().green()
        );
        println!(
            "  {} Failed: {}",
            "✗".red(),
            self.failed().to_string().red()
        );
        println!("  {} Total: {}", "•".cyan(), self.results.len());

        for entry in self.results.iter().filter(|r| !r.success) {
            println!(
                "    {} {} ({}): {}",
                "✗".red(),
                entry.filename,
                entry.template_id,
                entry.message
            );
        }
        println!();
    }

    /// Persist the report, overwriting the previous run's file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load the report persisted by the last push run.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse sync report")
    }
}

/// Render the last run's report in the requested format.
pub fn generate_report(report_path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let report = SyncReport::load(report_path)?;

    let content = match format.to_lowercase().as_str() {
        "json" => report.to_json()?,
        "markdown" | "md" => report.to_markdown(),
        "console" => {
            report.print_summary();
            return Ok(());
        }
        _ => return Err(anyhow::anyhow!("Unsupported format: {format}")),
    };

    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{} {}",
                "Report saved to:".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{content}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<SyncResultEntry> {
        vec![
            SyncResultEntry {
                template_id: 1,
                filename: "template_1_a.html".to_string(),
                success: true,
                message: "Template updated successfully".to_string(),
                error: None,
            },
            SyncResultEntry {
                template_id: 2,
                filename: "template_2_b.html".to_string(),
                success: false,
                message: "remote returned status 500: Internal error".to_string(),
                error: Some("{\"msg\":\"Internal error\"}".to_string()),
            },
        ]
    }

    #[test]
    fn counts_and_aggregate_outcome() {
        let report = SyncReport::from_results(sample_entries());
        assert_eq!(report.successful(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());

        let clean = SyncReport::from_results(vec![]);
        assert!(!clean.has_failures());
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let report = SyncReport::from_results(sample_entries());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"templateId\""));
        assert!(json.contains("\"results\""));
        // Successful entries omit the error field entirely.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["results"][0].get("error").is_none());
        assert!(value["results"][1]["error"].is_string());
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_REPORT_FILE);

        let report = SyncReport::from_results(sample_entries());
        report.save(&path).unwrap();

        let loaded = SyncReport::load(&path).unwrap();
        assert_eq!(loaded.results.len(), 2);
        assert_eq!(loaded.results[1].template_id, 2);
        assert!(!loaded.results[1].success);
    }

    #[test]
    fn markdown_lists_every_entry() {
        let report = SyncReport::from_results(sample_entries());
        let markdown = report.to_markdown();
        assert!(markdown.contains("# Template Sync Report"));
        assert!(markdown.contains("template_1_a.html"));
        assert!(markdown.contains("template_2_b.html"));
    }
}
