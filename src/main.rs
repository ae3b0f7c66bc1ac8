use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use template_sync::changeset::ChangeScope;
use template_sync::client::HttpTemplateClient;
use template_sync::config::ApiConfig;
use template_sync::logger;
use template_sync::report::{generate_report, DEFAULT_REPORT_FILE};
use template_sync::store::TemplateStore;
use template_sync::sync;
use template_sync::webhook;

#[derive(Parser)]
#[command(name = "template-sync")]
#[command(about = "Sync HTML email templates with a remote template store", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the template files
    #[arg(long, default_value = "templates", global = true)]
    templates_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull one template from the remote store into the file tree
    Pull {
        /// Remote identifier of the template
        template_id: u64,
    },

    /// Push local templates to the remote store
    Push {
        /// Older revision bounding the change detection (e.g. HEAD~1)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Newer revision bounding the change detection (e.g. HEAD)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Where to write the run report
        #[arg(long, default_value = DEFAULT_REPORT_FILE)]
        report: PathBuf,
    },

    /// Create a webhook so remote template updates trigger a sync
    SetupWebhook {
        /// Delivery URL, e.g. a repository_dispatch endpoint or a serverless
        /// function that triggers the pull workflow
        #[arg(long)]
        url: String,
    },

    /// Render the last push run's report
    Report {
        /// Output format: console, json, or markdown
        #[arg(short, long, default_value = "console")]
        format: String,

        /// Output file (default: print to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report file written by the last push run
        #[arg(long, default_value = DEFAULT_REPORT_FILE)]
        report: PathBuf,
    },
}

/// Decide how the push change set is resolved.
///
/// Explicit `--from`/`--to` revisions win. Otherwise a CI push event has a
/// well-defined previous revision, so the last commit's diff is used. Local
/// runs sync the whole directory.
fn push_scope(from: Option<String>, to: Option<String>) -> ChangeScope {
    if let (Some(from), Some(to)) = (from, to) {
        return ChangeScope::Incremental { from, to };
    }

    let is_ci_push = matches!(std::env::var("CI").as_deref(), Ok("true"))
        && matches!(std::env::var("GITHUB_EVENT_NAME").as_deref(), Ok("push"));
    if is_ci_push {
        return ChangeScope::Incremental {
            from: "HEAD~1".to_string(),
            to: "HEAD".to_string(),
        };
    }

    ChangeScope::Full
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger()?;

    let store = TemplateStore::new(cli.templates_dir);

    match cli.command {
        Commands::Pull { template_id } => {
            let client = HttpTemplateClient::new(ApiConfig::from_env()?);
            sync::pull_template(&client, &store, template_id).await?;
        }
        Commands::Push { from, to, report } => {
            let client = HttpTemplateClient::new(ApiConfig::from_env()?);
            let scope = push_scope(from, to);
            sync::push_templates(&client, &store, &scope, &report).await?;
        }
        Commands::SetupWebhook { url } => {
            let client = HttpTemplateClient::new(ApiConfig::from_env()?);
            webhook::setup_webhook(&client, &url).await?;
        }
        Commands::Report {
            format,
            output,
            report,
        } => {
            generate_report(&report, &format, output.as_deref())?;
        }
    }

    Ok(())
}
