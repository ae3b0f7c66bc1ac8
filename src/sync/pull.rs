use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::client::RemoteTemplateClient;
use crate::store::TemplateStore;

/// Content and optional human-readable name extracted from a fetch payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTemplate {
    pub html: String,
    pub name: Option<String>,
}

/// Payload shape with the HTML at the top level.
#[derive(Deserialize)]
struct FlatPayload {
    html: String,
    #[serde(default)]
    name: Option<String>,
}

/// Payload shape with the template nested one level down.
#[derive(Deserialize)]
struct NestedPayload {
    template: FlatPayload,
}

/// Interpret a fetch payload.
///
/// The remote returns one of three shapes depending on which endpoint
/// answered and the template's state: a bare HTML string, `{html, name?}`, or
/// `{template: {html, name?}}`. Shapes are tried in that fixed order; a
/// payload matching none of them is a structural failure.
pub fn extract_template(payload: &Value) -> Result<ExtractedTemplate> {
    if let Value::String(html) = payload {
        log::debug!("Fetch payload matched the bare-string shape");
        return Ok(ExtractedTemplate {
            html: html.clone(),
            name: None,
        });
    }

    if let Ok(flat) = serde_json::from_value::<FlatPayload>(payload.clone()) {
        log::debug!("Fetch payload matched the flat shape");
        return Ok(ExtractedTemplate {
            html: flat.html,
            name: flat.name,
        });
    }

    if let Ok(nested) = serde_json::from_value::<NestedPayload>(payload.clone()) {
        log::debug!("Fetch payload matched the nested shape");
        return Ok(ExtractedTemplate {
            html: nested.template.html,
            name: nested.template.name,
        });
    }

    bail!("Could not extract HTML content from template response")
}

/// Pull one template from the remote store into the local file tree.
///
/// Fetches the payload (the client handles the endpoint fallback), extracts
/// the content, and saves it formatted. With a single item there is nothing
/// to continue past, so any failure aborts the operation.
pub async fn pull_template(
    client: &dyn RemoteTemplateClient,
    store: &TemplateStore,
    template_id: u64,
) -> Result<PathBuf> {
    println!(
        "{}",
        format!("Syncing template {template_id} from remote store...")
            .cyan()
            .bold()
    );

    println!("  {} template {template_id}...", "Fetching".cyan());
    let payload = client
        .fetch(template_id)
        .await
        .with_context(|| format!("Failed to fetch template {template_id}"))?;

    let extracted = extract_template(&payload)
        .with_context(|| format!("Unrecognized response shape for template {template_id}"))?;

    if extracted.html.is_empty() {
        bail!("Template {template_id} HTML content is empty");
    }

    println!(
        "  {} template ({} characters)",
        "Fetched".green(),
        extracted.html.len()
    );

    let path = store.save(template_id, &extracted.html, extracted.name.as_deref())?;

    println!(
        "\n{} Template {} synced successfully!",
        "✓".green().bold(),
        template_id
    );
    println!("  File: {}", path.display().to_string().cyan());

    Ok(path)
}
