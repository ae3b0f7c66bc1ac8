use anyhow::{ensure, Context, Result};
use colored::Colorize;
use serde_json::Value;

use crate::client::{RemoteTemplateClient, WebhookSubscription, WebhookTrigger};

/// Event type the webhook subscribes to.
pub const TEMPLATE_UPDATED_EVENT: &str = "template.email.updated";

/// Build the subscription payload for template-update notifications.
pub fn template_update_subscription(delivery_url: &str) -> WebhookSubscription {
    WebhookSubscription {
        url: delivery_url.to_string(),
        triggers: vec![WebhookTrigger {
            event_name: TEMPLATE_UPDATED_EVENT.to_string(),
            enabled: true,
        }],
        enabled: true,
    }
}

/// Create a webhook subscription so template updates on the remote side
/// trigger a pull of the affected template.
pub async fn setup_webhook(client: &dyn RemoteTemplateClient, delivery_url: &str) -> Result<()> {
    ensure!(!delivery_url.is_empty(), "Webhook delivery URL is not set");

    println!(
        "{}",
        "Setting up webhook for template updates...".cyan().bold()
    );
    println!("  {} webhook pointing to: {delivery_url}", "Creating".cyan());

    let subscription = template_update_subscription(delivery_url);
    let created = client
        .create_webhook(&subscription)
        .await
        .context("Failed to create webhook")?;

    println!("  {} Webhook created", "✓".green());
    println!("    Id: {}", field(&created, "id"));
    println!(
        "    Url: {}",
        created
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or(delivery_url)
    );
    println!("    Enabled: {}", field(&created, "enabled"));
    println!("  Will trigger on: {TEMPLATE_UPDATED_EVENT}");

    Ok(())
}

fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_targets_template_update_event() {
        let subscription = template_update_subscription("https://example.com/dispatch");
        assert_eq!(subscription.url, "https://example.com/dispatch");
        assert!(subscription.enabled);
        assert_eq!(subscription.triggers.len(), 1);
        assert_eq!(subscription.triggers[0].event_name, TEMPLATE_UPDATED_EVENT);
        assert!(subscription.triggers[0].enabled);
    }
}
