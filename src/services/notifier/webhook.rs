use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::{Notifier, WebhookEvent};

pub struct WebhookNotifier {
    url: String,
    secret: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String, secret: String) -> Self {
        Self {
            url,
            secret,
            client: reqwest::Client::new(),
        }
    }

    // Receivers verify the body against the shared secret, same HMAC-SHA1
    // scheme Twilio uses for its webhooks.
    fn sign(&self, body: &[u8]) -> Option<String> {
        if self.secret.is_empty() {
            return None;
        }
        let mut mac = Hmac::<Sha1>::new_from_slice(self.secret.as_bytes()).ok()?;
        mac.update(body);
        let result = mac.finalize().into_bytes();
        Some(base64::engine::general_purpose::STANDARD.encode(result))
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn post(&self, event: &WebhookEvent) -> anyhow::Result<()> {
        if self.url.is_empty() {
            tracing::debug!(
                action = event.action.as_str(),
                "webhook url not configured, skipping"
            );
            return Ok(());
        }

        let body = serde_json::to_vec(event).context("failed to serialize webhook event")?;
        let signature = self.sign(&body);

        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(signature) = signature {
            request = request.header("x-deskbook-signature", signature);
        }

        request
            .send()
            .await
            .context("failed to deliver webhook")?
            .error_for_status()
            .context("webhook endpoint returned error")?;

        Ok(())
    }
}
