//! WhatsApp adapter (Cloud API).
//!
//! This crate implements the `pasos-core` MessagingPort over the WhatsApp
//! Cloud API and hosts the webhook routes that receive updates from Meta.

use std::time::Duration;

use async_trait::async_trait;

use pasos_core::{
    domain::UserId,
    errors::Error,
    messaging::{port::MessagingPort, types::MessagingCapabilities},
    Result,
};

pub mod handlers;
pub mod webhook;

/// Label on the quick-reply button that continues a paginated result.
const CONTINUATION_BUTTON_TITLE: &str = "Ver más";

#[derive(Clone, Debug)]
pub struct WhatsAppMessenger {
    http: reqwest::Client,
    messages_url: String,
    token: String,
}

impl WhatsAppMessenger {
    pub fn new(
        graph_api_base: &str,
        phone_id: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("whatsapp client: {e}")))?;
        Ok(Self {
            http,
            messages_url: format!("{graph_api_base}/{phone_id}/messages"),
            token: token.into(),
        })
    }

    async fn post(&self, payload: serde_json::Value) -> Result<()> {
        let resp = self
            .http
            .post(&self.messages_url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::External(format!("whatsapp send: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::External(format!(
                "whatsapp api returned status {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingPort for WhatsAppMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_buttons: true,
            max_message_len: 4096,
        }
    }

    async fn send_text(&self, to: &UserId, text: &str) -> Result<()> {
        self.post(serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to.as_str(),
            "type": "text",
            "text": { "body": text },
        }))
        .await
    }

    async fn send_with_continuation(&self, to: &UserId, text: &str, token: &str) -> Result<()> {
        self.post(serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to.as_str(),
            "type": "interactive",
            "interactive": {
                "type": "button",
                "body": { "text": text },
                "action": {
                    "buttons": [{
                        "type": "reply",
                        "reply": { "id": token, "title": CONTINUATION_BUTTON_TITLE },
                    }],
                },
            },
        }))
        .await
    }
}
