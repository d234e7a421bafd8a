//! Webhook routes for the WhatsApp Cloud API.
//!
//! `GET /webhook` answers Meta's verification handshake; `POST /webhook`
//! receives update payloads, acknowledges immediately and processes each
//! message on a background task. Payload shapes are loosely typed: unknown
//! or absent fields must never fail the request.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use pasos_core::domain::UserId;
use pasos_core::messaging::types::{ButtonReply, IncomingUpdate, TextMessage};

use crate::handlers::{self, AppState};

/// Configure all webhook routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhook", web::get().to(verify))
        .route("/webhook", web::post().to(receive))
        .route("/health", web::get().to(health));
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

async fn verify(state: web::Data<AppState>, params: web::Query<VerifyParams>) -> impl Responder {
    if is_valid_subscription(&params, &state.cfg.verify_token) {
        return HttpResponse::Ok().body(params.challenge.clone().unwrap_or_default());
    }
    tracing::warn!("webhook verification failed");
    HttpResponse::Forbidden().body("verification failed")
}

fn is_valid_subscription(params: &VerifyParams, expected_token: &str) -> bool {
    params.mode.as_deref() == Some("subscribe")
        && params.verify_token.as_deref() == Some(expected_token)
}

async fn receive(state: web::Data<AppState>, payload: web::Json<WebhookPayload>) -> impl Responder {
    for update in extract_updates(payload.into_inner()) {
        let state = state.clone().into_inner();
        tokio::spawn(async move {
            handlers::handle_update(state, update).await;
        });
    }
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============== Cloud API payload shapes ==============

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
struct Change {
    #[serde(default)]
    value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMessage {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    from: String,
    text: Option<RawText>,
    interactive: Option<RawInteractive>,
}

#[derive(Debug, Default, Deserialize)]
struct RawText {
    #[serde(default)]
    body: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawInteractive {
    button_reply: Option<RawButtonReply>,
}

#[derive(Debug, Default, Deserialize)]
struct RawButtonReply {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
}

/// Flatten a Cloud API payload into transport-agnostic updates.
pub fn extract_updates(payload: WebhookPayload) -> Vec<IncomingUpdate> {
    let mut updates = Vec::new();
    for entry in payload.entry {
        for change in entry.changes {
            for msg in change.value.messages {
                if msg.from.is_empty() {
                    continue;
                }
                let from = UserId(msg.from);
                match msg.kind.as_str() {
                    "text" => {
                        let text = msg.text.map(|t| t.body).unwrap_or_default();
                        updates.push(IncomingUpdate::Text(TextMessage { from, text }));
                    }
                    "interactive" => match msg.interactive.and_then(|i| i.button_reply) {
                        Some(reply) => updates.push(IncomingUpdate::ButtonReply(ButtonReply {
                            from,
                            id: reply.id,
                            title: reply.title,
                        })),
                        None => updates.push(IncomingUpdate::Unsupported {
                            from,
                            kind: "interactive".to_string(),
                        }),
                    },
                    other => updates.push(IncomingUpdate::Unsupported {
                        from,
                        kind: other.to_string(),
                    }),
                }
            }
        }
    }
    updates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> WebhookPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extracts_text_message() {
        let p = payload(
            r#"{
                "entry": [{
                    "changes": [{
                        "value": {
                            "messages": [{
                                "type": "text",
                                "from": "5491100000000",
                                "text": { "body": "abiertos con chile" }
                            }]
                        }
                    }]
                }]
            }"#,
        );
        assert_eq!(
            extract_updates(p),
            vec![IncomingUpdate::Text(TextMessage {
                from: UserId("5491100000000".to_string()),
                text: "abiertos con chile".to_string(),
            })]
        );
    }

    #[test]
    fn extracts_button_reply() {
        let p = payload(
            r#"{
                "entry": [{
                    "changes": [{
                        "value": {
                            "messages": [{
                                "type": "interactive",
                                "from": "5491100000000",
                                "interactive": {
                                    "button_reply": { "id": "ver_mas", "title": "Ver más" }
                                }
                            }]
                        }
                    }]
                }]
            }"#,
        );
        match &extract_updates(p)[0] {
            IncomingUpdate::ButtonReply(reply) => assert_eq!(reply.id, "ver_mas"),
            other => panic!("expected button reply, got {other:?}"),
        }
    }

    #[test]
    fn non_text_kinds_are_unsupported() {
        let p = payload(
            r#"{
                "entry": [{
                    "changes": [{
                        "value": {
                            "messages": [{ "type": "audio", "from": "549" }]
                        }
                    }]
                }]
            }"#,
        );
        assert_eq!(
            extract_updates(p),
            vec![IncomingUpdate::Unsupported {
                from: UserId("549".to_string()),
                kind: "audio".to_string(),
            }]
        );
    }

    #[test]
    fn empty_and_statusy_payloads_yield_nothing() {
        assert!(extract_updates(payload("{}")).is_empty());
        // Delivery-status callbacks carry no `messages` array.
        let p = payload(r#"{"entry": [{"changes": [{"value": {"statuses": []}}]}]}"#);
        assert!(extract_updates(p).is_empty());
    }

    #[test]
    fn subscription_requires_mode_and_matching_token() {
        let ok = VerifyParams {
            mode: Some("subscribe".to_string()),
            verify_token: Some("secreto".to_string()),
            challenge: Some("1158201444".to_string()),
        };
        assert!(is_valid_subscription(&ok, "secreto"));

        let wrong_token = VerifyParams {
            verify_token: Some("otro".to_string()),
            ..ok_params()
        };
        assert!(!is_valid_subscription(&wrong_token, "secreto"));

        let missing_mode = VerifyParams {
            mode: None,
            ..ok_params()
        };
        assert!(!is_valid_subscription(&missing_mode, "secreto"));
    }

    fn ok_params() -> VerifyParams {
        VerifyParams {
            mode: Some("subscribe".to_string()),
            verify_token: Some("secreto".to_string()),
            challenge: None,
        }
    }

    #[test]
    fn message_without_sender_is_skipped() {
        let p = payload(
            r#"{"entry": [{"changes": [{"value": {"messages": [{"type": "text"}]}}]}]}"#,
        );
        assert!(extract_updates(p).is_empty());
    }
}
