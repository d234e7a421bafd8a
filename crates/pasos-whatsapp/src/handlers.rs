//! Update processing: ack, record fetch, engine call, ordered delivery.

use std::sync::Arc;

use pasos_core::{
    config::Config,
    domain::UserId,
    engine::{Engine, Outgoing},
    formatting,
    messaging::{
        port::MessagingPort,
        types::{ButtonReply, IncomingUpdate, TextMessage},
    },
    normalize::normalize,
    ports::RecordSource,
};

/// Application state shared across all webhook handlers.
pub struct AppState {
    pub cfg: Arc<Config>,
    pub engine: Arc<Engine>,
    pub source: Arc<dyn RecordSource>,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn handle_update(state: Arc<AppState>, update: IncomingUpdate) {
    match update {
        IncomingUpdate::Text(TextMessage { from, text }) => {
            handle_text(state, from, text).await;
        }
        // A tapped button re-enters the pipeline with its id as the text.
        IncomingUpdate::ButtonReply(ButtonReply { from, id, .. }) => {
            handle_text(state, from, id).await;
        }
        IncomingUpdate::Unsupported { from, kind } => {
            tracing::info!(user = from.as_str(), kind, "ignoring non-text message");
            send(&state, &from, &formatting::unsupported_message()).await;
        }
    }
}

async fn handle_text(state: Arc<AppState>, from: UserId, text: String) {
    let text = text.trim().to_string();
    if text.is_empty() {
        return;
    }

    send(&state, &from, &formatting::ack_message()).await;

    // Pending cursor first: "ver más" continues instead of re-querying.
    if let Some(out) = state.engine.try_continue(&from, &normalize(&text)) {
        deliver(&state, &from, out).await;
        return;
    }

    let query = state.engine.classify(&text);
    let records = if query.needs_records() {
        match state.source.fetch_records().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "record fetch failed, answering with empty snapshot");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let out = state.engine.respond(&from, &query, records);
    deliver(&state, &from, out).await;
}

/// Deliver chunks in order; the last one carries the continuation button
/// when more results are pending. Delivery is best-effort.
async fn deliver(state: &AppState, to: &UserId, out: Outgoing) {
    let last = out.chunks.len().saturating_sub(1);
    for (i, chunk) in out.chunks.iter().enumerate() {
        let result = match (&out.continuation, i == last) {
            (Some(token), true) => {
                state
                    .messenger
                    .send_with_continuation(to, chunk, token)
                    .await
            }
            _ => state.messenger.send_text(to, chunk).await,
        };
        if let Err(e) = result {
            tracing::warn!(user = to.as_str(), error = %e, "delivery failed");
        }
    }
}

async fn send(state: &AppState, to: &UserId, text: &str) {
    if let Err(e) = state.messenger.send_text(to, text).await {
        tracing::warn!(user = to.as_str(), error = %e, "delivery failed");
    }
}
