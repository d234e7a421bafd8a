use async_trait::async_trait;

use crate::{domain::UserId, messaging::types::MessagingCapabilities, Result};

/// Cross-messenger port.
///
/// The WhatsApp Cloud API is the first implementation; the shape is designed
/// so future adapters (Telegram/SMS) can fit behind the same interface with
/// capability flags.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_text(&self, to: &UserId, text: &str) -> Result<()>;

    /// Send `text` together with a quick-reply button that posts `token`
    /// back when tapped. Transports without buttons fall back to plain text.
    async fn send_with_continuation(&self, to: &UserId, text: &str, token: &str) -> Result<()>;
}
