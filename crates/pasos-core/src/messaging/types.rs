use crate::domain::UserId;

/// Cross-messenger incoming update model.
///
/// WhatsApp-specific payload shapes live in the WhatsApp adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomingUpdate {
    Text(TextMessage),
    ButtonReply(ButtonReply),
    Unsupported { from: UserId, kind: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextMessage {
    pub from: UserId,
    pub text: String,
}

/// A tapped quick-reply button; `id` carries the continuation token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonReply {
    pub from: UserId,
    pub id: String,
    pub title: String,
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_buttons: bool,
    pub max_message_len: usize,
}
