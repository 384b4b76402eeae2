//! Transport-independent view of an incoming update.

/// A Telegram user as the engine sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub first_name: String,
}

impl Sender {
    pub fn new(id: u64, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
        }
    }
}

/// A text (or captionless) message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub from: Sender,
    /// Empty when the message has no text.
    pub text: String,
    /// Author of the message this one replies to.
    pub reply_to: Option<Sender>,
}

/// Service message announcing new members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberJoin {
    pub chat_id: i64,
    pub message_id: i32,
    pub from: Sender,
    pub members: Vec<Sender>,
}

/// One incoming event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Text(TextMessage),
    NewChatMembers(MemberJoin),
}

impl InboundEvent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Text(m) => m.chat_id,
            Self::NewChatMembers(j) => j.chat_id,
        }
    }

    pub fn sender(&self) -> &Sender {
        match self {
            Self::Text(m) => &m.from,
            Self::NewChatMembers(j) => &j.from,
        }
    }

    /// Message text; join notices have none.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(m) => &m.text,
            Self::NewChatMembers(_) => "",
        }
    }
}
