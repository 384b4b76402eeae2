//! Natural-language assistant backend.
//!
//! The engine asks [`Assistant`] for a completion and always gets text
//! back: backend problems turn into a short Persian notice for the chat.

mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiClient;

/// System prompt flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    General,
    /// Aquarium and fish-care expert.
    Aquarium,
}

impl Framing {
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::General => "You are a helpful assistant. Answer in Persian.",
            Self::Aquarium => {
                "You are an expert aquarium and fish care assistant. Answer in Persian with practical, safe advice."
            }
        }
    }
}

/// Why a completion could not be produced.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant disabled: no API key configured")]
    Disabled,

    #[error("request to completion backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion backend returned a non-JSON body")]
    Unparseable(#[source] serde_json::Error),

    #[error("completion backend response has no completion text")]
    UnrecognizedShape,
}

impl AssistantError {
    /// Text shown to chat members instead of the completion.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            Self::Disabled => "هوش مصنوعی فعال نیست — کلید OpenAI را ست کن.",
            Self::Transport(_) => "خطا در تماس با OpenAI.",
            Self::Unparseable(_) => "پاسخی دریافت نشد از OpenAI.",
            Self::UnrecognizedShape => "پاسخ نامشخص از OpenAI.",
        }
    }
}

/// Completion backend.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Answer `query`. Never fails; errors become fallback text.
    async fn complete(&self, query: &str, framing: Framing) -> String;
}
