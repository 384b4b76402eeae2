//! Assistant routing.
//!
//! Decides whether a message is a question for the assistant, extracts the
//! question, and picks the system framing.

use regex::Regex;

use crate::assistant::Framing;
use crate::database::{ChatSettings, Feature};

/// Query words that switch to the aquarium expert.
const AQUARIUM_KEYWORDS: [&str; 11] = [
    "ماهی", "آکواریوم", "پرورش", "تکثیر", "فیلتر", "ph", "نیترات", "نیترایت", "پلنت", "شریمپ", "shrimp",
];

/// A question for the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistRequest {
    pub query: String,
    pub framing: Framing,
}

#[derive(Debug, Clone)]
pub struct AssistRouter {
    /// Bot handle without `@`.
    handle: String,
    ask: Regex,
    mention: Regex,
}

impl AssistRouter {
    pub fn new(handle: &str, ask_token: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            handle: handle.to_string(),
            ask: Regex::new(&format!(r"(?is)^/{}\s+(.+)", regex::escape(ask_token)))?,
            mention: Regex::new(&format!("(?i)@{}", regex::escape(handle)))?,
        })
    }

    /// Route `text`, or `None` when it is not meant for the assistant.
    ///
    /// Mentions need `ai_on_mention`, `/ask` needs `ai_on_command`. When the
    /// text is also an `/ask` command its argument is the query, otherwise
    /// the text minus the mention.
    pub fn route(&self, text: &str, settings: &ChatSettings) -> Option<AssistRequest> {
        if text.is_empty() {
            return None;
        }

        let ask = self.ask.captures(text);
        let mentioned = settings.is_enabled(Feature::AiOnMention) && text.contains(&self.handle);
        let commanded = settings.is_enabled(Feature::AiOnCommand) && ask.is_some();
        if !mentioned && !commanded {
            return None;
        }

        let query = match ask {
            Some(caps) => caps[1].trim().to_string(),
            None => self.mention.replace_all(text, "").trim().to_string(),
        };
        let framing = framing_for(&query);

        Some(AssistRequest { query, framing })
    }
}

/// Aquarium framing when the query mentions aquarium care.
pub fn framing_for(query: &str) -> Framing {
    let lower = query.to_lowercase();
    if AQUARIUM_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Framing::Aquarium
    } else {
        Framing::General
    }
}
