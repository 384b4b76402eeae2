//! Content filters for non-admin messages.

use tracing::debug;

use super::ModerationVerdict;
use crate::database::{ChatSettings, Feature};
use crate::permissions::AdminResolver;

/// Substrings that count as a link. `@` also catches plain mentions.
const LINK_MARKERS: [&str; 4] = ["http://", "https://", "www.", "@"];

/// Ordered message filters. First hit wins.
#[derive(Clone, Debug)]
pub struct ModerationPipeline {
    admins: AdminResolver,
}

impl ModerationPipeline {
    pub fn new(admins: AdminResolver) -> Self {
        Self { admins }
    }

    /// Decide what happens to `text` sent by `sender_id`.
    ///
    /// Admin messages are never moderated. `delete_media` and `anti_spam`
    /// have no check behind them yet.
    pub fn evaluate(&self, text: &str, sender_id: u64, settings: &ChatSettings) -> ModerationVerdict {
        if text.is_empty() || self.admins.is_admin(sender_id, settings) {
            return ModerationVerdict::NoAction;
        }

        if settings.is_enabled(Feature::DeleteLinks) && contains_link(text) {
            debug!("Link filter hit for user {}", sender_id);
            return ModerationVerdict::DeleteMessage;
        }

        if settings.is_enabled(Feature::DeleteProfanity)
            && let Some(word) = find_profanity(text, &settings.profanity_list)
        {
            debug!("Profanity filter hit for user {}: {:?}", sender_id, word);
            return ModerationVerdict::DeleteMessage;
        }

        ModerationVerdict::NoAction
    }
}

fn contains_link(text: &str) -> bool {
    LINK_MARKERS.iter().any(|m| text.contains(m))
}

/// First list entry contained in `text`, ignoring case.
fn find_profanity<'a>(text: &str, list: &'a [String]) -> Option<&'a str> {
    let lower = text.to_lowercase();
    list.iter()
        .map(String::as_str)
        .filter(|w| !w.is_empty())
        .find(|w| lower.contains(&w.to_lowercase()))
}
