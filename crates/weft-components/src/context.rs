//! Owners of decoded component collections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use weft_common::{ApplicationId, ChannelId, GuildId, MessageId, UserId};

static NEXT_COLLECTION: AtomicU64 = AtomicU64::new(1);

/// Non-owning handle from a node to the collection it was decoded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(u64);

impl CollectionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_COLLECTION.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "components#{}", self.0)
    }
}

/// The message a collection is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    /// Message id
    pub id: MessageId,
    /// Message flags bitfield
    #[serde(default)]
    pub flags: Option<u64>,
    /// Author; for component messages this is the application's bot user
    pub author_id: UserId,
}

/// Where a collection lives: a message in a channel, or the channel itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Guild, absent in direct messages
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Channel
    pub channel_id: ChannelId,
    /// Owning message, absent for channel-level components
    #[serde(default)]
    pub message: Option<MessageContext>,
    /// Explicit application; defaults to the message author
    #[serde(default)]
    pub application_id: Option<ApplicationId>,
}

impl RenderContext {
    /// Components owned directly by a channel.
    pub const fn channel(guild_id: Option<GuildId>, channel_id: ChannelId) -> Self {
        Self {
            guild_id,
            channel_id,
            message: None,
            application_id: None,
        }
    }

    /// Components attached to a message.
    #[must_use]
    pub fn with_message(mut self, message: MessageContext) -> Self {
        self.message = Some(message);
        self
    }

    /// Target a specific application.
    #[must_use]
    pub fn with_application(mut self, application_id: ApplicationId) -> Self {
        self.application_id = Some(application_id);
        self
    }

    /// Application that receives interactions from this collection.
    pub fn application(&self) -> Option<ApplicationId> {
        self.application_id
            .or_else(|| self.message.as_ref().map(|m| ApplicationId(m.author_id.get())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_ids_are_unique() {
        assert_ne!(CollectionId::next(), CollectionId::next());
    }

    #[test]
    fn test_application_falls_back_to_author() {
        let ctx = RenderContext::channel(Some(GuildId(1)), ChannelId(2));
        assert_eq!(ctx.application(), None);

        let ctx = ctx.with_message(MessageContext {
            id: MessageId(3),
            flags: None,
            author_id: UserId(4),
        });
        assert_eq!(ctx.application(), Some(ApplicationId(4)));
        assert_eq!(
            ctx.with_application(ApplicationId(9)).application(),
            Some(ApplicationId(9))
        );
    }
}
