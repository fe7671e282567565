//! Routing state machine over inbound messages.
//!
//! [`classify`] is a pure function from a typed inbound event and the current
//! registry state to a [`Route`] decision. All platform side effects (sends,
//! reactions, channel creation) happen in the discord crate; this module only
//! decides.

use crate::registry::{ChannelId, TicketRegistry, UserId};

/// Reserved name prefix marking ticket channels.
pub const TICKET_PREFIX: &str = "ticket-";

/// Where an inbound message arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOrigin {
    /// Private one-to-one message to the bot.
    Direct,
    /// Message inside a guild channel. The name is optional because the
    /// gateway payload does not carry it; when absent, registry membership
    /// alone decides (live ticket channels always carry the prefix by
    /// construction).
    Channel {
        channel_id: ChannelId,
        channel_name: Option<String>,
    },
}

/// Platform-free view of an inbound message: exactly the fields routing
/// consumes.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub author_id: UserId,
    pub author_is_bot: bool,
    pub origin: MessageOrigin,
    pub content: String,
    pub attachment_urls: Vec<String>,
}

/// Routing decision for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// DM from a user with a live ticket: relay into its channel.
    ForwardToTicket { channel_id: ChannelId },
    /// DM from a user without a ticket: create one.
    OpenTicket,
    /// Message in a live ticket channel: relay to the owning user's DMs.
    ForwardToUser { user_id: UserId },
    /// Not routed.
    Ignore(IgnoreReason),
}

/// Why a message was not routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    BotAuthor,
    NotTicketChannel,
    CommandInvocation,
    NoLiveTicket,
}

/// Classify one inbound message against the registry.
#[must_use]
pub fn classify(msg: &InboundMessage, registry: &TicketRegistry) -> Route {
    if msg.author_is_bot {
        return Route::Ignore(IgnoreReason::BotAuthor);
    }

    match &msg.origin {
        MessageOrigin::Direct => match registry.lookup_by_user(msg.author_id) {
            Some(channel_id) => Route::ForwardToTicket { channel_id },
            None => Route::OpenTicket,
        },
        MessageOrigin::Channel {
            channel_id,
            channel_name,
        } => {
            if let Some(name) = channel_name
                && !name.starts_with(TICKET_PREFIX)
            {
                return Route::Ignore(IgnoreReason::NotTicketChannel);
            }
            if msg.content.starts_with('/') {
                return Route::Ignore(IgnoreReason::CommandInvocation);
            }
            match registry.lookup_by_channel(*channel_id) {
                Some(user_id) => Route::ForwardToUser { user_id },
                // Not every ticket-named channel is a live ticket, e.g. after
                // the mapping was dropped out of band.
                None => Route::Ignore(IgnoreReason::NoLiveTicket),
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn dm(author_id: u64, content: &str) -> InboundMessage {
        InboundMessage {
            author_id,
            author_is_bot: false,
            origin: MessageOrigin::Direct,
            content: content.into(),
            attachment_urls: Vec::new(),
        }
    }

    fn channel_msg(author_id: u64, channel_id: u64, name: &str, content: &str) -> InboundMessage {
        InboundMessage {
            author_id,
            author_is_bot: false,
            origin: MessageOrigin::Channel {
                channel_id,
                channel_name: Some(name.into()),
            },
            content: content.into(),
            attachment_urls: Vec::new(),
        }
    }

    #[test]
    fn first_contact_dm_opens_a_ticket() {
        let registry = TicketRegistry::new();
        assert_eq!(classify(&dm(1, "need help"), &registry), Route::OpenTicket);
    }

    #[test]
    fn dm_with_live_ticket_forwards_into_its_channel() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        assert_eq!(classify(&dm(1, "still broken"), &registry), Route::ForwardToTicket {
            channel_id: 100
        });
    }

    #[test]
    fn staff_reply_in_ticket_channel_forwards_to_owner() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        let msg = channel_msg(555, 100, "ticket-alice-0001", "we can help");
        assert_eq!(classify(&msg, &registry), Route::ForwardToUser { user_id: 1 });
    }

    #[test]
    fn bot_authors_are_never_routed() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        let mut msg = dm(1, "echo");
        msg.author_is_bot = true;
        assert_eq!(classify(&msg, &registry), Route::Ignore(IgnoreReason::BotAuthor));
    }

    #[test]
    fn command_invocations_in_ticket_channels_are_skipped() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        let msg = channel_msg(555, 100, "ticket-alice-0001", "/close");
        assert_eq!(
            classify(&msg, &registry),
            Route::Ignore(IgnoreReason::CommandInvocation)
        );
    }

    #[rstest]
    #[case("general", "hello", IgnoreReason::NotTicketChannel)]
    #[case("ticket-alice-0001", "/close", IgnoreReason::CommandInvocation)]
    #[case("ticket-alice-0001", "anyone there?", IgnoreReason::NoLiveTicket)]
    fn guild_messages_outside_live_tickets_are_ignored(
        #[case] name: &str,
        #[case] content: &str,
        #[case] expected: IgnoreReason,
    ) {
        let registry = TicketRegistry::new();
        let msg = channel_msg(555, 100, name, content);
        assert_eq!(classify(&msg, &registry), Route::Ignore(expected));
    }

    #[test]
    fn unnamed_channel_falls_back_to_registry_membership() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        let msg = InboundMessage {
            author_id: 555,
            author_is_bot: false,
            origin: MessageOrigin::Channel {
                channel_id: 100,
                channel_name: None,
            },
            content: "we can help".into(),
            attachment_urls: Vec::new(),
        };
        assert_eq!(classify(&msg, &registry), Route::ForwardToUser { user_id: 1 });
    }

    #[test]
    fn self_healing_eviction_reroutes_to_open() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        // Channel deleted out of band; handler evicts, then the next DM
        // classifies as first contact again.
        assert_eq!(registry.remove_by_channel(100), Some(1));
        assert_eq!(classify(&dm(1, "hello again"), &registry), Route::OpenTicket);
        assert_eq!(registry.lookup_by_user(1), None);
    }
}
