//! Platform-free ticket core for the modmail relay.
//!
//! Holds the user↔channel registry, per-ticket transcripts, and the routing
//! state machine over a typed inbound-message event. Nothing in this crate
//! links the chat client, so every routing decision is unit-testable.

pub mod error;
pub mod registry;
pub mod router;
pub mod transcript;

pub use {
    error::{Error, Result},
    registry::{ChannelId, Ticket, TicketRegistry, UserId},
    router::{IgnoreReason, InboundMessage, MessageOrigin, Route, TICKET_PREFIX, classify},
    transcript::{AuthorRole, TranscriptEntry},
};
