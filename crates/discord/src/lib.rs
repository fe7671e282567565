//! Discord glue for the modmail relay.
//!
//! Wraps serenity 0.12: gateway event handling, ticket channel lifecycle,
//! slash commands, and the embed display envelope. Routing decisions live in
//! `modmail-tickets`; this crate executes them against the Discord API.

pub mod commands;
pub mod config;
pub mod envelope;
pub mod handler;
pub mod lifecycle;
pub mod naming;
pub mod relay;
pub mod state;

pub use {config::ModmailConfig, handler::ModmailHandler, state::ModmailState};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Discord(#[from] serenity::Error),

    #[error(transparent)]
    Registry(#[from] modmail_tickets::Error),

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// Discord JSON error codes consumed by the recovery paths.
const UNKNOWN_CHANNEL: isize = 10003;
const CANNOT_DM_USER: isize = 50007;

/// True when the error is Discord's "Unknown Channel": the ticket channel was
/// deleted out of band and the registry entry is stale.
#[must_use]
pub fn is_unknown_channel(err: &serenity::Error) -> bool {
    discord_error_code(err) == Some(UNKNOWN_CHANNEL)
}

/// True when the error is Discord's "Cannot send messages to this user": the
/// recipient has DMs disabled or blocked the bot.
#[must_use]
pub fn is_cannot_dm(err: &serenity::Error) -> bool {
    discord_error_code(err) == Some(CANNOT_DM_USER)
}

fn discord_error_code(err: &serenity::Error) -> Option<isize> {
    match err {
        serenity::Error::Http(serenity::http::HttpError::UnsuccessfulRequest(response)) => {
            Some(response.error.code)
        },
        _ => None,
    }
}
