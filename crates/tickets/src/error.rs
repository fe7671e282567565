/// Crate-wide result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed registry errors. Call sites treat most of these as guarded no-ops
/// rather than failures worth escalating.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The user already has a live ticket; one open ticket per user.
    #[error("user {user_id} already has an open ticket on channel {channel_id}")]
    AlreadyOpen { user_id: u64, channel_id: u64 },

    /// The user has no live ticket to close.
    #[error("user {user_id} has no open ticket")]
    NoOpenTicket { user_id: u64 },

    /// The channel is not a live ticket channel.
    #[error("channel {channel_id} is not a live ticket channel")]
    UnknownChannel { channel_id: u64 },
}
