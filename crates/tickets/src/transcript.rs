use chrono::{DateTime, Utc};

/// Which side of the relay authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorRole {
    User,
    Staff,
}

/// One relayed message, ordered by arrival. Append-only until the ticket
/// closes, at which point the whole transcript is dropped.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub author_id: u64,
    pub author_name: String,
    pub role: AuthorRole,
    pub content: String,
    pub attachment_urls: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    #[must_use]
    pub fn new(
        author_id: u64,
        author_name: impl Into<String>,
        role: AuthorRole,
        content: impl Into<String>,
        attachment_urls: Vec<String>,
    ) -> Self {
        Self {
            author_id,
            author_name: author_name.into(),
            role,
            content: content.into(),
            attachment_urls,
            timestamp: Utc::now(),
        }
    }
}
