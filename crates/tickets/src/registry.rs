//! In-memory bijective mapping between users and their open ticket channels.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    error::{Error, Result},
    transcript::TranscriptEntry,
};

/// Platform user identifier.
pub type UserId = u64;
/// Platform channel identifier.
pub type ChannelId = u64;

/// The pairing of a user and a dedicated channel used to relay a support
/// conversation.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub created_at: DateTime<Utc>,
    pub transcript: Vec<TranscriptEntry>,
}

/// Registry of all live tickets.
///
/// Owns every `Ticket` for its lifetime. A forward map keys tickets by user;
/// a reverse index maps channels back to users. Invariants: at most one open
/// ticket per user, and the user↔channel mapping is bijective within the
/// active set. Tickets live until explicitly closed — there is no expiry.
#[derive(Debug, Default)]
pub struct TicketRegistry {
    tickets: HashMap<UserId, Ticket>,
    by_channel: HashMap<ChannelId, UserId>,
}

impl TicketRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel of the user's open ticket, if any.
    #[must_use]
    pub fn lookup_by_user(&self, user_id: UserId) -> Option<ChannelId> {
        self.tickets.get(&user_id).map(|t| t.channel_id)
    }

    /// Owning user of a live ticket channel, if any.
    #[must_use]
    pub fn lookup_by_channel(&self, channel_id: ChannelId) -> Option<UserId> {
        self.by_channel.get(&channel_id).copied()
    }

    /// Register a new ticket for `user_id` on `channel_id`.
    ///
    /// Fails if the user already has a live ticket. Channel creation is not
    /// transactional with this mutation, so callers check `lookup_by_user`
    /// before creating the channel; this guard is the backstop for the
    /// DM-burst race.
    pub fn open(&mut self, user_id: UserId, channel_id: ChannelId) -> Result<()> {
        if let Some(existing) = self.tickets.get(&user_id) {
            return Err(Error::AlreadyOpen {
                user_id,
                channel_id: existing.channel_id,
            });
        }
        self.tickets.insert(user_id, Ticket {
            user_id,
            channel_id,
            created_at: Utc::now(),
            transcript: Vec::new(),
        });
        self.by_channel.insert(channel_id, user_id);
        Ok(())
    }

    /// Remove the user's ticket, discarding its transcript.
    pub fn close(&mut self, user_id: UserId) -> Result<Ticket> {
        let ticket = self
            .tickets
            .remove(&user_id)
            .ok_or(Error::NoOpenTicket { user_id })?;
        self.by_channel.remove(&ticket.channel_id);
        Ok(ticket)
    }

    /// Remove whichever ticket owns `channel_id`, returning its user.
    ///
    /// Used when closing by channel and when evicting a stale entry after the
    /// channel was deleted out of band.
    pub fn remove_by_channel(&mut self, channel_id: ChannelId) -> Option<UserId> {
        let user_id = self.by_channel.remove(&channel_id)?;
        self.tickets.remove(&user_id);
        Some(user_id)
    }

    /// Append an entry to the transcript of the ticket owning `channel_id`.
    pub fn append_message(&mut self, channel_id: ChannelId, entry: TranscriptEntry) -> Result<()> {
        let user_id = *self
            .by_channel
            .get(&channel_id)
            .ok_or(Error::UnknownChannel { channel_id })?;
        if let Some(ticket) = self.tickets.get_mut(&user_id) {
            ticket.transcript.push(entry);
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, user_id: UserId) -> Option<&Ticket> {
        self.tickets.get(&user_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::AuthorRole;

    fn entry(author_id: u64, content: &str) -> TranscriptEntry {
        TranscriptEntry::new(author_id, "alice", AuthorRole::User, content, Vec::new())
    }

    #[test]
    fn open_and_lookup_both_directions() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        assert_eq!(registry.lookup_by_user(1), Some(100));
        assert_eq!(registry.lookup_by_channel(100), Some(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn second_open_for_same_user_fails_without_side_effects() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        let err = registry.open(1, 200).expect_err("second open must fail");
        assert_eq!(err, Error::AlreadyOpen {
            user_id: 1,
            channel_id: 100,
        });

        // Original mapping intact, surplus channel never indexed.
        assert_eq!(registry.lookup_by_user(1), Some(100));
        assert_eq!(registry.lookup_by_channel(200), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn bijection_holds_across_many_tickets() {
        let mut registry = TicketRegistry::new();
        for user in 1..=10u64 {
            registry.open(user, user * 100).expect("open");
        }

        for user in 1..=10u64 {
            let channel = registry.lookup_by_user(user).expect("channel");
            assert_eq!(registry.lookup_by_channel(channel), Some(user));
        }
    }

    #[test]
    fn close_removes_mapping_and_returns_transcript() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");
        registry.append_message(100, entry(1, "need help")).expect("append");

        let ticket = registry.close(1).expect("close");
        assert_eq!(ticket.channel_id, 100);
        assert_eq!(ticket.transcript.len(), 1);

        assert_eq!(registry.lookup_by_user(1), None);
        assert_eq!(registry.lookup_by_channel(100), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn close_without_ticket_is_a_guarded_no_op() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        let err = registry.close(2).expect_err("no ticket for user 2");
        assert_eq!(err, Error::NoOpenTicket { user_id: 2 });

        // Unrelated ticket untouched.
        assert_eq!(registry.lookup_by_user(1), Some(100));
    }

    #[test]
    fn reopen_after_close_is_allowed() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");
        registry.close(1).expect("close");
        registry.open(1, 200).expect("reopen");

        assert_eq!(registry.lookup_by_user(1), Some(200));
        assert_eq!(registry.lookup_by_channel(100), None);
    }

    #[test]
    fn remove_by_channel_evicts_stale_entry() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");

        assert_eq!(registry.remove_by_channel(100), Some(1));
        assert_eq!(registry.lookup_by_user(1), None);
        assert_eq!(registry.remove_by_channel(100), None);
    }

    #[test]
    fn append_to_unknown_channel_fails() {
        let mut registry = TicketRegistry::new();
        let err = registry
            .append_message(999, entry(1, "hello"))
            .expect_err("no such ticket channel");
        assert_eq!(err, Error::UnknownChannel { channel_id: 999 });
    }

    #[test]
    fn append_preserves_arrival_order() {
        let mut registry = TicketRegistry::new();
        registry.open(1, 100).expect("open");
        registry.append_message(100, entry(1, "first")).expect("append");
        registry.append_message(100, entry(42, "second")).expect("append");

        let ticket = registry.get(1).expect("ticket");
        let contents: Vec<&str> = ticket
            .transcript
            .iter()
            .map(|e| e.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "second"]);
    }
}
