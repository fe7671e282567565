use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use modmail_tickets::TicketRegistry;

use crate::config::ModmailConfig;

/// Shared runtime state handed to the gateway handler.
pub struct ModmailState {
    pub config: ModmailConfig,
    /// Registry behind a std `Mutex`: every operation is a synchronous map
    /// lookup and the lock is never held across an `.await` point.
    registry: Mutex<TicketRegistry>,
    /// The bot's own user id, recorded on ready (0 = not yet known).
    bot_user_id: AtomicU64,
}

impl ModmailState {
    #[must_use]
    pub fn new(config: ModmailConfig) -> Self {
        Self {
            config,
            registry: Mutex::new(TicketRegistry::new()),
            bot_user_id: AtomicU64::new(0),
        }
    }

    /// Lock the ticket registry.
    pub fn registry(&self) -> MutexGuard<'_, TicketRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the bot's own user id once the gateway reports ready.
    pub fn set_bot_user_id(&self, id: u64) {
        self.bot_user_id.store(id, Ordering::Relaxed);
    }

    /// The bot's own user id, if the gateway has reported ready.
    #[must_use]
    pub fn bot_user_id(&self) -> Option<u64> {
        match self.bot_user_id.load(Ordering::Relaxed) {
            0 => None,
            id => Some(id),
        }
    }
}
