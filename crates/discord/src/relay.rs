//! Outbound execution of routing decisions: send the display envelope to the
//! paired destination and append to the transcript.

use {
    serenity::all::{ChannelId, CreateMessage, Http, Message, UserId},
    tracing::warn,
};

use modmail_tickets::{AuthorRole, TranscriptEntry};

use crate::{Result, envelope::Envelope, state::ModmailState};

/// Relay a user's DM into their ticket channel.
///
/// The send happens before the transcript append so a failed send (e.g. the
/// channel was deleted out of band) leaves no phantom entry.
pub async fn forward_to_ticket(
    http: &Http,
    state: &ModmailState,
    msg: &Message,
    channel_id: u64,
) -> Result<()> {
    let urls = attachment_urls(msg);
    let envelope = Envelope::user_relay(&msg.author.tag(), &msg.author.face(), &msg.content, &urls);
    ChannelId::new(channel_id)
        .send_message(http, CreateMessage::new().embed(envelope.to_embed()))
        .await?;

    let entry = TranscriptEntry::new(
        msg.author.id.get(),
        msg.author.tag(),
        AuthorRole::User,
        msg.content.as_str(),
        urls,
    );
    if let Err(e) = state.registry().append_message(channel_id, entry) {
        warn!(channel_id, error = %e, "transcript append skipped");
    }
    Ok(())
}

/// Relay a staff message from a ticket channel to the owning user's DMs.
pub async fn forward_to_user(
    http: &Http,
    state: &ModmailState,
    msg: &Message,
    user_id: u64,
) -> Result<()> {
    let urls = attachment_urls(msg);
    let entry = TranscriptEntry::new(
        msg.author.id.get(),
        msg.author.tag(),
        AuthorRole::Staff,
        msg.content.as_str(),
        urls.clone(),
    );
    if let Err(e) = state.registry().append_message(msg.channel_id.get(), entry) {
        warn!(channel_id = msg.channel_id.get(), error = %e, "transcript append skipped");
    }

    let envelope = Envelope::staff_relay(&msg.author.tag(), &msg.author.face(), &msg.content, &urls);
    let dm = UserId::new(user_id).create_dm_channel(http).await?;
    dm.id
        .send_message(http, CreateMessage::new().embed(envelope.to_embed()))
        .await?;
    Ok(())
}

#[must_use]
pub fn attachment_urls(msg: &Message) -> Vec<String> {
    msg.attachments.iter().map(|a| a.url.clone()).collect()
}
