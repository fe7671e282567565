//! Ticket channel lifecycle: create on first contact, delete on close.

use std::time::Duration;

use {
    serenity::all::{
        ChannelId, ChannelType, CreateChannel, CreateMessage, GuildId, Http, Mentionable, Message,
        PermissionOverwrite, PermissionOverwriteType, Permissions, RoleId, User, UserId,
    },
    tracing::{info, warn},
};

use modmail_tickets::{AuthorRole, TranscriptEntry};

use crate::{
    Result, envelope::Envelope, naming::ticket_channel_name, relay::attachment_urls,
    state::ModmailState,
};

/// Delay between the closure notice and channel deletion, so the notice is
/// visible before the channel disappears.
pub const CLOSE_DELAY: Duration = Duration::from_secs(3);

/// Create a ticket for the author of `msg` (a DM with no open ticket).
///
/// On any failure the registry is left without an entry and the user gets an
/// error notice in their DMs.
pub async fn create_ticket(http: &Http, state: &ModmailState, msg: &Message) -> Result<()> {
    match try_create(http, state, msg).await {
        Ok(channel_id) => {
            info!(user_id = msg.author.id.get(), channel_id = channel_id.get(), "ticket created");
            Ok(())
        },
        Err(e) => {
            warn!(user_id = msg.author.id.get(), error = %e, "ticket creation failed");
            let notice = CreateMessage::new().embed(Envelope::creation_error().to_embed());
            if let Err(dm_err) = msg.author.direct_message(http, notice).await {
                warn!(
                    user_id = msg.author.id.get(),
                    error = %dm_err,
                    "could not report creation failure to user"
                );
            }
            Err(e)
        },
    }
}

async fn try_create(http: &Http, state: &ModmailState, msg: &Message) -> Result<ChannelId> {
    let cfg = &state.config;
    let author = &msg.author;
    let name = ticket_channel_name(&author.name, author.id.get());
    let reason = format!("Ticket created by {}", author.tag());

    // Default visibility denied; the bot gets read/write/manage, the staff
    // role (when configured) gets read/write.
    let mut overwrites = vec![PermissionOverwrite {
        allow: Permissions::empty(),
        deny: Permissions::VIEW_CHANNEL,
        kind: PermissionOverwriteType::Role(RoleId::new(cfg.guild_id)),
    }];
    if let Some(bot_id) = state.bot_user_id() {
        overwrites.push(PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL
                | Permissions::SEND_MESSAGES
                | Permissions::MANAGE_MESSAGES,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(UserId::new(bot_id)),
        });
    }
    if let Some(role_id) = cfg.staff_role_id {
        overwrites.push(PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(RoleId::new(role_id)),
        });
    }

    let mut builder = CreateChannel::new(name)
        .kind(ChannelType::Text)
        .permissions(overwrites)
        .audit_log_reason(&reason);
    if let Some(category_id) = cfg.category_id {
        builder = builder.category(ChannelId::new(category_id));
    }

    let channel = GuildId::new(cfg.guild_id).create_channel(http, builder).await?;
    let channel_id = channel.id;

    // The guard in `open` is the backstop for a DM burst racing two creates;
    // the loser leaves an orphaned channel behind, which is accepted.
    state.registry().open(author.id.get(), channel_id.get())?;

    let confirmation = CreateMessage::new().embed(Envelope::ticket_confirmation().to_embed());
    author.direct_message(http, confirmation).await?;

    let ticket_created_at = state
        .registry()
        .get(author.id.get())
        .map(|t| t.created_at)
        .unwrap_or_else(chrono::Utc::now);
    let welcome = Envelope::channel_welcome(
        &author.tag(),
        &author.face(),
        author.id.get(),
        &ticket_created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    channel_id
        .send_message(http, CreateMessage::new().embed(welcome.to_embed()))
        .await?;

    if !msg.content.is_empty() {
        let urls = attachment_urls(msg);
        let relayed = Envelope::user_relay(&author.tag(), &author.face(), &msg.content, &urls);
        channel_id
            .send_message(http, CreateMessage::new().embed(relayed.to_embed()))
            .await?;
        let entry = TranscriptEntry::new(
            author.id.get(),
            author.tag(),
            AuthorRole::User,
            msg.content.as_str(),
            urls,
        );
        if let Err(e) = state.registry().append_message(channel_id.get(), entry) {
            warn!(channel_id = channel_id.get(), error = %e, "transcript append skipped");
        }
    }

    channel_id
        .send_message(
            http,
            CreateMessage::new().embed(Envelope::staff_instructions().to_embed()),
        )
        .await?;

    Ok(channel_id)
}

/// Tear down a ticket channel: post the closure notice, notify the owning
/// user, drop the registry entry, then delete the channel after
/// [`CLOSE_DELAY`].
///
/// A ticket-named channel with no registry mapping is still torn down; only
/// the user notification is skipped.
pub async fn close_ticket(
    http: &Http,
    state: &ModmailState,
    channel_id: ChannelId,
    closer: &User,
) -> Result<()> {
    let notice = Envelope::closure_channel(&closer.id.mention().to_string());
    channel_id
        .send_message(http, CreateMessage::new().embed(notice.to_embed()))
        .await?;

    let ticket_user_id = state.registry().lookup_by_channel(channel_id.get());
    if let Some(user_id) = ticket_user_id {
        // A user with DMs disabled must not block the close.
        if let Err(e) = notify_user_of_closure(http, user_id, closer).await {
            warn!(user_id, error = %e, "could not DM closure notice");
        }
        let _ = state.registry().remove_by_channel(channel_id.get());
    }

    tokio::time::sleep(CLOSE_DELAY).await;

    let reason = format!("Ticket closed by {}", closer.tag());
    http.delete_channel(channel_id, Some(&reason)).await?;
    info!(channel_id = channel_id.get(), closer = %closer.tag(), "ticket closed");
    Ok(())
}

async fn notify_user_of_closure(http: &Http, user_id: u64, closer: &User) -> Result<()> {
    let envelope = Envelope::closure_user(&closer.tag(), &closer.face(), &closer.name);
    let dm = UserId::new(user_id).create_dm_channel(http).await?;
    dm.id
        .send_message(http, CreateMessage::new().embed(envelope.to_embed()))
        .await?;
    Ok(())
}
