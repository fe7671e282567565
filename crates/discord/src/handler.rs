//! Gateway event handler for serenity.
//!
//! Converts each inbound Discord message into the platform-free event the
//! router classifies, then executes the resulting route.

use std::sync::Arc;

use {
    serenity::{
        all::{
            ActivityData, Context, CreateMessage, EventHandler, GatewayIntents, GuildId,
            Interaction, Message, ReactionType, Ready,
        },
        async_trait,
    },
    tracing::{debug, error, info, warn},
};

use modmail_tickets::{InboundMessage, MessageOrigin, Route, classify};

use crate::{
    Error, commands,
    envelope::Envelope,
    is_cannot_dm, is_unknown_channel, lifecycle, relay,
    state::ModmailState,
};

/// Handler for Discord gateway events.
pub struct ModmailHandler {
    state: Arc<ModmailState>,
}

impl ModmailHandler {
    #[must_use]
    pub fn new(state: Arc<ModmailState>) -> Self {
        Self { state }
    }

    /// Required gateway intents for the bot.
    #[must_use]
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// The platform-free view of an inbound message.
    fn inbound(msg: &Message) -> InboundMessage {
        let origin = match msg.guild_id {
            // The gateway payload carries no channel name; the router falls
            // back to registry membership.
            Some(_) => MessageOrigin::Channel {
                channel_id: msg.channel_id.get(),
                channel_name: None,
            },
            None => MessageOrigin::Direct,
        };
        InboundMessage {
            author_id: msg.author.id.get(),
            author_is_bot: msg.author.bot,
            origin,
            content: msg.content.clone(),
            attachment_urls: relay::attachment_urls(msg),
        }
    }

    async fn acknowledge(&self, ctx: &Context, msg: &Message) {
        let check = ReactionType::Unicode("\u{2705}".to_string());
        if let Err(e) = msg.react(&ctx.http, check).await {
            warn!(error = %e, "failed to acknowledge relayed message");
        }
    }
}

#[async_trait]
impl EventHandler for ModmailHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "connected to discord"
        );
        self.state.set_bot_user_id(ready.user.id.get());
        ctx.set_activity(Some(ActivityData::watching("DMs")));

        let guild = GuildId::new(self.state.config.guild_id);
        match guild.set_commands(&ctx.http, commands::definitions()).await {
            Ok(registered) => info!(count = registered.len(), "registered slash commands"),
            Err(e) => warn!(error = %e, "failed to register slash commands"),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let inbound = Self::inbound(&msg);
        let route = classify(&inbound, &self.state.registry());
        debug!(author_id = msg.author.id.get(), ?route, "classified inbound message");

        match route {
            Route::ForwardToTicket { channel_id } => {
                match relay::forward_to_ticket(&ctx.http, &self.state, &msg, channel_id).await {
                    Ok(()) => self.acknowledge(&ctx, &msg).await,
                    Err(Error::Discord(ref e)) if is_unknown_channel(e) => {
                        // Channel deleted out of band: evict the stale entry
                        // and start over with a fresh ticket.
                        warn!(
                            user_id = msg.author.id.get(),
                            channel_id, "ticket channel gone, recreating"
                        );
                        let _ = self.state.registry().remove_by_channel(channel_id);
                        if let Err(e) = lifecycle::create_ticket(&ctx.http, &self.state, &msg).await
                        {
                            error!(error = %e, "failed to recreate ticket");
                        }
                    },
                    Err(e) => {
                        error!(error = %e, channel_id, "failed to forward message into ticket");
                    },
                }
            },
            Route::OpenTicket => {
                if let Err(e) = lifecycle::create_ticket(&ctx.http, &self.state, &msg).await {
                    error!(error = %e, user_id = msg.author.id.get(), "failed to create ticket");
                }
            },
            Route::ForwardToUser { user_id } => {
                match relay::forward_to_user(&ctx.http, &self.state, &msg, user_id).await {
                    Ok(()) => self.acknowledge(&ctx, &msg).await,
                    Err(e) => {
                        warn!(error = %e, user_id, "failed to deliver staff reply");
                        let envelope = match e {
                            Error::Discord(ref err) if is_cannot_dm(err) => {
                                Envelope::dm_blocked_error()
                            },
                            other => Envelope::delivery_error(&other.to_string()),
                        };
                        let notice = CreateMessage::new().embed(envelope.to_embed());
                        if let Err(send_err) = msg.channel_id.send_message(&ctx.http, notice).await
                        {
                            error!(error = %send_err, "failed to post delivery error notice");
                        }
                    },
                }
            },
            Route::Ignore(reason) => {
                debug!(?reason, "not routed");
            },
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            commands::handle_command(&ctx, &self.state, command).await;
        }
    }
}
