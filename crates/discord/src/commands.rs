//! Slash command surface: `/help` and `/close`.

use {
    serenity::all::{
        CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
        CreateInteractionResponse, CreateInteractionResponseMessage, ResolvedValue, RoleId,
    },
    tracing::{error, warn},
};

use modmail_tickets::TICKET_PREFIX;

use crate::{Result, envelope::Envelope, lifecycle, state::ModmailState};

/// Commands registered with the guild on ready.
#[must_use]
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("help").description("Learn how to use the ModMail bot"),
        CreateCommand::new("close")
            .description("Close a ticket")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "Ticket channel to close (defaults to the current channel)",
                )
                .required(false),
            ),
    ]
}

/// Dispatch one command interaction. Failures are logged and answered with a
/// generic notice where a response is still possible.
pub async fn handle_command(ctx: &Context, state: &ModmailState, command: CommandInteraction) {
    let result = match command.data.name.as_str() {
        "help" => handle_help(ctx, &command).await,
        "close" => handle_close(ctx, state, &command).await,
        other => {
            warn!(command = other, "ignoring unknown command");
            Ok(())
        },
    };

    if let Err(e) = result {
        error!(command = %command.data.name, error = %e, "command failed");
        let fallback = CreateInteractionResponseMessage::new()
            .content("An error occurred while processing your request.")
            .ephemeral(true);
        let _ = command
            .create_response(&ctx.http, CreateInteractionResponse::Message(fallback))
            .await;
    }
}

async fn handle_help(ctx: &Context, command: &CommandInteraction) -> Result<()> {
    let response = CreateInteractionResponseMessage::new()
        .embed(Envelope::help().to_embed())
        .ephemeral(true);
    command
        .create_response(&ctx.http, CreateInteractionResponse::Message(response))
        .await?;
    Ok(())
}

async fn handle_close(ctx: &Context, state: &ModmailState, command: &CommandInteraction) -> Result<()> {
    // Explicit channel option, else the invoking channel.
    let target = command
        .data
        .options()
        .iter()
        .find_map(|opt| match &opt.value {
            ResolvedValue::Channel(channel) if opt.name == "channel" => Some(channel.id),
            _ => None,
        })
        .unwrap_or(command.channel_id);

    // Fetch the channel to validate the ticket naming convention.
    let Some(guild_channel) = target.to_channel(&ctx.http).await?.guild() else {
        return respond_ephemeral(ctx, command, "This is not a ticket channel!").await;
    };
    if !guild_channel.name.starts_with(TICKET_PREFIX) {
        return respond_ephemeral(ctx, command, "This is not a ticket channel!").await;
    }

    if let Some(staff_role_id) = state.config.staff_role_id {
        let has_role = command
            .member
            .as_ref()
            .is_some_and(|member| member.roles.contains(&RoleId::new(staff_role_id)));
        if !has_role {
            return respond_ephemeral(ctx, command, "You don't have permission to close tickets!")
                .await;
        }
    }

    respond_ephemeral(ctx, command, "Closing ticket...").await?;
    lifecycle::close_ticket(&ctx.http, state, guild_channel.id, &command.user).await
}

async fn respond_ephemeral(ctx: &Context, command: &CommandInteraction, text: &str) -> Result<()> {
    let response = CreateInteractionResponseMessage::new()
        .content(text)
        .ephemeral(true);
    command
        .create_response(&ctx.http, CreateInteractionResponse::Message(response))
        .await?;
    Ok(())
}
