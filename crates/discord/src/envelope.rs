//! Display envelope: the structured wrapper around every message the bot
//! sends, converted to a Discord embed at the edge.
//!
//! Keeping the envelope as plain data lets tests assert on titles, colors,
//! and footers without building serenity types.

use serenity::all::{Colour, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, Timestamp};

/// Relayed user content and confirmations shown in blue.
pub const COLOR_USER: u32 = 0x3498DB;
/// Staff replies and success notices in green.
pub const COLOR_STAFF: u32 = 0x2ECC71;
/// Failure notices in red.
pub const COLOR_ERROR: u32 = 0xE74C3C;
/// Closure notices in orange.
pub const COLOR_CLOSED: u32 = 0xE67E22;
/// Staff instructions in gold.
pub const COLOR_NOTICE: u32 = 0xF1C40F;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeAuthor {
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A structured message wrapper: title, body, author line, color tag,
/// optional fields and footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub title: Option<String>,
    pub description: String,
    pub color: u32,
    pub author: Option<EnvelopeAuthor>,
    pub fields: Vec<EnvelopeField>,
    pub footer: Option<String>,
    pub timestamped: bool,
}

impl Envelope {
    fn new(color: u32, description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: description.into(),
            color,
            author: None,
            fields: Vec::new(),
            footer: None,
            timestamped: false,
        }
    }

    /// A user's message relayed into the ticket channel.
    #[must_use]
    pub fn user_relay(
        author_tag: &str,
        author_icon: &str,
        content: &str,
        attachment_urls: &[String],
    ) -> Self {
        let mut envelope = Self::new(COLOR_USER, content);
        envelope.author = Some(EnvelopeAuthor {
            name: format!("User: {author_tag}"),
            icon_url: author_icon.to_string(),
        });
        envelope.timestamped = true;
        envelope.with_attachments(attachment_urls)
    }

    /// A staff member's reply relayed to the user's DMs.
    #[must_use]
    pub fn staff_relay(
        author_tag: &str,
        author_icon: &str,
        content: &str,
        attachment_urls: &[String],
    ) -> Self {
        let mut envelope = Self::new(COLOR_STAFF, content);
        envelope.title = Some("Staff Response".into());
        envelope.author = Some(EnvelopeAuthor {
            name: format!("Staff: {author_tag}"),
            icon_url: author_icon.to_string(),
        });
        envelope.footer = Some("Reply to this message to continue the conversation".into());
        envelope.timestamped = true;
        envelope.with_attachments(attachment_urls)
    }

    /// Confirmation DMed to the user when their ticket is created.
    #[must_use]
    pub fn ticket_confirmation() -> Self {
        let mut envelope = Self::new(
            COLOR_STAFF,
            "Our staff team has been notified and will respond as soon as possible. \
             Please be patient and don't spam.",
        );
        envelope.title = Some("Thank you for contacting us!".into());
        envelope.footer = Some("You can continue to message here to add to your ticket".into());
        envelope
    }

    /// Welcome message posted into a freshly created ticket channel.
    #[must_use]
    pub fn channel_welcome(author_tag: &str, author_icon: &str, user_id: u64, created_at: &str) -> Self {
        let mut envelope = Self::new(
            COLOR_USER,
            format!("User ID: {user_id}\nCreated at: {created_at}"),
        );
        envelope.title = Some(format!("New ticket from {author_tag}"));
        envelope.author = Some(EnvelopeAuthor {
            name: author_tag.to_string(),
            icon_url: author_icon.to_string(),
        });
        envelope
    }

    /// How-to posted into the channel for staff.
    #[must_use]
    pub fn staff_instructions() -> Self {
        let mut envelope = Self::new(
            COLOR_NOTICE,
            "Just type in this channel to respond to the user. The user will receive \
             your messages via DM.\nUse `/close` to close this ticket.",
        );
        envelope.title = Some("Ticket Instructions".into());
        envelope
    }

    /// Closure notice posted into the ticket channel.
    #[must_use]
    pub fn closure_channel(closer_mention: &str) -> Self {
        let mut envelope = Self::new(
            COLOR_CLOSED,
            format!("This ticket has been closed by {closer_mention}."),
        );
        envelope.title = Some("Ticket Closed".into());
        envelope
    }

    /// Closure notice DMed to the ticket's owner.
    #[must_use]
    pub fn closure_user(closer_tag: &str, closer_icon: &str, closer_name: &str) -> Self {
        let mut envelope = Self::new(
            COLOR_CLOSED,
            format!("Your ticket has been closed by {closer_name}."),
        );
        envelope.title = Some("Ticket Closed".into());
        envelope.author = Some(EnvelopeAuthor {
            name: format!("Staff: {closer_tag}"),
            icon_url: closer_icon.to_string(),
        });
        envelope.footer = Some("Thank you for contacting us!".into());
        envelope.timestamped = true;
        envelope
    }

    /// DMed to the user when ticket creation fails.
    #[must_use]
    pub fn creation_error() -> Self {
        let mut envelope = Self::new(
            COLOR_ERROR,
            "Sorry, there was an error creating your ticket. Please try again later.",
        );
        envelope.title = Some("Error".into());
        envelope
    }

    /// Posted in the ticket channel when the user cannot be DMed.
    #[must_use]
    pub fn dm_blocked_error() -> Self {
        let mut envelope = Self::new(
            COLOR_ERROR,
            "Could not send message to user. They may have DMs disabled.",
        );
        envelope.title = Some("Error".into());
        envelope
    }

    /// Posted in the ticket channel on any other delivery failure.
    #[must_use]
    pub fn delivery_error(detail: &str) -> Self {
        let mut envelope = Self::new(
            COLOR_ERROR,
            format!("An error occurred while sending the message: {detail}"),
        );
        envelope.title = Some("Error".into());
        envelope
    }

    /// Static help response.
    #[must_use]
    pub fn help() -> Self {
        let mut envelope = Self::new(
            COLOR_USER,
            "A ticket system that lets users contact staff via DMs",
        );
        envelope.title = Some("ModMail Bot Help".into());
        envelope.fields = vec![
            EnvelopeField {
                name: "For Users".into(),
                value: "• Simply DM the bot to create a ticket\n\
                        • All your messages will be forwarded to staff\n\
                        • Staff responses will come to your DMs"
                    .into(),
                inline: false,
            },
            EnvelopeField {
                name: "For Staff".into(),
                value: "• Type in ticket channels to respond to users\n\
                        • Use `/close` to close tickets"
                    .into(),
                inline: false,
            },
            EnvelopeField {
                name: "Commands".into(),
                value: "• `/close [channel]` - Close a ticket (staff only)\n\
                        • `/help` - Show this help message"
                    .into(),
                inline: false,
            },
        ];
        envelope
    }

    fn with_attachments(mut self, urls: &[String]) -> Self {
        if !urls.is_empty() {
            self.fields.push(EnvelopeField {
                name: "Attachments".into(),
                value: urls.join("\n"),
                inline: false,
            });
        }
        self
    }

    /// Convert into a serenity embed builder.
    #[must_use]
    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .description(self.description.clone())
            .colour(Colour::new(self.color));
        if let Some(ref title) = self.title {
            embed = embed.title(title.clone());
        }
        if let Some(ref author) = self.author {
            embed = embed.author(CreateEmbedAuthor::new(author.name.clone()).icon_url(author.icon_url.clone()));
        }
        for field in &self.fields {
            embed = embed.field(field.name.clone(), field.value.clone(), field.inline);
        }
        if let Some(ref footer) = self.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer.clone()));
        }
        if self.timestamped {
            embed = embed.timestamp(Timestamp::now());
        }
        embed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_relay_carries_content_and_attachments() {
        let urls = vec!["https://cdn.example/a.png".to_string()];
        let envelope = Envelope::user_relay("alice#0", "https://cdn.example/face.png", "need help", &urls);

        assert_eq!(envelope.description, "need help");
        assert_eq!(envelope.color, COLOR_USER);
        let author = envelope.author.expect("author");
        assert_eq!(author.name, "User: alice#0");
        assert_eq!(envelope.fields.len(), 1);
        assert_eq!(envelope.fields[0].name, "Attachments");
        assert_eq!(envelope.fields[0].value, "https://cdn.example/a.png");
    }

    #[test]
    fn user_relay_without_attachments_has_no_field() {
        let envelope = Envelope::user_relay("alice#0", "icon", "hi", &[]);
        assert!(envelope.fields.is_empty());
    }

    #[test]
    fn staff_relay_is_visually_distinct_from_user_relay() {
        let staff = Envelope::staff_relay("mod#0", "icon", "we can help", &[]);
        let user = Envelope::user_relay("alice#0", "icon", "we can help", &[]);

        assert_ne!(staff.color, user.color);
        assert_eq!(staff.title.as_deref(), Some("Staff Response"));
        assert_eq!(
            staff.footer.as_deref(),
            Some("Reply to this message to continue the conversation")
        );
        assert!(staff.author.expect("author").name.starts_with("Staff: "));
        assert!(user.author.expect("author").name.starts_with("User: "));
    }

    #[test]
    fn closure_notices_name_the_closer() {
        let channel = Envelope::closure_channel("<@555>");
        assert!(channel.description.contains("<@555>"));
        assert_eq!(channel.color, COLOR_CLOSED);

        let user = Envelope::closure_user("mod#0", "icon", "mod");
        assert!(user.description.contains("mod"));
        assert_eq!(user.footer.as_deref(), Some("Thank you for contacting us!"));
    }

    #[test]
    fn channel_welcome_carries_identity_and_timestamp() {
        let envelope = Envelope::channel_welcome("alice#0", "icon", 42, "2026-08-25 12:00:00");
        assert_eq!(envelope.title.as_deref(), Some("New ticket from alice#0"));
        assert!(envelope.description.contains("User ID: 42"));
        assert!(envelope.description.contains("2026-08-25 12:00:00"));
    }

    #[test]
    fn help_lists_both_audiences_and_commands() {
        let envelope = Envelope::help();
        let names: Vec<&str> = envelope.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["For Users", "For Staff", "Commands"]);
        assert!(envelope.fields[2].value.contains("/close"));
    }

    #[test]
    fn error_envelopes_are_red() {
        assert_eq!(Envelope::creation_error().color, COLOR_ERROR);
        assert_eq!(Envelope::dm_blocked_error().color, COLOR_ERROR);
        assert_eq!(Envelope::delivery_error("boom").color, COLOR_ERROR);
        assert!(Envelope::delivery_error("boom").description.contains("boom"));
    }
}
