use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use crate::{Error, Result};

/// Environment variable holding the bot token (required).
pub const ENV_TOKEN: &str = "MODMAIL_TOKEN";
/// Environment variable holding the guild id (required).
pub const ENV_GUILD_ID: &str = "MODMAIL_GUILD_ID";
/// Environment variable holding the staff role id (optional).
pub const ENV_STAFF_ROLE_ID: &str = "MODMAIL_STAFF_ROLE_ID";
/// Environment variable holding the ticket category id (optional).
pub const ENV_CATEGORY_ID: &str = "MODMAIL_CATEGORY_ID";

/// Runtime configuration, read once at startup.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModmailConfig {
    /// Bot token from the Discord developer portal.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Guild that hosts the ticket channels.
    pub guild_id: u64,

    /// Role granted access to ticket channels and the close command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_role_id: Option<u64>,

    /// Category the ticket channels are created under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
}

impl std::fmt::Debug for ModmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModmailConfig")
            .field("token", &"[REDACTED]")
            .field("guild_id", &self.guild_id)
            .field("staff_role_id", &self.staff_role_id)
            .field("category_id", &self.category_id)
            .finish()
    }
}

impl Default for ModmailConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            guild_id: 0,
            staff_role_id: None,
            category_id: None,
        }
    }
}

impl ModmailConfig {
    /// Read configuration from the environment. Token and guild id are
    /// required; the staff role and category are optional.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(ENV_TOKEN)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::config(format!("{ENV_TOKEN} is not set")))?;
        let guild_id = match std::env::var(ENV_GUILD_ID) {
            Ok(raw) => parse_id(ENV_GUILD_ID, &raw)?,
            Err(_) => return Err(Error::config(format!("{ENV_GUILD_ID} is not set"))),
        };

        Ok(Self {
            token: Secret::new(token),
            guild_id,
            staff_role_id: optional_id(ENV_STAFF_ROLE_ID)?,
            category_id: optional_id(ENV_CATEGORY_ID)?,
        })
    }

    #[must_use]
    pub fn expose_token(&self) -> &str {
        self.token.expose_secret()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn parse_id(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .ok()
        // Snowflakes are never zero, and zero panics in serenity's id types.
        .filter(|id| *id != 0)
        .ok_or_else(|| Error::config(format!("{name} is not a valid id: {raw:?}")))
}

fn optional_id(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => parse_id(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}
