//! Ticket channel naming.

use modmail_tickets::TICKET_PREFIX;

/// Derive a ticket channel name from a user's name and id.
///
/// Keeps ASCII alphanumerics plus hyphen/underscore, lowercased, and appends
/// the low digits of the user id as a uniqueness suffix.
#[must_use]
pub fn ticket_channel_name(user_name: &str, user_id: u64) -> String {
    let safe: String = user_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect::<String>()
        .to_lowercase();
    let safe = if safe.is_empty() { "user" } else { safe.as_str() };
    format!("{TICKET_PREFIX}{safe}-{:04}", user_id % 10_000)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Alice", 11_234, "ticket-alice-1234")]
    #[case("bob_the-helper", 7, "ticket-bob_the-helper-0007")]
    #[case("UPPER CASE", 12, "ticket-uppercase-0012")]
    #[case("Ünïcode Nàme!", 42, "ticket-ncodenme-0042")]
    #[case("日本語", 5, "ticket-user-0005")]
    fn sanitizes_display_names(#[case] name: &str, #[case] id: u64, #[case] expected: &str) {
        assert_eq!(ticket_channel_name(name, id), expected);
    }

    #[test]
    fn always_carries_the_ticket_prefix() {
        assert!(ticket_channel_name("", 0).starts_with(TICKET_PREFIX));
    }
}
