use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// LINE channel access token.
///
/// Invariant: non-empty after trimming. The token is a secret; the `Debug`
/// impl redacts it so it cannot leak through structured logs.
pub struct ChannelToken(String);

impl ChannelToken {
    /// Field name used in error reports (`token`).
    pub const FIELD: &'static str = "token";

    /// Create a validated [`ChannelToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ChannelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChannelToken(***)")
    }
}

/// Maximum broadcast text length accepted by the LINE Messaging API.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Broadcast message text.
///
/// Invariant: non-empty after trimming. The original value (surrounding
/// whitespace included) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// JSON field name used by the LINE Messaging API (`text`).
    pub const FIELD: &'static str = "text";

    /// Create validated message text with the default length limit.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_limit(value, DEFAULT_MAX_TEXT_LENGTH)
    }

    /// Create validated message text with an explicit length limit.
    ///
    /// The limit counts characters, matching what the LINE API enforces for
    /// text message objects.
    pub fn with_limit(
        value: impl Into<String>,
        max_chars: usize,
    ) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let actual = value.chars().count();
        if actual > max_chars {
            return Err(ValidationError::TooLong {
                max: max_chars,
                actual,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_token_trims_and_rejects_empty() {
        let token = ChannelToken::new("  secret ").unwrap();
        assert_eq!(token.as_str(), "secret");
        assert!(ChannelToken::new("   ").is_err());
        assert!(ChannelToken::new("").is_err());
    }

    #[test]
    fn channel_token_debug_is_redacted() {
        let token = ChannelToken::new("secret").unwrap();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("secret"));
        assert_eq!(rendered, "ChannelToken(***)");
    }

    #[test]
    fn message_text_preserves_whitespace_and_rejects_blank() {
        let msg = MessageText::new(" hi ").unwrap();
        assert_eq!(msg.as_str(), " hi ");
        assert!(MessageText::new("  ").is_err());
        assert!(MessageText::new("").is_err());
    }

    #[test]
    fn message_text_enforces_length_limit_in_characters() {
        assert!(MessageText::with_limit("abcde", 5).is_ok());
        let err = MessageText::with_limit("abcdef", 5).unwrap_err();
        assert_eq!(err, ValidationError::TooLong { max: 5, actual: 6 });

        // Multi-byte characters count once each.
        assert!(MessageText::with_limit("あいうえお", 5).is_ok());
        assert!(MessageText::with_limit("あいうえおか", 5).is_err());
    }

    #[test]
    fn default_limit_matches_line_api() {
        let long = "a".repeat(DEFAULT_MAX_TEXT_LENGTH);
        assert!(MessageText::new(long.clone()).is_ok());
        assert!(MessageText::new(long + "a").is_err());
    }
}
