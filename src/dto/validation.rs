//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest channel or participant identifier accepted from the chat platform.
pub const MAX_CHAT_ID_LENGTH: usize = 64;

/// Validates a chat platform identifier (channel or participant).
///
/// # Examples
///
/// ```ignore
/// validate_chat_id("C024BE91L")  // Ok
/// validate_chat_id("")           // Err - empty
/// validate_chat_id("U 12")       // Err - whitespace
/// ```
pub fn validate_chat_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_CHAT_ID_LENGTH {
        let mut err = ValidationError::new("chat_id_length");
        err.message = Some(
            format!(
                "Identifier must be between 1 and {MAX_CHAT_ID_LENGTH} characters (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '/')
    {
        let mut err = ValidationError::new("chat_id_format");
        err.message =
            Some("Identifier must not contain whitespace, control characters or '/'".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_chat_id_valid() {
        assert!(validate_chat_id("C024BE91L").is_ok());
        assert!(validate_chat_id("general").is_ok());
        assert!(validate_chat_id("user-42_b").is_ok());
    }

    #[test]
    fn test_validate_chat_id_invalid_length() {
        assert!(validate_chat_id("").is_err()); // empty
        assert!(validate_chat_id(&"x".repeat(MAX_CHAT_ID_LENGTH + 1)).is_err()); // too long
        assert!(validate_chat_id(&"x".repeat(MAX_CHAT_ID_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_chat_id_invalid_format() {
        assert!(validate_chat_id("U 12").is_err()); // space
        assert!(validate_chat_id("U\t12").is_err()); // tab
        assert!(validate_chat_id("a/b").is_err()); // path separator
    }
}
