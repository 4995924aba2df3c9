//! Normalization and validation of raw chat guesses.

use thiserror::Error;

/// Reason a raw chat message was not accepted as a guess.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuessRejection {
    /// Message was empty once surrounding whitespace was removed.
    #[error("empty guess")]
    Empty,
    /// Message does not describe a finite real number.
    #[error("`{0}` is not a number")]
    NotANumber(String),
    /// Zero and negative bids are not valid.
    #[error("guess must be strictly positive (got {0})")]
    NonPositive(f64),
}

/// Replace comma decimal separators so `5,5` and `5.5` read the same.
pub fn normalize(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

/// Turn a raw chat message into a positive guess.
///
/// # Examples
///
/// ```ignore
/// parse_guess("3")    // Ok(3.0)
/// parse_guess("5,5")  // Ok(5.5)
/// parse_guess("0")    // Err(NonPositive)
/// parse_guess("{}")   // Err(NotANumber)
/// ```
pub fn parse_guess(raw: &str) -> Result<f64, GuessRejection> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return Err(GuessRejection::Empty);
    }

    let value = normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| GuessRejection::NotANumber(raw.trim().to_string()))?;

    if value <= 0.0 {
        return Err(GuessRejection::NonPositive(value));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_guess_integer() {
        assert_eq!(parse_guess("3"), Ok(3.0));
        assert_eq!(parse_guess(" 42 "), Ok(42.0));
    }

    #[test]
    fn test_parse_guess_decimal_separators() {
        assert_eq!(parse_guess("5,5"), Ok(5.5));
        assert_eq!(parse_guess("3.5"), Ok(3.5));
        assert_eq!(parse_guess("0,25"), Ok(0.25));
    }

    #[test]
    fn test_parse_guess_non_positive() {
        assert_eq!(parse_guess("-3"), Err(GuessRejection::NonPositive(-3.0)));
        assert_eq!(parse_guess("0"), Err(GuessRejection::NonPositive(0.0)));
        assert!(matches!(
            parse_guess("-0,0"),
            Err(GuessRejection::NonPositive(_))
        ));
    }

    #[test]
    fn test_parse_guess_invalid_text() {
        assert!(matches!(
            parse_guess("{}"),
            Err(GuessRejection::NotANumber(_))
        ));
        assert!(matches!(
            parse_guess("![]"),
            Err(GuessRejection::NotANumber(_))
        ));
        assert!(matches!(
            parse_guess("ten bucks"),
            Err(GuessRejection::NotANumber(_))
        ));
        assert_eq!(parse_guess("   "), Err(GuessRejection::Empty));
    }

    #[test]
    fn test_parse_guess_rejects_non_finite() {
        assert!(parse_guess("inf").is_err());
        assert!(parse_guess("NaN").is_err());
        assert!(parse_guess("1e400").is_err()); // overflows to infinity
    }

    #[test]
    fn test_parse_guess_multiple_separators() {
        assert!(parse_guess("1,000.5").is_err());
        assert!(parse_guess("1,5,5").is_err());
    }
}
