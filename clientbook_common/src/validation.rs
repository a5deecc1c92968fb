//! Input validation shared by the store, the ledger and the CLI.

use crate::errors::ValidationError;
use crate::types::Amount;

/// **Basic input validation for a client's name**
///
/// Checks for:
/// - An empty (or all-whitespace) string.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(())
    }
}

/// **Basic input validation for a client's email**
///
/// Only emptiness is checked; the address format is not.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        Err(ValidationError::EmptyEmail)
    } else {
        Ok(())
    }
}

/// Rejects NaN and infinities, which would poison a `REAL` balance.
pub fn validate_finite(amount: Amount) -> Result<(), ValidationError> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteAmount)
    }
}

/// Amounts moved out of an account must be finite and strictly positive.
pub fn validate_positive(amount: Amount) -> Result<(), ValidationError> {
    validate_finite(amount)?;
    if amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_email() {
        assert!(validate_name("Alice").is_ok());
        assert_eq!(Err(ValidationError::EmptyName), validate_name("   "));
        assert!(validate_email("a@x.com").is_ok());
        assert_eq!(Err(ValidationError::EmptyEmail), validate_email(""));
    }

    #[test]
    fn positive_amounts() {
        assert!(validate_positive(0.01).is_ok());
        assert_eq!(
            Err(ValidationError::NonPositiveAmount(0.0)),
            validate_positive(0.0)
        );
        assert_eq!(
            Err(ValidationError::NonPositiveAmount(-5.0)),
            validate_positive(-5.0)
        );
        assert_eq!(
            Err(ValidationError::NonFiniteAmount),
            validate_positive(f64::NAN)
        );
    }

    #[test]
    fn finite_amounts_may_be_negative() {
        assert!(validate_finite(-10.0).is_ok());
        assert!(validate_finite(f64::INFINITY).is_err());
    }
}
