//! Client-side checks for money movements before they reach the backend.

use crate::api::ApiError;

pub const CURRENCY: &str = "₹";
pub const MIN_WITHDRAWAL: u64 = 100;

pub fn format_amount(amount: u64) -> String {
    format!("{CURRENCY}{amount}")
}

/// Parses a whole-unit amount typed by the user.
pub fn parse_amount(input: &str) -> Result<u64, ApiError> {
    match input.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ApiError::Invalid("Please enter a valid amount".into())),
        Ok(n) => Ok(n),
    }
}

/// `balance` is `None` when the wallet has not loaded yet; the backend makes
/// the final call in that case.
pub fn validate_gift(input: &str, balance: Option<u64>) -> Result<u64, ApiError> {
    let amount = parse_amount(input)?;
    if let Some(balance) = balance
        && amount > balance
    {
        return Err(ApiError::Invalid("Insufficient balance".into()));
    }
    Ok(amount)
}

pub fn validate_withdrawal(amount: u64, balance: u64) -> Result<u64, ApiError> {
    if amount == 0 {
        return Err(ApiError::Invalid("Please enter a valid amount".into()));
    }
    if amount > balance {
        return Err(ApiError::Invalid("Insufficient balance".into()));
    }
    if amount < MIN_WITHDRAWAL {
        return Err(ApiError::Invalid(format!(
            "Minimum withdrawal amount is {}",
            format_amount(MIN_WITHDRAWAL)
        )));
    }
    Ok(amount)
}
