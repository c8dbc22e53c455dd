//! # Sanitization Module
//!
//! Pure input-normalization helpers shared by every screen that feeds the
//! transaction engine.
//!
//! ## Sanitization Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Input Boundaries                                   │
//! │                                                                         │
//! │  Keyboard input          This module               Engine               │
//! │  ──────────────          ───────────               ──────               │
//! │                                                                         │
//! │  "(11) 5555-0199" ─────► normalize_phone ────────► "1155550199"         │
//! │                                                                         │
//! │  "$1.234,50" / "12.5" ─► parse_amount ───────────► Money (cents)        │
//! │                                                                         │
//! │  "1,5" / "2" ──────────► parse_quantity ─────────► Quantity (millis)    │
//! │                                                                         │
//! │  phone + receipt text ─► messaging_links ────────► native + web URLs    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its input. The engine re-validates
//! at its own boundary, so these helpers never panic on garbage.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::form_urlencoded;

use crate::error::ValidationError;
use crate::money::{Money, Quantity};
use crate::PHONE_DIGITS;

// =============================================================================
// Phone Normalization
// =============================================================================

/// Strips everything but ASCII digits from a phone input.
///
/// ## Example
/// ```rust
/// use lealta_core::sanitize::normalize_phone;
///
/// assert_eq!(normalize_phone("(11) 5555-0199"), "1155550199");
/// assert_eq!(normalize_phone(" 11 5555 0199 "), "1155550199");
/// ```
pub fn normalize_phone(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Checks that a normalized phone has exactly the required digit count.
///
/// Callers must normalize first; this function does not strip formatting.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Amount Parsing
// =============================================================================

/// Parses a user-entered decimal amount into [`Money`].
///
/// ## Rules
/// - Accepts an optional leading `$`
/// - Accepts `,` or `.` as the decimal separator (whichever comes last)
/// - Other separator occurrences are treated as thousands grouping
/// - At most two decimal digits; more is a format error, not silent rounding
/// - Negative amounts are rejected
///
/// ## Example
/// ```rust
/// use lealta_core::sanitize::parse_amount;
///
/// assert_eq!(parse_amount("12.50").unwrap().cents(), 1250);
/// assert_eq!(parse_amount("$1.234,50").unwrap().cents(), 123_450);
/// assert_eq!(parse_amount("7").unwrap().cents(), 700);
/// assert!(parse_amount("-5").is_err());
/// ```
pub fn parse_amount(input: &str) -> Result<Money, ValidationError> {
    let (units, hundredths) = split_decimal(input, "amount", 2)?;
    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(hundredths))
        .ok_or_else(|| too_large("amount"))?;
    Ok(Money::from_cents(cents))
}

/// Parses a user-entered quantity into [`Quantity`] (milli-units).
///
/// Same separator rules as [`parse_amount`], up to three decimal digits,
/// and the result must be strictly positive.
pub fn parse_quantity(input: &str) -> Result<Quantity, ValidationError> {
    let (units, thousandths) = split_decimal(input, "quantity", 3)?;
    let millis = units
        .checked_mul(1000)
        .and_then(|m| m.checked_add(thousandths))
        .ok_or_else(|| too_large("quantity"))?;
    let qty = Quantity::from_milli(millis);
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(qty)
}

fn too_large(field: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "number too large".to_string(),
    }
}

/// Shared decimal splitter: returns (whole units, scaled fraction).
///
/// `scale` is the number of fraction digits the caller stores (2 for cents,
/// 3 for quantity millis).
fn split_decimal(input: &str, field: &str, scale: u32) -> Result<(i64, i64), ValidationError> {
    let trimmed = input.trim().trim_start_matches('$').trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if trimmed.starts_with('-') {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    // The last '.' or ',' is the decimal point; earlier ones are grouping.
    let decimal_pos = trimmed.rfind(['.', ',']);
    let (whole_part, frac_part) = match decimal_pos {
        Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
        None => (trimmed, ""),
    };

    let whole_digits: String = whole_part
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect();

    if !whole_digits.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
        || (whole_digits.is_empty() && frac_part.is_empty())
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a decimal number".to_string(),
        });
    }

    if frac_part.len() as u32 > scale {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("at most {} decimal places", scale),
        });
    }

    let units: i64 = if whole_digits.is_empty() {
        0
    } else {
        whole_digits.parse().map_err(|_| too_large(field))?
    };

    let mut fraction: i64 = if frac_part.is_empty() {
        0
    } else {
        // Safe: all digits, length <= 3
        frac_part.parse().unwrap_or(0)
    };
    for _ in frac_part.len() as u32..scale {
        fraction *= 10;
    }

    Ok((units, fraction))
}

// =============================================================================
// Messaging Deep Links
// =============================================================================

/// The pair of deep links the dispatcher tries, native first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MessagingLinks {
    /// `whatsapp://send?...`: opens the installed app directly.
    pub native: String,

    /// `https://wa.me/...`: browser fallback when the scheme fails.
    pub web: String,
}

/// Builds the native and web messaging links for a phone + message text.
///
/// The text is percent-encoded; the phone is assumed already normalized
/// (digits only). Country prefix handling lives with the caller because
/// it is market configuration, not sanitization.
///
/// ## Example
/// ```rust
/// use lealta_core::sanitize::messaging_links;
///
/// let links = messaging_links("5491155550199", "Total: $70.00");
/// assert_eq!(
///     links.native,
///     "whatsapp://send?phone=5491155550199&text=Total%3A%20%2470.00"
/// );
/// assert_eq!(links.web, "https://wa.me/5491155550199?text=Total%3A%20%2470.00");
/// ```
pub fn messaging_links(phone: &str, text: &str) -> MessagingLinks {
    let encoded: String = form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        // byte_serialize is form encoding; deep links want %20, not '+'
        .replace('+', "%20");

    MessagingLinks {
        native: format!("whatsapp://send?phone={}&text={}", phone, encoded),
        web: format!("https://wa.me/{}?text={}", phone, encoded),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
