//! ISR subscription (creditor account) numbers.
//!
//! The same number appears in two shapes: the 9-digit scanline form
//! `010001628` and the printed form `01-162-8`, where the middle part
//! loses its padding zeros.

use crate::checksum::check_digit;
use crate::error::{Error, Result};

/// Width of the middle part in scanline form.
const MIDDLE_WIDTH: usize = 6;

/// Format a raw beneficiary slice as `<2 chars>-<middle as integer>-<last char>`.
///
/// The prefix and the final character are kept verbatim; only the middle
/// part is read as a number, which drops its leading zeros.
///
/// # Examples
///
/// ```
/// use isr_scan::subscription::format_beneficiary_account;
///
/// assert_eq!(format_beneficiary_account("010001628")?, "01-162-8");
/// # Ok::<(), isr_scan::Error>(())
/// ```
pub fn format_beneficiary_account(raw: &str) -> Result<String> {
    let chars: Vec<char> = raw.chars().collect();
    let len = chars.len();
    if len < 4 {
        return Err(Error::Format(raw.to_string()));
    }

    let prefix: String = chars[0..2].iter().collect();
    let middle: String = chars[2..len - 1].iter().collect();
    let suffix = chars[len - 1];

    if !middle.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Format(raw.to_string()));
    }
    let trimmed = middle.trim_start_matches('0');
    let middle = if trimmed.is_empty() { "0" } else { trimmed };

    Ok(format!("{}-{}-{}", prefix, middle, suffix))
}

/// Convert a subscription number to its 9-digit scanline form.
///
/// Dashes are removed and the middle part is left-padded to six digits:
/// `01-162-8` becomes `010001628`. Input already in scanline form is
/// returned unchanged.
pub fn to_scanline_form(subscription: &str) -> Result<String> {
    let compact: String = subscription.trim().chars().filter(|c| *c != '-').collect();
    let invalid = || Error::InvalidSubscription(subscription.to_string());

    if compact.len() < 3 || !compact.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let (prefix, rest) = compact.split_at(2);
    let (middle, check) = rest.split_at(rest.len() - 1);
    if middle.len() > MIDDLE_WIDTH {
        return Err(invalid());
    }

    Ok(format!("{}{:0>width$}{}", prefix, middle, check, width = MIDDLE_WIDTH))
}

/// Whether a subscription number carries a valid check digit.
pub fn is_valid_subscription(subscription: &str) -> bool {
    let Ok(scanline) = to_scanline_form(subscription) else {
        return false;
    };
    let (body, check) = scanline.split_at(scanline.len() - 1);
    match check_digit(body) {
        Ok(computed) => check == computed.to_string(),
        Err(_) => false,
    }
}
