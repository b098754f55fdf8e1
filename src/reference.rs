//! ISR payment references.
//!
//! A structured ISR reference is 27 digits: 26 payload digits followed by
//! their check digit. Shorter references exist on old slips but are treated
//! as unstructured.

use crate::checksum::{append_check_digit, check_digit};
use crate::error::{Error, Result};

/// Digits in a structured reference, check digit included.
pub const REFERENCE_LEN: usize = 27;

const GROUP_SIZE: usize = 5;

/// Whether `text` is a structured ISR reference.
///
/// Spaces are ignored so printed references are accepted too.
///
/// # Examples
///
/// ```
/// use isr_scan::reference::is_isr_reference;
///
/// assert!(is_isr_reference("132000000000000000000000014"));
/// assert!(!is_isr_reference("132000000000004"));
/// ```
pub fn is_isr_reference(text: &str) -> bool {
    let compact = compact(text);
    if compact.len() != REFERENCE_LEN || !compact.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let (payload, check) = compact.split_at(REFERENCE_LEN - 1);
    matches!(check_digit(payload), Ok(computed) if check == computed.to_string())
}

/// Build a structured reference from a bank prefix and a document number.
///
/// Only the digits of `number` are kept; they are left-padded with zeros so
/// that prefix and number fill 26 digits, then the check digit is appended.
pub fn generate_reference(prefix: &str, number: &str) -> Result<String> {
    if !prefix.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidReference(format!("bank prefix '{}' is not numeric", prefix)));
    }
    let width = (REFERENCE_LEN - 1)
        .checked_sub(prefix.len())
        .ok_or_else(|| Error::InvalidReference(format!("bank prefix '{}' is too long", prefix)))?;

    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > width {
        return Err(Error::InvalidReference(format!(
            "'{}' does not fit in {} digits",
            number, width
        )));
    }

    append_check_digit(&format!("{}{:0>width$}", prefix, digits, width = width))
}

/// Group a reference in blocks of five digits from the right.
///
/// ```
/// use isr_scan::reference::format_reference;
///
/// assert_eq!(
///     format_reference("120000000000234478943216899"),
///     "12 00000 00000 23447 89432 16899"
/// );
/// ```
pub fn format_reference(reference: &str) -> String {
    let chars: Vec<char> = compact(reference).chars().collect();
    let head = chars.len() % GROUP_SIZE;

    let mut groups: Vec<String> = Vec::new();
    if head > 0 {
        groups.push(chars[..head].iter().collect());
    }
    for chunk in chars[head..].chunks(GROUP_SIZE) {
        groups.push(chunk.iter().collect());
    }
    groups.join(" ")
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_isr_reference() {
        assert!(is_isr_reference("132000000000000000000000014"));
        assert!(is_isr_reference("120000000000234478943216899"));
        assert!(is_isr_reference("12 00000 00000 23447 89432 16899"));
    }

    #[test]
    fn test_is_isr_reference_rejects() {
        // Right length, wrong check digit
        assert!(!is_isr_reference("132000000000000000000000015"));
        // 15 positions are unstructured
        assert!(!is_isr_reference("132000000000004"));
        assert!(!is_isr_reference("Not a ISR ref with 27 chars"));
        assert!(!is_isr_reference(""));
    }

    #[test]
    fn test_generate_reference() {
        let reference = generate_reference("", "INV/2024/0042").unwrap();
        assert_eq!(reference.len(), REFERENCE_LEN);
        assert!(reference.starts_with("00000000000000000020240042"));
        assert!(is_isr_reference(&reference));

        let reference = generate_reference("1320", "1").unwrap();
        assert_eq!(&reference[..4], "1320");
        assert_eq!(&reference[4..26], "0000000000000000000001");
        assert!(is_isr_reference(&reference));
    }

    #[test]
    fn test_generate_reference_rejects() {
        assert!(matches!(generate_reference("1a", "1"), Err(Error::InvalidReference(_))));
        assert!(matches!(
            generate_reference("123456789012345678901234567", "1"),
            Err(Error::InvalidReference(_))
        ));
        assert!(matches!(
            generate_reference("1234567890", "12345678901234567"),
            Err(Error::InvalidReference(_))
        ));
    }

    #[test]
    fn test_format_reference() {
        assert_eq!(format_reference("132000000000004"), "13200 00000 00004");
        assert_eq!(format_reference("12 0000000000 23447894321 6899"), "12 00000 00000 23447 89432 16899");
        assert_eq!(format_reference(""), "");
    }
}
