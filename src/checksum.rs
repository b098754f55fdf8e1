//! Swiss ISR/BVR check digits ("modulo 10, recursive").
//!
//! A running carry starts at zero; for each digit the carry becomes
//! `TABLE[(carry + digit) % 10]`. The check digit is `(10 - carry) % 10`.

use crate::error::{Error, Result};
use crate::types::ChecksumPart;

/// Permutation table of the recursive modulo-10 algorithm.
pub const TABLE: [u8; 10] = [0, 9, 4, 6, 8, 2, 7, 1, 3, 5];

/// Compute the check digit of a decimal digit string.
///
/// An empty string yields `0`. Any non-decimal character is rejected.
///
/// # Examples
///
/// ```
/// use isr_scan::checksum::check_digit;
///
/// assert_eq!(check_digit("010000394975")?, 3);
/// # Ok::<(), isr_scan::Error>(())
/// ```
pub fn check_digit(digits: &str) -> Result<u8> {
    let mut carry = 0u8;
    for c in digits.chars() {
        let digit = c
            .to_digit(10)
            .ok_or_else(|| Error::InvalidDigit(digits.to_string()))? as u8;
        carry = TABLE[((carry + digit) % 10) as usize];
    }
    Ok((10 - carry) % 10)
}

/// Append the check digit to a digit string.
pub fn append_check_digit(digits: &str) -> Result<String> {
    let check = check_digit(digits)?;
    Ok(format!("{}{}", digits, check))
}

/// A checked run of characters: `[start, end)` followed by its check digit at `check_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumSegment {
    pub part: ChecksumPart,
    pub start: usize,
    pub end: usize,
    pub check_at: usize,
}

impl ChecksumSegment {
    pub const fn new(part: ChecksumPart, start: usize, end: usize, check_at: usize) -> Self {
        Self {
            part,
            start,
            end,
            check_at,
        }
    }

    /// Verify this segment against a character buffer.
    ///
    /// Anything that keeps the segment from validating, a non-digit
    /// included, is reported as a checksum error for this part.
    pub fn verify(&self, chars: &[char]) -> Result<()> {
        let failed = || Error::Checksum(self.part);

        let digits: String = chars.get(self.start..self.end).ok_or_else(failed)?.iter().collect();
        let expected = chars
            .get(self.check_at)
            .and_then(|c| c.to_digit(10))
            .ok_or_else(failed)? as u8;

        match check_digit(&digits) {
            Ok(computed) if computed == expected => Ok(()),
            _ => Err(failed()),
        }
    }
}

/// Verify segments in order, stopping at the first failure.
pub fn verify_all(segments: &[ChecksumSegment], chars: &[char]) -> Result<()> {
    segments.iter().try_for_each(|segment| segment.verify(chars))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_check_digit_known_vectors() {
        assert_eq!(check_digit("").unwrap(), 0);
        assert_eq!(check_digit("01").unwrap(), 1);
        assert_eq!(check_digit("04").unwrap(), 2);
        assert_eq!(check_digit("010000394975").unwrap(), 3);
        assert_eq!(check_digit("12000000000023447894321689").unwrap(), 9);
        assert_eq!(check_digit("01000162").unwrap(), 8);
    }

    #[test]
    fn test_check_digit_is_order_sensitive() {
        assert_ne!(check_digit("12").unwrap(), check_digit("21").unwrap());
    }

    #[test]
    fn test_check_digit_range() {
        for n in 0..2000u32 {
            let digit = check_digit(&n.to_string()).unwrap();
            assert!(digit <= 9);
        }
    }

    #[test]
    fn test_check_digit_rejects_non_digits() {
        assert!(matches!(check_digit("12a4"), Err(Error::InvalidDigit(_))));
        assert!(matches!(check_digit("12 4"), Err(Error::InvalidDigit(_))));
    }

    #[test]
    fn test_append_check_digit() {
        assert_eq!(append_check_digit("01000162").unwrap(), "010001628");
    }

    #[test]
    fn test_segment_verify() {
        let segment = ChecksumSegment::new(ChecksumPart::Second, 0, 12, 12);
        assert!(segment.verify(&chars("0100003949753>")).is_ok());

        let err = segment.verify(&chars("0100003949754>")).unwrap_err();
        assert!(matches!(err, Error::Checksum(ChecksumPart::Second)));

        // Check position outside the buffer
        let err = segment.verify(&chars("010000394975")).unwrap_err();
        assert!(matches!(err, Error::Checksum(ChecksumPart::Second)));

        // Non-digit check character
        let err = segment.verify(&chars("010000394975>")).unwrap_err();
        assert!(matches!(err, Error::Checksum(ChecksumPart::Second)));
    }

    #[test]
    fn test_verify_all_reports_first_failure() {
        let segments = [
            ChecksumSegment::new(ChecksumPart::First, 0, 2, 2),
            ChecksumSegment::new(ChecksumPart::Second, 4, 6, 6),
        ];
        let bad_second = format!("042>99{}", (check_digit("99").unwrap() + 1) % 10);
        let err = verify_all(&segments, &chars(&bad_second)).unwrap_err();
        assert!(matches!(err, Error::Checksum(ChecksumPart::Second)));

        let err = verify_all(&segments, &chars("043>990")).unwrap_err();
        assert!(matches!(err, Error::Checksum(ChecksumPart::First)));
    }
}
