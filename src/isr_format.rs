//! ISR/BVR scanline decoder.
//!
//! Decoding runs in three steps: the string is classified by its type
//! prefix and length, the embedded check digits are validated, and the
//! payment fields are sliced out at fixed offsets.
//!
//! Offsets count characters of the trimmed string, separators included:
//!
//! ```text
//! 0100003949753>120000000000234478943216899+ 010001628>
//! ^^ type       ^ reference                  ^ subscription
//! ```

use crate::checksum::{verify_all, ChecksumSegment};
use crate::error::{Error, Result};
use crate::subscription::format_beneficiary_account;
use crate::types::{ChecksumPart, Currency, DecodedPayment, IsrVariant, LookupDomain, NO_ADHERENT_NUMBER};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::ops::Range;
use std::str::FromStr;

/// Outcome of the classification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub variant: IsrVariant,
    pub currency: Currency,
}

/// Fixed-offset field positions of one variant.
#[derive(Debug, Clone)]
struct FieldLayout {
    /// Minor-unit amount digits; `None` when the slip carries no amount.
    amount: Option<Range<usize>>,
    reference: Range<usize>,
    /// Adherent number; `None` means the sentinel `000000`.
    isr_number: Option<Range<usize>>,
    beneficiary: Range<usize>,
}

const STANDARD_SEGMENTS: [ChecksumSegment; 3] = [
    ChecksumSegment::new(ChecksumPart::First, 0, 12, 12),
    ChecksumSegment::new(ChecksumPart::Second, 14, 40, 40),
    ChecksumSegment::new(ChecksumPart::Third, 43, 51, 51),
];

const POSTAL_PLUS_SEGMENTS: [ChecksumSegment; 3] = [
    ChecksumSegment::new(ChecksumPart::First, 0, 2, 2),
    ChecksumSegment::new(ChecksumPart::Second, 4, 30, 30),
    ChecksumSegment::new(ChecksumPart::Third, 33, 41, 41),
];

impl IsrVariant {
    /// Checksum segments validated before extraction, in order.
    pub fn checksum_segments(&self) -> &'static [ChecksumSegment] {
        match self {
            IsrVariant::StandardInCHF => &STANDARD_SEGMENTS,
            IsrVariant::PostalPlusInCHF => &POSTAL_PLUS_SEGMENTS,
            IsrVariant::PostalInCHF | IsrVariant::PostalOtherInCHF => &[],
        }
    }

    fn layout(&self) -> FieldLayout {
        match self {
            IsrVariant::PostalInCHF => FieldLayout {
                amount: Some(2..12),
                reference: 14..30,
                isr_number: None,
                beneficiary: 32..41,
            },
            IsrVariant::StandardInCHF => FieldLayout {
                amount: Some(2..12),
                reference: 14..41,
                isr_number: Some(14..20),
                beneficiary: 43..52,
            },
            IsrVariant::PostalPlusInCHF => FieldLayout {
                amount: None,
                reference: 4..31,
                isr_number: Some(4..10),
                beneficiary: 33..42,
            },
            IsrVariant::PostalOtherInCHF => FieldLayout {
                amount: Some(7..16),
                reference: 18..33,
                isr_number: None,
                beneficiary: 34..40,
            },
        }
    }
}

/// Classify a trimmed ISR string by type prefix and length.
///
/// `01`/`03` at 42 characters is the postal layout; any other length with
/// those prefixes is routed to the standard layout, whose length check then
/// rejects it.
pub fn classify(isr: &str) -> Result<Classification> {
    let len = isr.chars().count();
    let prefix: String = isr.chars().take(2).collect();

    let (variant, currency) = match prefix.as_str() {
        "01" | "03" if len == IsrVariant::PostalInCHF.required_len() => {
            (IsrVariant::PostalInCHF, Currency::Chf)
        }
        "01" | "03" => (IsrVariant::StandardInCHF, Currency::Chf),
        "21" => (IsrVariant::StandardInCHF, Currency::Eur),
        "04" => (IsrVariant::PostalPlusInCHF, Currency::Chf),
        "31" => (IsrVariant::PostalPlusInCHF, Currency::Eur),
        _ if prefix.starts_with('<') && len == IsrVariant::PostalOtherInCHF.required_len() => {
            (IsrVariant::PostalOtherInCHF, Currency::Chf)
        }
        _ => {
            warn!("Unsupported ISR prefix '{}' with length {}", prefix, len);
            return Err(Error::UnsupportedFormat(prefix));
        }
    };

    Ok(Classification { variant, currency })
}

/// Decode a raw ISR string into a structured payment.
///
/// Leading and trailing whitespace is ignored; everything else, separators
/// included, must sit at the offsets of the detected variant.
///
/// # Examples
///
/// ```
/// use isr_scan::isr_format::decode;
/// use isr_scan::types::Currency;
///
/// let payment = decode("0100003949753>120000000000234478943216899+ 010001628>")?;
/// assert_eq!(payment.amount.to_string(), "3949.75");
/// assert_eq!(payment.isr_number, "120000");
/// assert_eq!(payment.beneficiary_account, "01-162-8");
/// assert_eq!(payment.currency, Currency::Chf);
/// # Ok::<(), isr_scan::Error>(())
/// ```
pub fn decode(raw: &str) -> Result<DecodedPayment> {
    let isr = raw.trim();
    let Classification { variant, currency } = classify(isr)?;
    debug!("Classified ISR string as {} ({})", variant, currency);

    let chars: Vec<char> = isr.chars().collect();
    let expected = variant.required_len();
    if chars.len() != expected {
        return Err(Error::MalformedInput {
            variant,
            expected,
            actual: chars.len(),
        });
    }

    if let Err(err) = verify_all(variant.checksum_segments(), &chars) {
        warn!("ISR checksum validation failed: {}", err);
        return Err(err);
    }
    debug!("Validated {} checksum segment(s)", variant.checksum_segments().len());

    let payment = extract(variant, currency, &chars)?;
    debug!(
        "Extracted ISR payment: amount {} {}, beneficiary {}",
        payment.amount, payment.currency, payment.beneficiary_account
    );
    Ok(payment)
}

fn extract(variant: IsrVariant, currency: Currency, chars: &[char]) -> Result<DecodedPayment> {
    let layout = variant.layout();

    let amount = match layout.amount {
        Some(range) => parse_minor_units(&slice(chars, range))?,
        None => Decimal::ZERO,
    };
    let isr_number = match layout.isr_number {
        Some(range) => slice(chars, range),
        None => NO_ADHERENT_NUMBER.to_string(),
    };
    let beneficiary_account = format_beneficiary_account(&slice(chars, layout.beneficiary))?;
    let lookup_domain = LookupDomain::for_isr_number(&isr_number);

    Ok(DecodedPayment {
        type_code: slice(chars, 0..2),
        variant,
        amount,
        reference: slice(chars, layout.reference),
        isr_number,
        beneficiary_account,
        currency,
        lookup_domain,
    })
}

/// Slice a character range; callers have checked the length.
fn slice(chars: &[char], range: Range<usize>) -> String {
    chars[range].iter().collect()
}

/// Read a run of digits as hundredths.
fn parse_minor_units(digits: &str) -> Result<Decimal> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidAmount(digits.to_string()));
    }
    let minor = digits
        .parse::<i64>()
        .map_err(|_| Error::InvalidAmount(digits.to_string()))?;
    Ok(Decimal::new(minor, 2))
}

impl FromStr for DecodedPayment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}
