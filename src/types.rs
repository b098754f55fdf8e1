//! Common types shared by the decoder, the builders and the scanning workflow.

use crate::error::Error;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel ISR number meaning "no adherent number on this slip".
pub const NO_ADHERENT_NUMBER: &str = "000000";

/// Encoding family of an ISR string, selected by type prefix and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsrVariant {
    /// Type `01`/`03`, 42 characters, no checksums.
    PostalInCHF,
    /// Type `01`/`03`/`21`, 53 characters, three checksums.
    StandardInCHF,
    /// Type `04`/`31` (ISR+), 43 characters, three checksums, no amount.
    PostalPlusInCHF,
    /// Leading `<`, 41 characters, no checksums.
    PostalOtherInCHF,
}

impl IsrVariant {
    /// Exact character count a string of this variant must have.
    pub fn required_len(&self) -> usize {
        match self {
            IsrVariant::PostalInCHF => 42,
            IsrVariant::StandardInCHF => 53,
            IsrVariant::PostalPlusInCHF => 43,
            IsrVariant::PostalOtherInCHF => 41,
        }
    }
}

impl fmt::Display for IsrVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IsrVariant::PostalInCHF => "postal ISR",
            IsrVariant::StandardInCHF => "standard ISR",
            IsrVariant::PostalPlusInCHF => "ISR+",
            IsrVariant::PostalOtherInCHF => "postal (other) ISR",
        };
        f.write_str(name)
    }
}

/// Currency of an ISR slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "CHF")]
    Chf,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Chf => "CHF",
            Currency::Eur => "EUR",
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CHF" => Ok(Currency::Chf),
            "EUR" => Ok(Currency::Eur),
            _ => Err(Error::InvalidCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which bank-account field a caller should match the beneficiary on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupDomain {
    /// No adherent number: match on the account number alone.
    #[serde(rename = "name")]
    Name,
    /// Match on account number and adherent number.
    #[serde(rename = "adherent_number")]
    AdherentNumber,
}

impl LookupDomain {
    /// Domain implied by an extracted ISR number.
    pub fn for_isr_number(isr_number: &str) -> Self {
        if isr_number == NO_ADHERENT_NUMBER {
            LookupDomain::Name
        } else {
            LookupDomain::AdherentNumber
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LookupDomain::Name => "name",
            LookupDomain::AdherentNumber => "adherent_number",
        }
    }
}

impl FromStr for LookupDomain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(LookupDomain::Name),
            "adherent_number" => Ok(LookupDomain::AdherentNumber),
            _ => Err(Error::ParseError(format!("unknown lookup domain '{}'", s))),
        }
    }
}

impl fmt::Display for LookupDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a checksum segment within its variant, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumPart {
    First,
    Second,
    Third,
}

impl fmt::Display for ChecksumPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChecksumPart::First => "first",
            ChecksumPart::Second => "second",
            ChecksumPart::Third => "third",
        };
        f.write_str(name)
    }
}

/// Structured result of decoding one ISR string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedPayment {
    /// Two-character type code as printed (`01`, `21`, `04`, `<0`, ...).
    pub type_code: String,

    /// Encoding family the string was decoded as.
    pub variant: IsrVariant,

    /// Amount in major units; zero for variants without an amount.
    pub amount: Decimal,

    /// Payment reference, may be empty.
    pub reference: String,

    /// Six-character adherent number or [`NO_ADHERENT_NUMBER`].
    pub isr_number: String,

    /// Creditor account formatted as `PP-N-C`.
    pub beneficiary_account: String,

    /// Slip currency.
    pub currency: Currency,

    /// Bank-account field the caller should match on.
    pub lookup_domain: LookupDomain,
}

impl DecodedPayment {
    /// Whether the slip carries an adherent number.
    pub fn has_adherent_number(&self) -> bool {
        self.lookup_domain == LookupDomain::AdherentNumber
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_from_str() {
        assert_eq!("CHF".parse::<Currency>().unwrap(), Currency::Chf);
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert!("USD".parse::<Currency>().is_err());
        assert_eq!(Currency::Eur.to_string(), "EUR");
    }

    #[test]
    fn test_lookup_domain_for_isr_number() {
        assert_eq!(LookupDomain::for_isr_number("000000"), LookupDomain::Name);
        assert_eq!(LookupDomain::for_isr_number("120000"), LookupDomain::AdherentNumber);
        assert_eq!(LookupDomain::for_isr_number(""), LookupDomain::AdherentNumber);
        assert_eq!("adherent_number".parse::<LookupDomain>().unwrap(), LookupDomain::AdherentNumber);
        assert_eq!(LookupDomain::Name.as_str(), "name");
    }

    #[test]
    fn test_has_adherent_number() {
        let mut payment = DecodedPayment {
            type_code: "01".into(),
            variant: IsrVariant::StandardInCHF,
            amount: Decimal::ZERO,
            reference: String::new(),
            isr_number: "120000".into(),
            beneficiary_account: "01-162-8".into(),
            currency: Currency::Chf,
            lookup_domain: LookupDomain::AdherentNumber,
        };
        assert!(payment.has_adherent_number());

        payment.isr_number = NO_ADHERENT_NUMBER.into();
        payment.lookup_domain = LookupDomain::for_isr_number(&payment.isr_number);
        assert!(!payment.has_adherent_number());
    }

    #[test]
    fn test_required_len() {
        assert_eq!(IsrVariant::PostalInCHF.required_len(), 42);
        assert_eq!(IsrVariant::StandardInCHF.required_len(), 53);
        assert_eq!(IsrVariant::PostalPlusInCHF.required_len(), 43);
        assert_eq!(IsrVariant::PostalOtherInCHF.required_len(), 41);
    }

    #[test]
    fn test_checksum_part_display() {
        assert_eq!(ChecksumPart::Third.to_string(), "third");
    }
}
