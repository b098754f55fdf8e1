//! ISR Scan Library
//!
//! A library for decoding, validating, and building Swiss ISR/BVR payment
//! slip code lines.
//!
//! # Supported Layouts
//!
//! - **Standard ISR** (`01`, `03`, `21`): 53 characters with amount and three check digits
//! - **Postal ISR** (`01`, `03`): 42 characters, unchecked
//! - **ISR+** (`04`, `31`): 43 characters without amount, three check digits
//! - **Postal ISR, other** (`<`): 41 characters, unchecked
//!
//! # Features
//!
//! - Decode a scanned code line into amount, reference, adherent number,
//!   creditor account and currency
//! - Compute and verify modulo-10 recursive check digits
//! - Generate and format ISR references and subscription numbers
//! - Build printable code lines for payment slips
//! - Export decoded payments to CSV
//!
//! # Examples
//!
//! ## Decoding a scanned code line
//!
//! ```
//! use isr_scan::DecodedPayment;
//!
//! let payment: DecodedPayment = "0100003949753>120000000000234478943216899+ 010001628>".parse()?;
//! assert_eq!(payment.beneficiary_account, "01-162-8");
//! assert_eq!(payment.lookup_domain.as_str(), "adherent_number");
//! # Ok::<(), isr_scan::Error>(())
//! ```
//!
//! ## Exporting a batch to CSV
//!
//! ```no_run
//! use std::fs::File;
//! use isr_scan::csv_format::CsvPayments;
//! use isr_scan::isr_format::decode;
//!
//! let payments = vec![decode("042>904370000000000000007078109+ 010037882>")?];
//! let mut output = File::create("payments.csv")?;
//! CsvPayments { payments }.write_to(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod checksum;
pub mod subscription;
pub mod reference;
pub mod isr_format;
pub mod scanline;
pub mod csv_format;
pub mod scan;

use std::str::FromStr;

// Re-export commonly used types
pub use error::{Error, Result};
pub use isr_format::{classify, decode};
pub use types::{Currency, DecodedPayment, IsrVariant, LookupDomain};

/// Output formats of the command-line tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One CSV row per decoded payment
    Csv,
    /// Human-readable block per payment
    Text,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "text" | "txt" | "plain" => Ok(OutputFormat::Text),
            _ => Err(Error::ParseError(format!("unknown output format '{}'", s))),
        }
    }
}
