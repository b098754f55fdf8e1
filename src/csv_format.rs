//! CSV export and import of decoded payments.
//!
//! One row per decoded ISR string, with the columns a bank-account lookup or
//! invoice import needs.

use crate::error::{Error, Result};
use crate::types::{Currency, DecodedPayment, IsrVariant, LookupDomain};
use csv::{Reader, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;

/// A batch of decoded payments in CSV form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvPayments {
    /// The decoded payments, in input order.
    pub payments: Vec<DecodedPayment>,
}

/// CSV row structure.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    #[serde(rename = "type")]
    type_code: String,
    #[serde(alias = "Variant")]
    variant: IsrVariant,
    #[serde(alias = "Amount")]
    amount: String,
    #[serde(alias = "Currency")]
    currency: Currency,
    #[serde(alias = "Reference", default)]
    reference: String,
    #[serde(rename = "isr_number", alias = "adherent_number")]
    isr_number: String,
    #[serde(rename = "beneficiary_account", alias = "account")]
    beneficiary_account: String,
    #[serde(rename = "lookup_domain", alias = "domain")]
    lookup_domain: LookupDomain,
}

impl CsvPayments {
    /// Parse decoded payments from any source implementing `Read`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use isr_scan::csv_format::CsvPayments;
    ///
    /// let mut file = File::open("payments.csv")?;
    /// let batch = CsvPayments::from_read(&mut file)?;
    /// println!("{} payments", batch.payments.len());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut csv_reader = Reader::from_reader(reader);
        let mut payments = Vec::new();

        for result in csv_reader.deserialize() {
            let record: CsvRecord = result?;

            let amount = Decimal::from_str(record.amount.trim())
                .map_err(|_| Error::InvalidAmount(record.amount.clone()))?;

            payments.push(DecodedPayment {
                type_code: record.type_code,
                variant: record.variant,
                amount,
                reference: record.reference,
                isr_number: record.isr_number,
                beneficiary_account: record.beneficiary_account,
                currency: record.currency,
                lookup_domain: record.lookup_domain,
            });
        }

        Ok(CsvPayments { payments })
    }

    /// Write decoded payments to any destination implementing `Write`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use isr_scan::csv_format::CsvPayments;
    /// use isr_scan::isr_format::decode;
    ///
    /// let payment = decode("0100003949753>120000000000234478943216899+ 010001628>")?;
    /// let batch = CsvPayments { payments: vec![payment] };
    /// let mut file = File::create("payments.csv")?;
    /// batch.write_to(&mut file)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut csv_writer = Writer::from_writer(writer);

        for payment in &self.payments {
            let record = CsvRecord {
                type_code: payment.type_code.clone(),
                variant: payment.variant,
                amount: format!("{:.2}", payment.amount),
                currency: payment.currency,
                reference: payment.reference.clone(),
                isr_number: payment.isr_number.clone(),
                beneficiary_account: payment.beneficiary_account.clone(),
                lookup_domain: payment.lookup_domain,
            };

            csv_writer.serialize(record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
