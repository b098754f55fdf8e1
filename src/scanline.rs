//! Code line builder for printed payment slips.
//!
//! This is the inverse of [`crate::isr_format::decode`] for the two layouts
//! that carry check digits: the standard slip with an amount and the
//! amountless ISR+ slip.

use crate::checksum::append_check_digit;
use crate::error::{Error, Result};
use crate::reference::is_isr_reference;
use crate::subscription::{is_valid_subscription, to_scanline_form};
use crate::types::Currency;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Largest amount in hundredths that fits the 10-digit amount field.
const MAX_MINOR_UNITS: i64 = 9_999_999_999;

/// Data printed on one payment slip.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSlip {
    /// Amount to pay; `None` prints an ISR+ slip where the payer fills it in.
    pub amount: Option<Decimal>,

    /// 27-digit ISR reference, spaces allowed.
    pub reference: String,

    /// Subscription number, printed (`01-162-8`) or scanline form.
    pub subscription: String,

    pub currency: Currency,
}

impl PaymentSlip {
    /// Render the machine-readable code line.
    ///
    /// # Examples
    ///
    /// ```
    /// use isr_scan::scanline::PaymentSlip;
    /// use isr_scan::types::Currency;
    /// use rust_decimal::Decimal;
    ///
    /// let slip = PaymentSlip {
    ///     amount: Some(Decimal::new(394975, 2)),
    ///     reference: "12 00000 00000 23447 89432 16899".into(),
    ///     subscription: "01-162-8".into(),
    ///     currency: Currency::Chf,
    /// };
    /// assert_eq!(
    ///     slip.code_line()?,
    ///     "0100003949753>120000000000234478943216899+ 010001628>"
    /// );
    /// # Ok::<(), isr_scan::Error>(())
    /// ```
    pub fn code_line(&self) -> Result<String> {
        let reference: String = self.reference.chars().filter(|c| !c.is_whitespace()).collect();
        if !is_isr_reference(&reference) {
            return Err(Error::InvalidReference(self.reference.clone()));
        }
        if !is_valid_subscription(&self.subscription) {
            return Err(Error::InvalidSubscription(self.subscription.clone()));
        }
        let subscription = to_scanline_form(&self.subscription)?;

        let head = match self.amount {
            Some(amount) => {
                let type_code = match self.currency {
                    Currency::Chf => "01",
                    Currency::Eur => "21",
                };
                append_check_digit(&format!("{}{:010}", type_code, minor_units(amount)?))?
            }
            None => {
                let type_code = match self.currency {
                    Currency::Chf => "04",
                    Currency::Eur => "31",
                };
                append_check_digit(type_code)?
            }
        };

        Ok(format!("{}>{}+ {}>", head, reference, subscription))
    }
}

/// Convert an amount to hundredths, rejecting anything the slip cannot print.
fn minor_units(amount: Decimal) -> Result<i64> {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| Error::InvalidAmount(amount.to_string()))?;
    if amount.is_sign_negative() || !minor.fract().is_zero() {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    minor
        .to_i64()
        .filter(|units| *units <= MAX_MINOR_UNITS)
        .ok_or_else(|| Error::InvalidAmount(amount.to_string()))
}
