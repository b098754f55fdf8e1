//! Scanning workflow: turn a scanned ISR string into a supplier invoice.
//!
//! The decoder itself knows nothing about bank accounts or invoices. This
//! module wires a decoded payment to two injected collaborators, a
//! [`BankAccountLookup`] and an [`InvoiceFactory`], and reports whether an
//! invoice was created or the user has to supply the bank account first.

use crate::error::Result;
use crate::isr_format::decode;
use crate::types::{Currency, DecodedPayment, LookupDomain};
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;

/// Identifier of an invoice created by an [`InvoiceFactory`].
pub type InvoiceId = u64;

/// A partner bank account as known to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub id: u64,
    pub partner_id: u64,
    /// Subscription number in printed form (`01-162-8`).
    pub account_number: String,
    pub adherent_number: Option<String>,
}

/// Keys a lookup matches a bank account on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccountKey {
    pub account_number: String,
    /// Set only for the adherent-number domain.
    pub adherent_number: Option<String>,
}

impl BankAccountKey {
    pub fn for_payment(payment: &DecodedPayment) -> Self {
        let adherent_number = match payment.lookup_domain {
            LookupDomain::Name => None,
            LookupDomain::AdherentNumber => Some(payment.isr_number.clone()),
        };
        Self {
            account_number: payment.beneficiary_account.clone(),
            adherent_number,
        }
    }
}

/// Finds the bank account a payment is addressed to.
pub trait BankAccountLookup {
    /// Return at most one matching account.
    fn find(&self, key: &BankAccountKey) -> Option<BankAccount>;
}

/// Supplier invoice to be created from a scanned slip.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub partner_id: u64,
    pub bank_account_id: u64,
    pub journal_id: Option<u64>,
    pub invoice_date: NaiveDate,
    pub reference: String,
    pub amount: Decimal,
    pub currency: Currency,
}

/// Creates invoices from drafts.
pub trait InvoiceFactory {
    fn create(&mut self, draft: InvoiceDraft) -> Result<InvoiceId>;
}

/// Result of validating one scanned string.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// An invoice was created.
    InvoiceCreated {
        invoice: InvoiceId,
        /// Adherent number the caller should store on the user-selected account.
        adherent_number_to_record: Option<String>,
    },
    /// No bank account matched and none was selected.
    NeedExtraInfo(DecodedPayment),
}

/// Vec-backed [`BankAccountLookup`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryBankAccounts {
    accounts: Vec<BankAccount>,
}

impl InMemoryBankAccounts {
    pub fn new(accounts: Vec<BankAccount>) -> Self {
        Self { accounts }
    }

    pub fn add(&mut self, account: BankAccount) {
        self.accounts.push(account);
    }
}

impl BankAccountLookup for InMemoryBankAccounts {
    fn find(&self, key: &BankAccountKey) -> Option<BankAccount> {
        self.accounts
            .iter()
            .find(|account| {
                account.account_number == key.account_number
                    && match &key.adherent_number {
                        Some(number) => account.adherent_number.as_deref() == Some(number.as_str()),
                        None => true,
                    }
            })
            .cloned()
    }
}

/// State of one scanning session.
pub struct ScanWizard<L, F> {
    lookup: L,
    factory: F,
    journal_id: Option<u64>,
    partner_id: Option<u64>,
    selected_account: Option<BankAccount>,
}

impl<L: BankAccountLookup, F: InvoiceFactory> ScanWizard<L, F> {
    pub fn new(lookup: L, factory: F) -> Self {
        Self {
            lookup,
            factory,
            journal_id: None,
            partner_id: None,
            selected_account: None,
        }
    }

    /// Purchase journal the invoices are created in.
    pub fn with_journal(mut self, journal_id: u64) -> Self {
        self.journal_id = Some(journal_id);
        self
    }

    /// Bank account (and optionally partner) chosen by the user after a
    /// [`ScanOutcome::NeedExtraInfo`] round.
    pub fn select_account(&mut self, account: BankAccount, partner_id: Option<u64>) {
        self.selected_account = Some(account);
        self.partner_id = partner_id;
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Validate a scanned string with today's date as invoice date.
    pub fn validate(&mut self, raw: &str) -> Result<ScanOutcome> {
        self.validate_on(raw, chrono::Local::now().date_naive())
    }

    /// Validate a scanned string, dating the invoice `invoice_date`.
    pub fn validate_on(&mut self, raw: &str, invoice_date: NaiveDate) -> Result<ScanOutcome> {
        let payment = decode(raw)?;
        let key = BankAccountKey::for_payment(&payment);

        if let Some(account) = self.lookup.find(&key) {
            debug!("Found bank account {} for {}", account.id, key.account_number);
            let partner_id = account.partner_id;
            let invoice = self.create_invoice(&payment, &account, partner_id, invoice_date)?;
            return Ok(ScanOutcome::InvoiceCreated {
                invoice,
                adherent_number_to_record: None,
            });
        }

        if let Some(account) = self.selected_account.clone() {
            let partner_id = self.partner_id.unwrap_or(account.partner_id);
            let invoice = self.create_invoice(&payment, &account, partner_id, invoice_date)?;
            let adherent_number_to_record = payment
                .has_adherent_number()
                .then(|| payment.isr_number.clone());
            return Ok(ScanOutcome::InvoiceCreated {
                invoice,
                adherent_number_to_record,
            });
        }

        debug!("No bank account matches {}; extra information needed", key.account_number);
        Ok(ScanOutcome::NeedExtraInfo(payment))
    }

    fn create_invoice(
        &mut self,
        payment: &DecodedPayment,
        account: &BankAccount,
        partner_id: u64,
        invoice_date: NaiveDate,
    ) -> Result<InvoiceId> {
        let draft = InvoiceDraft {
            partner_id,
            bank_account_id: account.id,
            journal_id: self.journal_id,
            invoice_date,
            reference: payment.reference.clone(),
            amount: payment.amount,
            currency: payment.currency,
        };
        let invoice = self.factory.create(draft)?;
        info!(
            "Created supplier invoice {} for {} {} on account {}",
            invoice, payment.amount, payment.currency, account.account_number
        );
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    const STANDARD: &str = "0100003949753>120000000000234478943216899+ 010001628>";
    const NO_ADHERENT: &str = "0100000229509>000000013052001000111870316+ 010618955>";

    #[derive(Default)]
    struct RecordingFactory {
        drafts: Vec<InvoiceDraft>,
    }

    impl InvoiceFactory for RecordingFactory {
        fn create(&mut self, draft: InvoiceDraft) -> Result<InvoiceId> {
            self.drafts.push(draft);
            Ok(self.drafts.len() as InvoiceId)
        }
    }

    fn account(id: u64, number: &str, adherent: Option<&str>) -> BankAccount {
        BankAccount {
            id,
            partner_id: id * 10,
            account_number: number.into(),
            adherent_number: adherent.map(String::from),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_key_for_payment() {
        let key = BankAccountKey::for_payment(&decode(STANDARD).unwrap());
        assert_eq!(key.account_number, "01-162-8");
        assert_eq!(key.adherent_number.as_deref(), Some("120000"));

        let key = BankAccountKey::for_payment(&decode(NO_ADHERENT).unwrap());
        assert_eq!(key.adherent_number, None);
    }

    #[test]
    fn test_in_memory_lookup() {
        let mut accounts = InMemoryBankAccounts::new(vec![account(1, "01-162-8", Some("999999"))]);
        accounts.add(account(2, "01-162-8", Some("120000")));
        let key = BankAccountKey {
            account_number: "01-162-8".into(),
            adherent_number: Some("120000".into()),
        };
        assert_eq!(accounts.find(&key).map(|a| a.id), Some(2));

        let by_name = BankAccountKey {
            account_number: "01-162-8".into(),
            adherent_number: None,
        };
        assert_eq!(accounts.find(&by_name).map(|a| a.id), Some(1));

        let missing = BankAccountKey {
            account_number: "01-1-1".into(),
            adherent_number: None,
        };
        assert_eq!(accounts.find(&missing), None);
    }

    #[test]
    fn test_matching_account_creates_invoice() {
        let accounts = InMemoryBankAccounts::new(vec![account(7, "01-162-8", Some("120000"))]);
        let mut wizard = ScanWizard::new(accounts, RecordingFactory::default()).with_journal(3);

        let outcome = wizard.validate_on(STANDARD, date()).unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::InvoiceCreated {
                invoice: 1,
                adherent_number_to_record: None
            }
        );
        assert_eq!(
            wizard.factory().drafts,
            vec![InvoiceDraft {
                partner_id: 70,
                bank_account_id: 7,
                journal_id: Some(3),
                invoice_date: date(),
                reference: "120000000000234478943216899".into(),
                amount: Decimal::new(394975, 2),
                currency: Currency::Chf,
            }]
        );
    }

    #[test]
    fn test_unknown_account_needs_extra_info() {
        let mut wizard = ScanWizard::new(InMemoryBankAccounts::default(), RecordingFactory::default());

        let outcome = wizard.validate_on(STANDARD, date()).unwrap();
        match outcome {
            ScanOutcome::NeedExtraInfo(payment) => assert_eq!(payment.isr_number, "120000"),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(wizard.factory().drafts.is_empty());
    }

    #[test]
    fn test_selected_account_records_adherent_number() {
        let mut wizard = ScanWizard::new(InMemoryBankAccounts::default(), RecordingFactory::default());
        wizard.select_account(account(4, "01-162-8", None), Some(99));

        let outcome = wizard.validate_on(STANDARD, date()).unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::InvoiceCreated {
                invoice: 1,
                adherent_number_to_record: Some("120000".into())
            }
        );
        assert_eq!(wizard.factory().drafts[0].partner_id, 99);
        assert_eq!(wizard.factory().drafts[0].bank_account_id, 4);
    }

    #[test]
    fn test_selected_account_without_adherent_number() {
        let mut wizard = ScanWizard::new(InMemoryBankAccounts::default(), RecordingFactory::default());
        wizard.select_account(account(5, "01-61895-5", None), None);

        let outcome = wizard.validate_on(NO_ADHERENT, date()).unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::InvoiceCreated {
                invoice: 1,
                adherent_number_to_record: None
            }
        );
        // Falls back to the account's partner.
        assert_eq!(wizard.factory().drafts[0].partner_id, 50);
    }

    #[test]
    fn test_decode_errors_propagate() {
        let mut wizard = ScanWizard::new(InMemoryBankAccounts::default(), RecordingFactory::default());
        let err = wizard.validate_on("99garbage", date()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
