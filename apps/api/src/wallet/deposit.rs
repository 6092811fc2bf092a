//! Deposit wizard: a forward-only three-step EFT flow.
//!
//! `Amount -> EftDetails -> Processing`, then a settlement task logs a
//! *pending* deposit transaction (EFTs never credit the balance client-side;
//! crediting is an external settlement step). Dismissing the wizard aborts
//! the settlement task so a closed wizard can never mutate the session.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::errors::AppError;
use crate::money::{parse_amount, Cents};

/// Minimum accepted deposit: R 50.00.
pub const MIN_DEPOSIT_CENTS: Cents = 50_00;

/// Simulated EFT settlement latency.
pub const SETTLE_DELAY: Duration = Duration::from_millis(3000);

const REFERENCE_PREFIX: &str = "SEB-";

/// Remittance reference: fixed prefix plus six random digits, generated once
/// per wizard and stable for its lifetime.
pub fn new_reference<R: Rng>(rng: &mut R) -> String {
    format!("{REFERENCE_PREFIX}{}", rng.gen_range(100_000..1_000_000))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStep {
    Amount,
    EftDetails,
    Processing,
}

#[derive(Debug)]
pub struct DepositWizard {
    pub id: Uuid,
    pub step: DepositStep,
    pub amount_cents: Option<Cents>,
    pub reference: String,
    /// Handle for the pending settlement task, set once the wizard confirms.
    pub settlement: Option<AbortHandle>,
}

/// Serializable snapshot for handlers.
#[derive(Debug, Serialize)]
pub struct DepositWizardView {
    pub id: Uuid,
    pub step: DepositStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<Cents>,
    pub reference: String,
}

impl DepositWizard {
    pub fn begin() -> Self {
        DepositWizard {
            id: Uuid::new_v4(),
            step: DepositStep::Amount,
            amount_cents: None,
            reference: new_reference(&mut rand::thread_rng()),
            settlement: None,
        }
    }

    /// Amount step: non-numeric or below the minimum keeps the wizard on
    /// `Amount` with a validation error; otherwise advances to `EftDetails`.
    pub fn enter_amount(&mut self, raw: &str) -> Result<(), AppError> {
        if self.step != DepositStep::Amount {
            return Err(AppError::Validation(
                "Deposit is not awaiting an amount.".to_string(),
            ));
        }
        match parse_amount(raw) {
            Some(cents) if cents >= MIN_DEPOSIT_CENTS => {
                self.amount_cents = Some(cents);
                self.step = DepositStep::EftDetails;
                Ok(())
            }
            _ => Err(AppError::Validation("Minimum deposit is R 50.00".to_string())),
        }
    }

    /// "I have made the EFT": moves to `Processing` and hands back the
    /// (amount, reference) pair the settlement task needs.
    pub fn confirm_eft(&mut self) -> Result<(Cents, String), AppError> {
        if self.step != DepositStep::EftDetails {
            return Err(AppError::Validation(
                "Deposit is not awaiting EFT confirmation.".to_string(),
            ));
        }
        let amount = self
            .amount_cents
            .ok_or_else(|| AppError::Validation("Enter an amount first.".to_string()))?;
        self.step = DepositStep::Processing;
        Ok((amount, self.reference.clone()))
    }

    /// Cancels the wizard, aborting any pending settlement task.
    pub fn dismiss(self) {
        if let Some(handle) = self.settlement {
            handle.abort();
        }
    }

    pub fn view(&self) -> DepositWizardView {
        DepositWizardView {
            id: self.id,
            step: self.step,
            amount_cents: self.amount_cents,
            reference: self.reference.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let r = new_reference(&mut rng);
            let digits = r.strip_prefix("SEB-").expect("prefix");
            assert_eq!(digits.len(), 6);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_reference_stable_across_steps() {
        let mut w = DepositWizard::begin();
        let reference = w.reference.clone();
        w.enter_amount("100").unwrap();
        assert_eq!(w.reference, reference);
        w.confirm_eft().unwrap();
        assert_eq!(w.reference, reference);
    }

    #[test]
    fn test_amount_below_minimum_stays_on_amount() {
        let mut w = DepositWizard::begin();
        let err = w.enter_amount("49.99").unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Minimum deposit is R 50.00"));
        assert_eq!(w.step, DepositStep::Amount);
        assert_eq!(w.amount_cents, None);
    }

    #[test]
    fn test_non_numeric_amount_rejected() {
        let mut w = DepositWizard::begin();
        assert!(w.enter_amount("fifty").is_err());
        assert_eq!(w.step, DepositStep::Amount);
    }

    #[test]
    fn test_minimum_amount_advances() {
        let mut w = DepositWizard::begin();
        w.enter_amount("50").unwrap();
        assert_eq!(w.step, DepositStep::EftDetails);
        assert_eq!(w.amount_cents, Some(5_000));
    }

    #[test]
    fn test_confirm_returns_amount_and_reference() {
        let mut w = DepositWizard::begin();
        w.enter_amount("250").unwrap();
        let (amount, reference) = w.confirm_eft().unwrap();
        assert_eq!(amount, 25_000);
        assert_eq!(reference, w.reference);
        assert_eq!(w.step, DepositStep::Processing);
    }

    #[test]
    fn test_no_backward_or_repeated_transitions() {
        let mut w = DepositWizard::begin();
        assert!(w.confirm_eft().is_err()); // not there yet
        w.enter_amount("100").unwrap();
        assert!(w.enter_amount("200").is_err()); // amount step is behind us
        w.confirm_eft().unwrap();
        assert!(w.confirm_eft().is_err()); // already processing
    }
}
