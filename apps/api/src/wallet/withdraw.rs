//! Withdraw wizard: four steps with backward navigation.
//!
//! `Amount -> Bank -> Details -> Processing`; `Bank -> Amount` and
//! `Details -> Bank` are allowed and preserve previously entered values.
//! Settlement debits the balance and logs a *completed* withdrawal in one
//! session-lock scope, so no partial state is ever observable.

use std::time::Duration;

use serde::Serialize;
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::errors::AppError;
use crate::money::{parse_amount, Cents};

/// Simulated payout latency.
pub const SETTLE_DELAY: Duration = Duration::from_millis(2500);

/// The fixed bank list offered at the `Bank` step.
pub const SA_BANKS: &[&str] = &[
    "First National Bank (FNB)",
    "ABSA Bank",
    "Standard Bank",
    "Nedbank",
    "Capitec Bank",
    "TymeBank",
    "Discovery Bank",
    "Investec",
];

/// Account types offered at the `Details` step; the first is the default.
pub const ACCOUNT_TYPES: &[&str] = &["Savings", "Cheque/Current", "Transmission"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawStep {
    Amount,
    Bank,
    Details,
    Processing,
}

#[derive(Debug)]
pub struct WithdrawWizard {
    pub id: Uuid,
    pub step: WithdrawStep,
    pub amount_cents: Option<Cents>,
    pub bank: Option<String>,
    pub account_holder: String,
    pub account_number: String,
    pub account_type: String,
    pub settlement: Option<AbortHandle>,
}

#[derive(Debug, Serialize)]
pub struct WithdrawWizardView {
    pub id: Uuid,
    pub step: WithdrawStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    pub account_holder: String,
    pub account_number: String,
    pub account_type: String,
}

impl WithdrawWizard {
    pub fn begin() -> Self {
        WithdrawWizard {
            id: Uuid::new_v4(),
            step: WithdrawStep::Amount,
            amount_cents: None,
            bank: None,
            account_holder: String::new(),
            account_number: String::new(),
            account_type: ACCOUNT_TYPES[0].to_string(),
            settlement: None,
        }
    }

    /// Amount step, validated against the live wallet balance.
    pub fn enter_amount(&mut self, raw: &str, balance: Cents) -> Result<(), AppError> {
        if self.step != WithdrawStep::Amount {
            return Err(AppError::Validation(
                "Withdrawal is not awaiting an amount.".to_string(),
            ));
        }
        let cents = match parse_amount(raw) {
            Some(c) if c > 0 => c,
            _ => {
                return Err(AppError::Validation(
                    "Please enter a valid amount.".to_string(),
                ))
            }
        };
        if cents > balance {
            return Err(AppError::Validation("Insufficient funds.".to_string()));
        }
        self.amount_cents = Some(cents);
        self.step = WithdrawStep::Bank;
        Ok(())
    }

    /// Records the bank selection; advancing happens in [`Self::to_details`].
    pub fn select_bank(&mut self, name: &str) -> Result<(), AppError> {
        if self.step != WithdrawStep::Bank {
            return Err(AppError::Validation(
                "Withdrawal is not awaiting a bank selection.".to_string(),
            ));
        }
        if !SA_BANKS.contains(&name) {
            return Err(AppError::Validation(format!("Unknown bank: {name}")));
        }
        self.bank = Some(name.to_string());
        Ok(())
    }

    /// Advances to the details step; rejected until a bank is selected.
    pub fn to_details(&mut self) -> Result<(), AppError> {
        if self.step != WithdrawStep::Bank {
            return Err(AppError::Validation(
                "Withdrawal is not at the bank step.".to_string(),
            ));
        }
        if self.bank.is_none() {
            return Err(AppError::Validation("Please select a bank.".to_string()));
        }
        self.step = WithdrawStep::Details;
        Ok(())
    }

    /// Details step: requires non-empty holder and number; the account type
    /// must be one of [`ACCOUNT_TYPES`] when provided. On success the wizard
    /// moves to `Processing` and hands back the (amount, bank) pair.
    pub fn confirm_details(
        &mut self,
        account_holder: &str,
        account_number: &str,
        account_type: Option<&str>,
    ) -> Result<(Cents, String), AppError> {
        if self.step != WithdrawStep::Details {
            return Err(AppError::Validation(
                "Withdrawal is not awaiting banking details.".to_string(),
            ));
        }
        if account_holder.trim().is_empty() || account_number.trim().is_empty() {
            return Err(AppError::Validation(
                "Please fill in all banking details.".to_string(),
            ));
        }
        if let Some(kind) = account_type {
            if !ACCOUNT_TYPES.contains(&kind) {
                return Err(AppError::Validation(format!(
                    "Unknown account type: {kind}"
                )));
            }
            self.account_type = kind.to_string();
        }
        self.account_holder = account_holder.trim().to_string();
        self.account_number = account_number.trim().to_string();

        let amount = self
            .amount_cents
            .ok_or_else(|| AppError::Validation("Enter an amount first.".to_string()))?;
        let bank = self
            .bank
            .clone()
            .ok_or_else(|| AppError::Validation("Please select a bank.".to_string()))?;
        self.step = WithdrawStep::Processing;
        Ok((amount, bank))
    }

    /// One step back (`Bank -> Amount`, `Details -> Bank`), keeping every
    /// entered value.
    pub fn back(&mut self) -> Result<(), AppError> {
        self.step = match self.step {
            WithdrawStep::Bank => WithdrawStep::Amount,
            WithdrawStep::Details => WithdrawStep::Bank,
            WithdrawStep::Amount | WithdrawStep::Processing => {
                return Err(AppError::Validation(
                    "Cannot navigate back from this step.".to_string(),
                ))
            }
        };
        Ok(())
    }

    pub fn dismiss(self) {
        if let Some(handle) = self.settlement {
            handle.abort();
        }
    }

    pub fn view(&self) -> WithdrawWizardView {
        WithdrawWizardView {
            id: self.id,
            step: self.step,
            amount_cents: self.amount_cents,
            bank: self.bank.clone(),
            account_holder: self.account_holder.clone(),
            account_number: self.account_number.clone(),
            account_type: self.account_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BALANCE: Cents = 125_000;

    #[test]
    fn test_zero_negative_and_non_numeric_amounts_rejected() {
        for raw in ["0", "-10", "abc", ""] {
            let mut w = WithdrawWizard::begin();
            let err = w.enter_amount(raw, BALANCE).unwrap_err();
            assert!(
                matches!(err, AppError::Validation(m) if m == "Please enter a valid amount."),
                "input {raw:?}"
            );
            assert_eq!(w.step, WithdrawStep::Amount);
        }
    }

    #[test]
    fn test_amount_above_balance_rejected() {
        let mut w = WithdrawWizard::begin();
        let err = w.enter_amount("1250.01", BALANCE).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Insufficient funds."));
        assert_eq!(w.step, WithdrawStep::Amount);
    }

    #[test]
    fn test_full_balance_withdrawal_allowed() {
        let mut w = WithdrawWizard::begin();
        w.enter_amount("1250", BALANCE).unwrap();
        assert_eq!(w.step, WithdrawStep::Bank);
    }

    #[test]
    fn test_cannot_advance_without_bank_selection() {
        let mut w = WithdrawWizard::begin();
        w.enter_amount("100", BALANCE).unwrap();
        assert!(w.to_details().is_err());
        w.select_bank("Capitec Bank").unwrap();
        w.to_details().unwrap();
        assert_eq!(w.step, WithdrawStep::Details);
    }

    #[test]
    fn test_unknown_bank_rejected() {
        let mut w = WithdrawWizard::begin();
        w.enter_amount("100", BALANCE).unwrap();
        assert!(w.select_bank("Bank of Nowhere").is_err());
        assert_eq!(w.bank, None);
    }

    #[test]
    fn test_details_require_holder_and_number() {
        let mut w = WithdrawWizard::begin();
        w.enter_amount("100", BALANCE).unwrap();
        w.select_bank("Nedbank").unwrap();
        w.to_details().unwrap();

        let err = w.confirm_details("", "12345", None).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Please fill in all banking details."));
        let err = w.confirm_details("Z Dlamini", "  ", None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(w.step, WithdrawStep::Details);
    }

    #[test]
    fn test_account_type_defaults_to_savings() {
        let mut w = WithdrawWizard::begin();
        w.enter_amount("100", BALANCE).unwrap();
        w.select_bank("Nedbank").unwrap();
        w.to_details().unwrap();
        let (amount, bank) = w.confirm_details("Z Dlamini", "6284920", None).unwrap();
        assert_eq!(amount, 10_000);
        assert_eq!(bank, "Nedbank");
        assert_eq!(w.account_type, "Savings");
        assert_eq!(w.step, WithdrawStep::Processing);
    }

    #[test]
    fn test_back_navigation_preserves_values() {
        let mut w = WithdrawWizard::begin();
        w.enter_amount("300", BALANCE).unwrap();
        w.select_bank("Standard Bank").unwrap();
        w.to_details().unwrap();

        w.back().unwrap();
        assert_eq!(w.step, WithdrawStep::Bank);
        assert_eq!(w.bank.as_deref(), Some("Standard Bank"));

        w.back().unwrap();
        assert_eq!(w.step, WithdrawStep::Amount);
        assert_eq!(w.amount_cents, Some(30_000));

        assert!(w.back().is_err());
    }
}
