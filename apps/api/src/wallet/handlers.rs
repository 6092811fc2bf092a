use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::money::{format_rands, Cents};
use crate::state::AppState;
use crate::wallet::deposit::DepositWizardView;
use crate::wallet::withdraw::{WithdrawWizardView, ACCOUNT_TYPES, SA_BANKS};
use crate::wallet::Transaction;

#[derive(Serialize)]
pub struct WalletOverview {
    pub balance_cents: Cents,
    pub balance_display: String,
    pub transactions: Vec<Transaction>,
}

/// GET /api/v1/wallet
pub async fn handle_get_wallet(State(state): State<AppState>) -> Json<WalletOverview> {
    let (balance_cents, transactions) = state
        .store
        .read(|s| (s.user.wallet_balance_cents, s.transactions.clone()));
    Json(WalletOverview {
        balance_cents,
        balance_display: format_rands(balance_cents),
        transactions,
    })
}

/// Amounts arrive as the raw composer string; parsing and validation happen
/// wizard-side so the error copy matches the inline form messages.
#[derive(Deserialize)]
pub struct AmountRequest {
    pub amount: String,
}

/// POST /api/v1/wallet/deposits
pub async fn handle_begin_deposit(State(state): State<AppState>) -> Json<DepositWizardView> {
    Json(state.store.begin_deposit())
}

/// GET /api/v1/wallet/deposits/:id
pub async fn handle_get_deposit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DepositWizardView>, AppError> {
    Ok(Json(state.store.deposit_view(id)?))
}

/// POST /api/v1/wallet/deposits/:id/amount
pub async fn handle_deposit_amount(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<DepositWizardView>, AppError> {
    Ok(Json(state.store.deposit_amount(id, &req.amount)?))
}

/// POST /api/v1/wallet/deposits/:id/confirm
pub async fn handle_confirm_deposit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DepositWizardView>, AppError> {
    Ok(Json(state.store.confirm_deposit(id)?))
}

/// DELETE /api/v1/wallet/deposits/:id
pub async fn handle_dismiss_deposit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.dismiss_deposit(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct WithdrawOptions {
    pub banks: &'static [&'static str],
    pub account_types: &'static [&'static str],
}

/// GET /api/v1/wallet/withdrawals/options
pub async fn handle_withdraw_options() -> Json<WithdrawOptions> {
    Json(WithdrawOptions {
        banks: SA_BANKS,
        account_types: ACCOUNT_TYPES,
    })
}

/// POST /api/v1/wallet/withdrawals
pub async fn handle_begin_withdraw(State(state): State<AppState>) -> Json<WithdrawWizardView> {
    Json(state.store.begin_withdraw())
}

/// GET /api/v1/wallet/withdrawals/:id
pub async fn handle_get_withdraw(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WithdrawWizardView>, AppError> {
    Ok(Json(state.store.withdraw_view(id)?))
}

/// POST /api/v1/wallet/withdrawals/:id/amount
pub async fn handle_withdraw_amount(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<WithdrawWizardView>, AppError> {
    Ok(Json(state.store.withdraw_amount(id, &req.amount)?))
}

#[derive(Deserialize)]
pub struct BankRequest {
    pub bank: String,
}

/// POST /api/v1/wallet/withdrawals/:id/bank
pub async fn handle_withdraw_bank(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<BankRequest>,
) -> Result<Json<WithdrawWizardView>, AppError> {
    Ok(Json(state.store.withdraw_bank(id, &req.bank)?))
}

/// POST /api/v1/wallet/withdrawals/:id/back
pub async fn handle_withdraw_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WithdrawWizardView>, AppError> {
    Ok(Json(state.store.withdraw_back(id)?))
}

#[derive(Deserialize)]
pub struct BankDetailsRequest {
    pub account_holder: String,
    pub account_number: String,
    pub account_type: Option<String>,
}

/// POST /api/v1/wallet/withdrawals/:id/details
pub async fn handle_withdraw_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<BankDetailsRequest>,
) -> Result<Json<WithdrawWizardView>, AppError> {
    Ok(Json(state.store.confirm_withdraw(
        id,
        &req.account_holder,
        &req.account_number,
        req.account_type.as_deref(),
    )?))
}

/// DELETE /api/v1/wallet/withdrawals/:id
pub async fn handle_dismiss_withdraw(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.dismiss_withdraw(id)?;
    Ok(StatusCode::NO_CONTENT)
}
