pub mod health;
pub mod marketplace;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::{advice, applications, chat, wallet};

/// Transport-level body cap for multipart upload routes. Axum's default
/// (2 MB) is below the 5 MiB attachment limit, so uploads would be refused
/// before `chat::check_upload` ever saw them; this cap leaves headroom for
/// multipart framing so the 5 MiB check is the effective limit.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Marketplace
        .route("/api/v1/jobs", get(marketplace::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(marketplace::handle_get_job))
        .route(
            "/api/v1/jobs/:id/match-score",
            post(advice::handlers::handle_match_score),
        )
        .route("/api/v1/talent", get(marketplace::handle_list_talent))
        .route(
            "/api/v1/talent/:id/favorite",
            post(marketplace::handle_toggle_favorite),
        )
        .route(
            "/api/v1/talent/:id/contact",
            post(marketplace::handle_toggle_contact),
        )
        .route("/api/v1/profile", get(marketplace::handle_get_profile))
        // Chat
        .route(
            "/api/v1/chats",
            get(chat::handlers::handle_list_chats).post(chat::handlers::handle_start_chat),
        )
        .route(
            "/api/v1/chats/:id/messages",
            post(chat::handlers::handle_send_message),
        )
        .route(
            "/api/v1/chats/:id/attachments",
            post(chat::handlers::handle_send_attachment)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/chats/:id/messages/:message_id/reactions",
            post(chat::handlers::handle_toggle_reaction),
        )
        .route(
            "/attachments/:id",
            get(chat::handlers::handle_get_attachment),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handlers::handle_list_applications)
                .post(applications::handlers::handle_submit_application)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/applications/:id",
            delete(applications::handlers::handle_withdraw_application),
        )
        // Wallet
        .route("/api/v1/wallet", get(wallet::handlers::handle_get_wallet))
        .route(
            "/api/v1/wallet/deposits",
            post(wallet::handlers::handle_begin_deposit),
        )
        .route(
            "/api/v1/wallet/deposits/:id",
            get(wallet::handlers::handle_get_deposit)
                .delete(wallet::handlers::handle_dismiss_deposit),
        )
        .route(
            "/api/v1/wallet/deposits/:id/amount",
            post(wallet::handlers::handle_deposit_amount),
        )
        .route(
            "/api/v1/wallet/deposits/:id/confirm",
            post(wallet::handlers::handle_confirm_deposit),
        )
        .route(
            "/api/v1/wallet/withdrawals/options",
            get(wallet::handlers::handle_withdraw_options),
        )
        .route(
            "/api/v1/wallet/withdrawals",
            post(wallet::handlers::handle_begin_withdraw),
        )
        .route(
            "/api/v1/wallet/withdrawals/:id",
            get(wallet::handlers::handle_get_withdraw)
                .delete(wallet::handlers::handle_dismiss_withdraw),
        )
        .route(
            "/api/v1/wallet/withdrawals/:id/amount",
            post(wallet::handlers::handle_withdraw_amount),
        )
        .route(
            "/api/v1/wallet/withdrawals/:id/bank",
            post(wallet::handlers::handle_withdraw_bank),
        )
        .route(
            "/api/v1/wallet/withdrawals/:id/back",
            post(wallet::handlers::handle_withdraw_back),
        )
        .route(
            "/api/v1/wallet/withdrawals/:id/details",
            post(wallet::handlers::handle_withdraw_details),
        )
        // Assistant
        .route(
            "/api/v1/assistant",
            get(advice::handlers::handle_get_assistant),
        )
        .route(
            "/api/v1/assistant/messages",
            post(advice::handlers::handle_assistant_message),
        )
        // Notifications and session
        .route(
            "/api/v1/notifications",
            get(marketplace::handle_get_notifications),
        )
        .route(
            "/api/v1/notifications/read",
            post(marketplace::handle_mark_notifications_read),
        )
        .route(
            "/api/v1/session/reset",
            post(marketplace::handle_reset_session),
        )
        .with_state(state)
}
